#[path = "../common/mod.rs"]
mod common;

mod completion_resolution;
mod dispatch_binding;
mod tree_file_dispatch;

use cmdtree::command::{DispatchError, PreparedCommand};
use rstest::fixture;

use common::{Calls, zoo};

#[fixture]
fn tree() -> PreparedCommand<Calls> {
    zoo()
}

/// Dispatch `args` and return the error, asserting no handler ran.
fn fail(tree: &PreparedCommand<Calls>, args: &[&str]) -> DispatchError {
    let mut calls = Calls::new();
    let err = tree
        .process(args, &mut calls)
        .expect_err("dispatch should fail");
    assert!(calls.is_empty(), "handler ran despite {err}");
    err
}
