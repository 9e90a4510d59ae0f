mod argument;
pub mod completion;
mod error;
mod namespace;
mod option;
mod prepared;
mod tree;
mod value;

pub use argument::ArgumentDef;
pub use completion::CompletionRequest;
pub use error::*;
pub use namespace::Namespace;
pub use option::OptionDef;
pub use prepared::{Invocation, PreparedCommand};
pub use tree::Command;
pub use value::{Value, ValueType};

use crate::grammar::Token;

/// A leaf command's action. `C` is the execution context handed through by
/// whoever dispatches the command.
pub type Handler<C> = Box<dyn Fn(&Namespace, &mut C) -> anyhow::Result<()>>;

/// Computes suggestions for a partially typed option or argument value.
pub type Completer<C> = Box<dyn Fn(&str, &C) -> Vec<String>>;

/// Replaces a leaf command's argument-level completion. Receives the
/// compressed tokens after the command path.
pub type CompletionOverride<C> =
    Box<dyn Fn(&[Token], &CompletionRequest<'_>, &C) -> Vec<String>>;
