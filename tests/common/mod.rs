#![allow(dead_code)]

use cmdtree::command::{ArgumentDef, Command, Namespace, OptionDef, PreparedCommand, ValueType};

/// Every handler run, in order: the leaf's name and its bound namespace.
pub type Calls = Vec<(String, Namespace)>;

/// A leaf whose handler records itself into the [`Calls`] context.
pub fn recording(name: &str, description: &str) -> Command<Calls> {
    let leaf = name.to_string();
    Command::new(name, description).handler(move |namespace, calls: &mut Calls| {
        calls.push((leaf.clone(), namespace.clone()));
        Ok(())
    })
}

/// A small zoo:
///
/// ```text
/// zoo animal add [-a/--age <int>] [--tame] [--tag=<t>...] <species> [<names...>]
/// zoo animal rm <animal>
/// zoo feed [--food=<f>...] [-v]
/// ```
pub fn zoo() -> PreparedCommand<Calls> {
    Command::new("zoo", "run the zoo")
        .subcommand(
            Command::new("animal", "manage animals")
                .subcommand(
                    recording("add", "add an animal")
                        .option(
                            OptionDef::new("age", "age in years")
                                .short('a')
                                .value_type(ValueType::Int)
                                .default(1_i64),
                        )
                        .option(OptionDef::flag("tame", "is it tame"))
                        .option(OptionDef::new("tag", "labels").array())
                        .argument(
                            ArgumentDef::new("species", "what kind")
                                .member_of(["cat", "dog", "emu"]),
                        )
                        .argument(ArgumentDef::new("names", "what to call it").array()),
                )
                .subcommand(
                    recording("rm", "remove an animal")
                        .argument(ArgumentDef::new("animal", "animal to remove")),
                ),
        )
        .subcommand(
            recording("feed", "feed everyone")
                .option(OptionDef::new("food", "what to serve").array().default("hay"))
                .option(OptionDef::new("verbose", "chatty").short('v').implicit(true)),
        )
        .prepare()
        .expect("zoo tree is valid")
}

/// Run pre-split arguments against the zoo and return the single recorded
/// call.
pub fn run(args: &[&str]) -> (String, Namespace) {
    let tree = zoo();
    let mut calls = Calls::new();
    tree.process(args, &mut calls)
        .unwrap_or_else(|e| panic!("{args:?} failed: {e}"));
    assert_eq!(calls.len(), 1, "expected exactly one handler call");
    calls.remove(0)
}
