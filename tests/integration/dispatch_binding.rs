use super::common::{Calls, recording, run};
use super::{fail, tree};

use cmdtree::command::{
    ArgumentDef, ArityError, Command, ConversionError, DispatchError, OptionDef, PreparedCommand,
    SlotKind, UnknownCommandError, Value, ValueType,
};
use cmdtree::grammar::GrammarError;
use rstest::rstest;

// ========================================
// Positional arity
// ========================================

#[rstest]
fn single_argument_binds() {
    let (leaf, namespace) = run(&["animal", "rm", "rex"]);
    assert_eq!(leaf, "rm");
    assert_eq!(namespace.get_str("animal"), Some("rex"));
}

#[rstest]
#[case::missing(&["animal", "rm"], ArityError::Expected("animal".into()))]
#[case::extra(&["animal", "rm", "rex", "tom"], ArityError::Unexpected("tom".into()))]
fn argument_count_is_enforced(
    tree: PreparedCommand<Calls>,
    #[case] args: &[&str],
    #[case] expected: ArityError,
) {
    match fail(&tree, args) {
        DispatchError::Arity(err) => assert_eq!(err, expected),
        other => panic!("expected arity error, got {other:?}"),
    }
}

#[rstest]
fn overflow_binds_to_trailing_array() {
    let (_, namespace) = run(&["animal", "add", "cat", "tom", "tibbles"]);
    assert_eq!(namespace.get_str("species"), Some("cat"));
    assert_eq!(
        namespace.get("names"),
        Some(&Value::Array(vec!["tom".into(), "tibbles".into()]))
    );
}

#[rstest]
fn trailing_array_may_stay_empty() {
    let (_, namespace) = run(&["animal", "add", "dog"]);
    assert_eq!(namespace.get_array("names"), Some(&[] as &[Value]));
}

// ========================================
// Options
// ========================================

#[rstest]
#[case::long_companion(&["animal", "add", "--age", "4", "cat"], 4)]
#[case::short_companion(&["animal", "add", "-a", "5", "cat"], 5)]
#[case::long_assignment(&["animal", "add", "--age=6", "cat"], 6)]
#[case::short_assignment(&["animal", "add", "-a=7", "cat"], 7)]
#[case::default(&["animal", "add", "cat"], 1)]
fn plain_option_values(#[case] args: &[&str], #[case] expected: i64) {
    let (_, namespace) = run(args);
    assert_eq!(namespace.get_int("age"), Some(expected));
}

#[rstest]
fn array_option_accumulates_in_order() {
    let (_, namespace) = run(&["animal", "add", "--tag=x", "--tag=y", "cat"]);
    assert_eq!(
        namespace.get("tag"),
        Some(&Value::Array(vec!["x".into(), "y".into()]))
    );
}

#[rstest]
#[case::untouched(&["feed"], vec!["hay"])]
#[case::supplied(&["feed", "--food=fish", "--food=nuts"], vec!["fish", "nuts"])]
fn array_option_default_only_when_empty(#[case] args: &[&str], #[case] expected: Vec<&str>) {
    let (_, namespace) = run(args);
    let expected: Vec<Value> = expected.into_iter().map(Value::from).collect();
    assert_eq!(namespace.get_array("food"), Some(expected.as_slice()));
}

#[rstest]
fn implicit_option_sets_its_value() {
    let (_, namespace) = run(&["feed", "-v"]);
    assert_eq!(namespace.get_bool("verbose"), Some(true));

    let (_, namespace) = run(&["feed"]);
    assert!(!namespace.contains("verbose"));
}

#[rstest]
#[case::implicit_assignment(
    &["feed", "-v=anything"],
    GrammarError::AssignmentNotAllowed("-v/--verbose".into()),
)]
#[case::companion_checked_before_order(
    &["animal", "add", "cat", "--age"],
    GrammarError::MissingCompanion("-a/--age".into()),
)]
#[case::companion_is_option(
    &["animal", "add", "--age", "--tame", "cat"],
    GrammarError::MissingCompanion("-a/--age".into()),
)]
#[case::companion_at_end(
    &["animal", "add", "--age"],
    GrammarError::MissingCompanion("-a/--age".into()),
)]
#[case::unknown_long(&["animal", "add", "--colour=red", "cat"], GrammarError::UnknownOption("--colour".into()))]
#[case::unknown_short(&["animal", "add", "-z", "cat"], GrammarError::UnknownOption("-z".into()))]
#[case::array_needs_value(&["animal", "add", "--tag", "cat"], GrammarError::MissingValue("--tag".into()))]
#[case::option_after_positional(
    &["animal", "add", "cat", "--tame"],
    GrammarError::OptionAfterPositional("--tame".into()),
)]
fn grammar_violations(
    tree: PreparedCommand<Calls>,
    #[case] args: &[&str],
    #[case] expected: GrammarError,
) {
    match fail(&tree, args) {
        DispatchError::Grammar(err) => assert_eq!(err, expected),
        other => panic!("expected grammar error, got {other:?}"),
    }
}

#[rstest]
fn membership_is_enforced(tree: PreparedCommand<Calls>) {
    let err = fail(&tree, &["animal", "add", "cow"]);
    assert!(matches!(
        err,
        DispatchError::Grammar(GrammarError::NotAMember { ref value, .. }) if value == "cow"
    ));
}

#[rstest]
fn conversion_names_its_owner(tree: PreparedCommand<Calls>) {
    let err = fail(&tree, &["animal", "add", "--age=old", "cat"]);
    match err {
        DispatchError::Conversion(ConversionError {
            owner,
            name,
            expected,
            value,
        }) => {
            assert_eq!(owner, SlotKind::Option);
            assert_eq!(name, "age");
            assert_eq!(expected, ValueType::Int);
            assert_eq!(value, "old");
        }
        other => panic!("expected conversion error, got {other:?}"),
    }
}

#[rstest]
#[case::true_upper("TRUE", true)]
#[case::false_mixed("False", false)]
fn bool_arguments_are_case_insensitive(#[case] raw: &str, #[case] expected: bool) {
    let tree = recording("toggle", "toggle something")
        .argument(ArgumentDef::new("on", "state").value_type(ValueType::Bool))
        .prepare()
        .unwrap();
    let mut calls = Calls::new();
    tree.process([raw], &mut calls).unwrap();
    assert_eq!(calls[0].1.get_bool("on"), Some(expected));
}

#[rstest]
fn bool_argument_rejects_other_words() {
    let tree = recording("toggle", "toggle something")
        .argument(ArgumentDef::new("on", "state").value_type(ValueType::Bool))
        .prepare()
        .unwrap();
    let err = tree.process(["yes"], &mut Calls::new()).unwrap_err();
    assert!(matches!(err, DispatchError::Conversion(_)));
}

// ========================================
// Command paths
// ========================================

#[rstest]
#[case::unknown_subcommand(
    &["animal", "pet"],
    UnknownCommandError::UnknownSubcommand { parent: "zoo animal".into(), name: "pet".into() },
)]
#[case::missing_subcommand(&["animal"], UnknownCommandError::MissingSubcommand("zoo animal".into()))]
#[case::case_sensitive(
    &["Animal", "add", "cat"],
    UnknownCommandError::UnknownSubcommand { parent: "zoo".into(), name: "Animal".into() },
)]
#[case::option_in_place_of_command(&["--help"], UnknownCommandError::NotACommand("--help".into()))]
fn command_path_errors(
    tree: PreparedCommand<Calls>,
    #[case] args: &[&str],
    #[case] expected: UnknownCommandError,
) {
    match fail(&tree, args) {
        DispatchError::UnknownCommand(err) => assert_eq!(err, expected),
        other => panic!("expected unknown command, got {other:?}"),
    }
}

#[rstest]
fn handler_error_is_passed_through() {
    let tree = Command::<Calls>::new("boom", "always fails")
        .handler(|_, _| anyhow::bail!("the cage is open"))
        .prepare()
        .unwrap();
    let err = tree.process(Vec::<String>::new(), &mut Calls::new()).unwrap_err();
    assert!(matches!(err, DispatchError::Handler(_)));
    assert_eq!(err.to_string(), "the cage is open");
}

#[rstest]
fn bind_reports_path_without_running(tree: PreparedCommand<Calls>) {
    let invocation = tree
        .bind(cmdtree::grammar::classify(["animal", "add", "-a", "2", "emu", "Ed"]))
        .unwrap();
    assert_eq!(invocation.path, vec!["zoo", "animal", "add"]);
    assert_eq!(invocation.namespace.get_int("age"), Some(2));

    let mut calls = Calls::new();
    invocation.invoke(&mut calls).unwrap();
    assert_eq!(calls.len(), 1);
}

#[rstest]
fn namespace_binds_into_struct() {
    #[derive(serde::Deserialize)]
    struct Add {
        age: i64,
        tame: Option<bool>,
        species: String,
        names: Vec<String>,
    }

    let (_, namespace) = run(&["animal", "add", "--tame", "-a", "3", "emu", "Ed", "Edna"]);
    let add: Add = namespace.bind().unwrap();
    assert_eq!(add.age, 3);
    assert_eq!(add.tame, Some(true));
    assert_eq!(add.species, "emu");
    assert_eq!(add.names, vec!["Ed", "Edna"]);
}

#[rstest]
fn option_default_has_declared_type() {
    let tree = recording("weigh", "weigh an animal")
        .option(
            OptionDef::new("scale", "scale factor")
                .value_type(ValueType::Float)
                .default("1.5"),
        )
        .prepare()
        .unwrap();
    let mut calls = Calls::new();
    tree.process(Vec::<String>::new(), &mut calls).unwrap();
    assert_eq!(calls[0].1.get_float("scale"), Some(1.5));
}
