use std::fs;

use cmdtree::command::{
    ArityError, CompletionRequest, DispatchError, StructuralViolation, UnknownCommandError,
};
use cmdtree::config::{ConfigError, ConfigLoader, DefaultConfigLoader, parse_tree_file};
use cmdtree::dispatcher::Dispatcher;
use indoc::indoc;
use rstest::{fixture, rstest};
use tempfile::TempDir;

const ZOO: &str = indoc! {"
    settings:
      default_heading: zoo
    commands:
      - name: animal
        description: manage animals
        subcommands:
          - name: add
            description: add an animal
            options:
              - name: age
                short: a
                description: age in years
                type: int
                default: 1
              - name: tame
                description: is it tame
                implicit: true
            arguments:
              - name: species
                description: what kind
                member_of: [cat, dog]
              - name: names
                description: what to call it
                array: true
          - name: rm
            description: remove an animal
            arguments:
              - name: animal
                description: animal to remove
      - name: feed
        description: feed everyone
        group: care
        options:
          - name: food
            description: what to serve
            array: true
            default: hay
"};

#[fixture]
fn dispatcher() -> Dispatcher {
    parse_tree_file(ZOO).unwrap().into_dispatcher().unwrap()
}

// ========================================
// Dispatch against a declared tree
// ========================================

#[rstest]
#[case::leaf_with_options("animal add -a 3 --tame dog Rex")]
#[case::quoted_argument("animal add cat 'Mr Tibbles'")]
#[case::array_default("feed")]
#[case::builtin_help("help animal add")]
fn declared_commands_run(dispatcher: Dispatcher, #[case] line: &str) {
    let mut dispatcher = dispatcher;
    dispatcher.execute(line).unwrap();
}

#[rstest]
fn process_requotes_arguments(dispatcher: Dispatcher) {
    let mut dispatcher = dispatcher;
    dispatcher
        .process(["animal", "add", "cat", "Mr Tibbles", "it's"])
        .unwrap();
}

#[rstest]
fn declared_command_errors(dispatcher: Dispatcher) {
    let mut dispatcher = dispatcher;

    let err = dispatcher.execute("animal rm").unwrap_err();
    assert!(matches!(
        err,
        DispatchError::Arity(ArityError::Expected(ref name)) if name == "animal"
    ));

    let err = dispatcher.execute("aquarium").unwrap_err();
    assert!(matches!(
        err,
        DispatchError::UnknownCommand(UnknownCommandError::NotFound(ref name)) if name == "aquarium"
    ));

    let err = dispatcher.execute("animal add 'cat").unwrap_err();
    assert!(matches!(err, DispatchError::Tokenize(_)));
}

#[rstest]
fn declared_tree_completes(dispatcher: Dispatcher) {
    assert_eq!(
        dispatcher.complete(&CompletionRequest::at_end("animal add ")),
        vec!["cat", "dog"]
    );
    assert_eq!(
        dispatcher.complete(&CompletionRequest::at_end("f")),
        vec!["feed"]
    );
}

#[rstest]
fn settings_are_applied(dispatcher: Dispatcher) {
    assert_eq!(dispatcher.settings().default_heading, "zoo");
    assert!(dispatcher.settings().builtins);
}

// ========================================
// Rejected trees
// ========================================

#[rstest]
fn duplicate_siblings_fail_preparation() {
    let yaml = indoc! {"
        commands:
          - name: animal
            description: manage animals
            subcommands:
              - name: add
                description: add one
              - name: add
                description: add another
    "};
    let err = parse_tree_file(yaml).unwrap().into_dispatcher().unwrap_err();
    match err {
        ConfigError::Structural(err) => {
            assert_eq!(
                err.violation,
                StructuralViolation::DuplicateSubcommand("add".into())
            );
        }
        other => panic!("expected structural error, got {other:?}"),
    }
}

#[rstest]
fn builtin_name_clash_fails() {
    let yaml = indoc! {"
        commands:
          - name: help
            description: my own help
    "};
    let err = parse_tree_file(yaml).unwrap().into_dispatcher().unwrap_err();
    assert!(matches!(err, ConfigError::Structural(_)));
}

#[rstest]
fn builtins_can_be_disabled() {
    let yaml = indoc! {"
        settings:
          builtins: false
        commands:
          - name: help
            description: my own help
    "};
    let dispatcher = parse_tree_file(yaml).unwrap().into_dispatcher().unwrap();
    assert!(dispatcher.command("set").is_none());
    assert_eq!(dispatcher.commands().count(), 1);
}

// ========================================
// Discovery
// ========================================

#[rstest]
fn global_and_local_trees_merge() {
    let home = TempDir::new().unwrap();
    let project = TempDir::new().unwrap();
    let global = home.path().join("cmdtree.yml");
    fs::write(
        &global,
        indoc! {"
            settings:
              default_heading: everywhere
            commands:
              - name: feed
                description: feed everyone
        "},
    )
    .unwrap();
    fs::write(
        project.path().join("cmdtree.yaml"),
        indoc! {"
            settings:
              shell_escape: false
            commands:
              - name: clean
                description: clean the cages
        "},
    )
    .unwrap();

    let tree = DefaultConfigLoader::with_global_path(global)
        .load(project.path())
        .unwrap();
    let dispatcher = tree.into_dispatcher().unwrap();

    assert!(dispatcher.command("feed").is_some());
    assert!(dispatcher.command("clean").is_some());
    assert_eq!(dispatcher.settings().default_heading, "everywhere");
    assert!(!dispatcher.settings().shell_escape);
}
