use cmdtree::command::{ArgumentDef, Command, CompletionRequest, OptionDef};
use cmdtree::config::Settings;
use cmdtree::dispatcher::Dispatcher;
use rstest::{fixture, rstest};

fn leaf(name: &str, description: &str) -> Command<Dispatcher> {
    Command::new(name, description).handler(|_, _| Ok(()))
}

#[fixture]
fn dispatcher() -> Dispatcher {
    let mut dispatcher = Dispatcher::new(Settings {
        builtins: false,
        ..Settings::default()
    })
    .unwrap();
    dispatcher
        .add_command(
            Command::new("animal", "manage animals")
                .subcommand(
                    leaf("add", "add an animal")
                        .option(
                            OptionDef::new("diet", "what it eats")
                                .short('d')
                                .member_of(["meat", "fish", "fruit"]),
                        )
                        .option(OptionDef::flag("tame", "is it tame"))
                        .argument(
                            ArgumentDef::new("species", "what kind").member_of(["cat", "cow", "dog"]),
                        )
                        .argument(
                            ArgumentDef::new("names", "what to call it")
                                .array()
                                .completer(|prefix, dispatcher: &Dispatcher| {
                                    dispatcher
                                        .commands()
                                        .map(|command| command.name().to_string())
                                        .filter(|name| name.starts_with(prefix))
                                        .collect()
                                }),
                        ),
                )
                .subcommand(leaf("rm", "remove an animal")),
        )
        .unwrap();
    dispatcher.add_command(leaf("feed", "feed everyone")).unwrap();
    dispatcher
        .add_command(leaf("fence", "mend a fence").argument(ArgumentDef::new("side", "which side")))
        .unwrap();
    dispatcher
}

// ========================================
// Command names
// ========================================

#[rstest]
#[case::empty_line("", vec!["animal", "feed", "fence"])]
#[case::top_level_prefix("ani", vec!["animal"])]
#[case::shared_prefix("fe", vec!["feed", "fence"])]
#[case::no_match("cage", vec![])]
#[case::exact_single_match("animal", vec![])]
#[case::subcommands_after_space("animal ", vec!["add", "rm"])]
#[case::subcommand_prefix("animal r", vec!["rm"])]
#[case::unknown_parent("cage ", vec![])]
#[case::unknown_middle("animal pet ", vec![])]
#[case::open_quote("animal add 'c", vec![])]
fn command_name_completion(
    dispatcher: Dispatcher,
    #[case] before: &str,
    #[case] expected: Vec<&str>,
) {
    assert_eq!(dispatcher.complete(&CompletionRequest::at_end(before)), expected);
}

// ========================================
// Arguments and option values
// ========================================

#[rstest]
#[case::first_argument_members("animal add ", vec!["cat", "cow", "dog"])]
#[case::first_argument_prefix("animal add c", vec!["cat", "cow"])]
#[case::after_flag("animal add --tame d", vec!["dog"])]
#[case::after_option_value("animal add --diet fish c", vec!["cat", "cow"])]
#[case::array_argument_uses_completer("animal add cat f", vec!["feed", "fence"])]
#[case::array_argument_overflow("animal add cat Tom a", vec!["animal"])]
#[case::option_value_members("animal add --diet f", vec!["fish", "fruit"])]
#[case::short_option_value_members("animal add -d ", vec!["meat", "fish", "fruit"])]
#[case::option_in_progress("animal add --di", vec![])]
#[case::unknown_option("animal add --colour red ", vec![])]
#[case::no_declared_arguments("feed ", vec![])]
#[case::argument_without_completion("fence ", vec![])]
fn argument_completion(
    dispatcher: Dispatcher,
    #[case] before: &str,
    #[case] expected: Vec<&str>,
) {
    assert_eq!(dispatcher.complete(&CompletionRequest::at_end(before)), expected);
}

#[rstest]
fn text_after_cursor_is_ignored(dispatcher: Dispatcher) {
    let request = CompletionRequest::new("ani", "mal add cat", "animal add cat");
    assert_eq!(dispatcher.complete(&request), vec!["animal"]);
}

#[rstest]
fn completion_override_sees_compressed_tokens() {
    let mut dispatcher = Dispatcher::new(Settings {
        builtins: false,
        ..Settings::default()
    })
    .unwrap();
    dispatcher
        .add_command(
            leaf("echo", "repeat the last word")
                .option(OptionDef::new("times", "repeat count"))
                .argument(ArgumentDef::new("words", "words").array())
                .complete_with(|tokens, request, _| {
                    vec![format!("{}:{}", tokens.len(), request.before_cursor)]
                }),
        )
        .unwrap();
    assert_eq!(
        dispatcher.complete(&CompletionRequest::at_end("echo --times 2 hi")),
        vec!["2:echo --times 2 hi"]
    );
}
