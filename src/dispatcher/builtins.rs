use anyhow::{anyhow, bail};

use crate::command::{ArgumentDef, Command, StructuralError, Value, ValueType};
use crate::dispatcher::{Dispatcher, help};

pub const HELP: &str = "help";
pub const SET: &str = "set";

/// Settings the `set` command can change.
pub const SETTINGS: &[&str] = &["debug", "heading"];

pub(crate) fn register(dispatcher: &mut Dispatcher) -> Result<(), StructuralError> {
    dispatcher.add_command(help_command())?;
    dispatcher.add_command(set_command())
}

fn help_command() -> Command<Dispatcher> {
    Command::new(HELP, "display the command set, and contextual help")
        .argument(ArgumentDef::new("command", "command and subcommand if available").array())
        .complete_with(|_, request, dispatcher: &Dispatcher| {
            dispatcher.complete(&request.without_first_word())
        })
        .handler(|namespace, dispatcher: &mut Dispatcher| {
            let path: Vec<&str> = namespace
                .get_array("command")
                .unwrap_or_default()
                .iter()
                .filter_map(Value::as_str)
                .collect();
            print!("{}", help::render(dispatcher, &path)?);
            Ok(())
        })
}

fn set_command() -> Command<Dispatcher> {
    Command::new(SET, "modify a setting")
        .argument(ArgumentDef::new("setting", "setting to change").member_of(SETTINGS.iter().copied()))
        .argument(ArgumentDef::new("value", "new value of setting"))
        .handler(|namespace, dispatcher: &mut Dispatcher| {
            let value = namespace.get_str("value").unwrap_or_default();
            match namespace.get_str("setting").unwrap_or_default() {
                "debug" => {
                    let debug = ValueType::Bool
                        .parse(value)
                        .and_then(|v| v.as_bool())
                        .ok_or_else(|| anyhow!("debug setting must be true or false"))?;
                    dispatcher.settings_mut().debug = debug;
                    println!("debug mode {}", if debug { "on" } else { "off" });
                }
                "heading" => {
                    dispatcher.settings_mut().default_heading = value.to_string();
                }
                other => bail!("unknown setting \"{other}\""),
            }
            Ok(())
        })
}
