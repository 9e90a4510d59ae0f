use serde::{Deserialize, Serialize};

use crate::command::{ArgumentDef, Command, Namespace, OptionDef, Value, ValueType};
use crate::config::ConfigError;
use crate::dispatcher::Dispatcher;

/// Dispatcher settings with every field resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Help heading for commands without a group
    pub default_heading: String,
    /// Register the `help` and `set` commands
    pub builtins: bool,
    /// Run lines starting with `!` as external programs
    pub shell_escape: bool,
    /// Log each resolved namespace at info level
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_heading: "commands".to_string(),
            builtins: true,
            shell_escape: true,
            debug: false,
        }
    }
}

/// A command tree file (`cmdtree.yml`).
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct TreeFile {
    pub settings: Option<SettingsEntry>,
    pub commands: Option<Vec<CommandEntry>>,
}

/// The `settings` section; unset fields fall back to [`Settings::default`].
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct SettingsEntry {
    pub default_heading: Option<String>,
    pub builtins: Option<bool>,
    pub shell_escape: Option<bool>,
    pub debug: Option<bool>,
}

impl SettingsEntry {
    pub fn resolve(self) -> Settings {
        let defaults = Settings::default();
        Settings {
            default_heading: self.default_heading.unwrap_or(defaults.default_heading),
            builtins: self.builtins.unwrap_or(defaults.builtins),
            shell_escape: self.shell_escape.unwrap_or(defaults.shell_escape),
            debug: self.debug.unwrap_or(defaults.debug),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CommandEntry {
    pub name: Option<String>,
    pub description: Option<String>,
    pub group: Option<String>,
    pub subcommands: Option<Vec<CommandEntry>>,
    pub options: Option<Vec<OptionEntry>>,
    pub arguments: Option<Vec<ArgumentEntry>>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OptionEntry {
    pub name: String,
    pub short: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub value_type: Option<ValueType>,
    pub implicit: Option<Value>,
    pub default: Option<Value>,
    pub array: Option<bool>,
    pub required: Option<bool>,
    pub member_of: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ArgumentEntry {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub value_type: Option<ValueType>,
    pub default: Option<Value>,
    pub array: Option<bool>,
    pub member_of: Option<Vec<String>>,
}

/// What a declared leaf prints when run.
#[derive(Serialize)]
struct Echo<'a> {
    command: String,
    namespace: &'a Namespace,
}

impl TreeFile {
    /// Check the file for mistakes that are clearer to report against the
    /// YAML than against the built command tree. All issues are collected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        if let Some(commands) = &self.commands {
            for (i, command) in commands.iter().enumerate() {
                command.validate(&format!("commands[{i}]"), &mut errors);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Merge two tree files. Commands from `other` are appended; settings
    /// set in `other` take precedence.
    pub fn merge(self, other: TreeFile) -> TreeFile {
        TreeFile {
            settings: Self::merge_settings(self.settings, other.settings),
            commands: Self::merge_vecs(self.commands, other.commands),
        }
    }

    fn merge_settings(
        base: Option<SettingsEntry>,
        over: Option<SettingsEntry>,
    ) -> Option<SettingsEntry> {
        match (base, over) {
            (Some(b), Some(o)) => Some(SettingsEntry {
                default_heading: o.default_heading.or(b.default_heading),
                builtins: o.builtins.or(b.builtins),
                shell_escape: o.shell_escape.or(b.shell_escape),
                debug: o.debug.or(b.debug),
            }),
            (b, o) => o.or(b),
        }
    }

    fn merge_vecs<T>(base: Option<Vec<T>>, over: Option<Vec<T>>) -> Option<Vec<T>> {
        match (base, over) {
            (Some(mut b), Some(o)) => {
                b.extend(o);
                Some(b)
            }
            (b, o) => b.or(o),
        }
    }

    /// Validate the file and build a dispatcher holding its commands.
    pub fn into_dispatcher(self) -> Result<Dispatcher, ConfigError> {
        self.validate()?;
        let settings = self.settings.unwrap_or_default().resolve();
        let mut dispatcher = Dispatcher::new(settings)?;
        for entry in self.commands.unwrap_or_default() {
            dispatcher.add_command(entry.into_command(&[]))?;
        }
        Ok(dispatcher)
    }
}

impl CommandEntry {
    fn validate(&self, at: &str, errors: &mut Vec<String>) {
        let name = self.name.as_deref().unwrap_or_default();
        if name.trim().is_empty() {
            errors.push(format!("{at}: command must have a name"));
        }
        if self.description.as_deref().is_none_or(|d| d.trim().is_empty()) {
            errors.push(format!("{at}: command '{name}' must have a description"));
        }

        let subcommands = self.subcommands.as_deref().unwrap_or_default();
        let has_slots = self.options.as_ref().is_some_and(|o| !o.is_empty())
            || self.arguments.as_ref().is_some_and(|a| !a.is_empty());
        if !subcommands.is_empty() && has_slots {
            errors.push(format!(
                "{at}: command '{name}' cannot declare options or arguments alongside subcommands"
            ));
        }

        for (i, option) in self.options.iter().flatten().enumerate() {
            if let Some(short) = &option.short
                && short.chars().count() != 1
            {
                errors.push(format!(
                    "{at}.options[{i}]: short name '{short}' of option '{}' must be a single character",
                    option.name
                ));
            }
        }

        for (i, subcommand) in subcommands.iter().enumerate() {
            subcommand.validate(&format!("{at}.subcommands[{i}]"), errors);
        }
    }

    /// Build the declared command. Leaves print their command path and
    /// namespace as JSON when run.
    pub fn into_command(self, parent: &[String]) -> Command<Dispatcher> {
        let name = self.name.unwrap_or_default();
        let mut path = parent.to_vec();
        path.push(name.clone());

        let mut command = Command::new(name, self.description.unwrap_or_default());
        command.group = self.group;

        let subcommands = self.subcommands.unwrap_or_default();
        if !subcommands.is_empty() {
            command.subcommands = subcommands
                .into_iter()
                .map(|entry| entry.into_command(&path))
                .collect();
            return command;
        }

        command.options = self
            .options
            .unwrap_or_default()
            .into_iter()
            .map(OptionEntry::into_option)
            .collect();
        command.arguments = self
            .arguments
            .unwrap_or_default()
            .into_iter()
            .map(ArgumentEntry::into_argument)
            .collect();

        let command_path = path.join(" ");
        command.handler(move |namespace, _| {
            let echo = Echo {
                command: command_path.clone(),
                namespace,
            };
            println!("{}", serde_json::to_string(&echo)?);
            Ok(())
        })
    }
}

impl OptionEntry {
    fn into_option(self) -> OptionDef<Dispatcher> {
        let mut option = OptionDef::new(self.name, self.description.unwrap_or_default());
        option.short = self.short.as_deref().and_then(single_char);
        option.value_type = self.value_type.unwrap_or_default();
        option.implicit = self.implicit;
        option.default = self.default;
        option.array = self.array.unwrap_or(false);
        option.required = self.required.unwrap_or(false);
        option.member_of = self.member_of.unwrap_or_default();
        option
    }
}

impl ArgumentEntry {
    fn into_argument(self) -> ArgumentDef<Dispatcher> {
        let mut argument = ArgumentDef::new(self.name, self.description.unwrap_or_default());
        argument.value_type = self.value_type.unwrap_or_default();
        argument.default = self.default;
        argument.array = self.array.unwrap_or(false);
        argument.member_of = self.member_of.unwrap_or_default();
        argument
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Parse a YAML string into a [`TreeFile`].
pub fn parse_tree_file(yaml: &str) -> Result<TreeFile, ConfigError> {
    Ok(serde_saphyr::from_str(yaml)?)
}
