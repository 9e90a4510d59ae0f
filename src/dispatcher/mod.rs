pub mod builtins;
pub mod help;
mod shell;

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::command::completion::complete_names;
use crate::command::{
    Command, CompletionRequest, DispatchError, PreparedCommand, StructuralError,
    StructuralViolation, UnknownCommandError,
};
use crate::config::Settings;
use crate::grammar::{Token, classify, join_args, tokenize};

/// Owns the top-level commands and turns input lines into handler calls.
///
/// Handlers receive the dispatcher itself as their execution context, so
/// they can register further commands or change settings.
pub struct Dispatcher {
    settings: Settings,
    commands: BTreeMap<String, Rc<PreparedCommand<Dispatcher>>>,
}

impl Dispatcher {
    /// Create a dispatcher, registering `help` and `set` unless
    /// `settings.builtins` is off.
    pub fn new(settings: Settings) -> Result<Self, StructuralError> {
        let mut dispatcher = Self {
            settings,
            commands: BTreeMap::new(),
        };
        if dispatcher.settings.builtins {
            builtins::register(&mut dispatcher)?;
        }
        Ok(dispatcher)
    }

    /// Prepare `command` and add it at the top level.
    pub fn add_command(&mut self, command: Command<Dispatcher>) -> Result<(), StructuralError> {
        let prepared = command.prepare()?;
        let name = prepared.name().to_string();
        if self.commands.contains_key(&name) {
            return Err(StructuralError::new(
                name.as_str(),
                StructuralViolation::DuplicateCommand(name.clone()),
            ));
        }
        tracing::debug!(command = %name, "registered command");
        self.commands.insert(name, Rc::new(prepared));
        Ok(())
    }

    /// Drop the built-in commands, optionally keeping `help`.
    pub fn remove_builtins(&mut self, keep_help: bool) {
        if !keep_help {
            self.commands.remove(builtins::HELP);
        }
        self.commands.remove(builtins::SET);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn command(&self, name: &str) -> Option<&PreparedCommand<Dispatcher>> {
        self.commands.get(name).map(Rc::as_ref)
    }

    /// Top-level commands in name order.
    pub fn commands(&self) -> impl Iterator<Item = &PreparedCommand<Dispatcher>> {
        self.commands.values().map(Rc::as_ref)
    }

    /// Execute one raw input line.
    pub fn execute(&mut self, line: &str) -> Result<(), DispatchError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(DispatchError::EmptyInput);
        }
        if self.settings.shell_escape
            && let Some(command) = line.strip_prefix('!')
        {
            return shell::run(command);
        }

        let tokens = tokenize(line).into_result()?;
        tracing::trace!(?tokens, "tokenized line");
        self.dispatch(classify(tokens))
    }

    /// Execute pre-split arguments (such as the process's own argv). Any
    /// argument containing a space or quote is quoted before the line is
    /// executed.
    pub fn process<I, S>(&mut self, args: I) -> Result<(), DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let line = join_args(args);
        self.execute(&line)
    }

    fn dispatch(&mut self, tokens: Vec<Token>) -> Result<(), DispatchError> {
        let mut tokens = tokens.into_iter();
        let name = match tokens.next() {
            Some(Token::Positional(name)) => name,
            Some(Token::Option(input)) => {
                return Err(UnknownCommandError::NotACommand(input.flag()).into());
            }
            None => return Err(DispatchError::EmptyInput),
        };
        let command = self
            .commands
            .get(&name)
            .cloned()
            .ok_or(UnknownCommandError::NotFound(name))?;

        let invocation = command.bind(tokens.collect())?;
        if self.settings.debug {
            tracing::info!(
                command = %invocation.path.join(" "),
                namespace = ?invocation.namespace,
                "dispatching"
            );
        }
        invocation.invoke(self)
    }

    /// Suggestions for the word under the cursor, sorted by name for
    /// command names.
    pub fn complete(&self, request: &CompletionRequest<'_>) -> Vec<String> {
        let before = request.before_cursor;
        let Ok(mut tokens) = tokenize(before).into_result() else {
            return Vec::new();
        };
        if before.is_empty() || before.ends_with(' ') {
            tokens.push("");
        }
        tracing::debug!(?tokens, "completing");

        match tokens.as_slice() {
            [] => Vec::new(),
            [prefix] => complete_names(self.commands.keys().map(String::as_str), prefix),
            [name, rest @ ..] => match self.commands.get(*name) {
                Some(command) => command.complete(rest, request, self),
                None => Vec::new(),
            },
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("settings", &self.settings)
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish()
    }
}
