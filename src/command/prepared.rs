use std::collections::HashMap;
use std::fmt;

use crate::command::{
    ArgumentDef, ArityError, CompletionOverride, DispatchError, Handler, Namespace, OptionDef,
    UnknownCommandError,
};
use crate::grammar::{GrammarError, Token, classify, compress, group};

/// A validated command tree, ready for dispatch and completion.
///
/// Produced by [`Command::prepare`](crate::command::Command::prepare).
/// Subcommands and options are sorted by name; arguments keep their
/// declared order.
pub struct PreparedCommand<C> {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) group: Option<String>,
    pub(crate) kind: CommandKind<C>,
}

pub(crate) enum CommandKind<C> {
    Branch {
        subcommands: Vec<PreparedCommand<C>>,
        index: HashMap<String, usize>,
    },
    Leaf(Leaf<C>),
}

pub(crate) struct Leaf<C> {
    pub(crate) options: Vec<OptionDef<C>>,
    pub(crate) arguments: Vec<ArgumentDef<C>>,
    pub(crate) long_index: HashMap<String, usize>,
    pub(crate) short_index: HashMap<char, usize>,
    pub(crate) handler: Handler<C>,
    pub(crate) complete_override: Option<CompletionOverride<C>>,
}

/// A resolved command path with its bound namespace, not yet run.
pub struct Invocation<'a, C> {
    /// Command names from the root of the walk down to the leaf
    pub path: Vec<String>,
    pub command: &'a PreparedCommand<C>,
    pub namespace: Namespace,
    handler: &'a Handler<C>,
}

impl<C> Invocation<'_, C> {
    /// Run the leaf's handler. Its error is returned unchanged.
    pub fn invoke(&self, ctx: &mut C) -> Result<(), DispatchError> {
        (self.handler)(&self.namespace, ctx).map_err(DispatchError::Handler)
    }
}

impl<C> PreparedCommand<C> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, CommandKind::Leaf(_))
    }

    pub fn subcommands(&self) -> &[PreparedCommand<C>] {
        match &self.kind {
            CommandKind::Branch { subcommands, .. } => subcommands,
            CommandKind::Leaf(_) => &[],
        }
    }

    /// Case-sensitive lookup of a direct subcommand.
    pub fn subcommand(&self, name: &str) -> Option<&PreparedCommand<C>> {
        match &self.kind {
            CommandKind::Branch { subcommands, index } => {
                index.get(name).map(|&position| &subcommands[position])
            }
            CommandKind::Leaf(_) => None,
        }
    }

    /// Follow a path of subcommand names down from this command.
    pub fn find<S: AsRef<str>>(&self, path: &[S]) -> Option<&PreparedCommand<C>> {
        path.iter()
            .try_fold(self, |command, name| command.subcommand(name.as_ref()))
    }

    pub fn options(&self) -> &[OptionDef<C>] {
        match &self.kind {
            CommandKind::Leaf(leaf) => &leaf.options,
            CommandKind::Branch { .. } => &[],
        }
    }

    pub fn arguments(&self) -> &[ArgumentDef<C>] {
        match &self.kind {
            CommandKind::Leaf(leaf) => &leaf.arguments,
            CommandKind::Branch { .. } => &[],
        }
    }

    /// Look up an option by long name, or by short name for a single
    /// character.
    pub fn resolve_option(&self, name: &str) -> Option<&OptionDef<C>> {
        match &self.kind {
            CommandKind::Leaf(leaf) => leaf.resolve_option(name),
            CommandKind::Branch { .. } => None,
        }
    }

    /// Resolve the subcommand path in `tokens` (which follow this command's
    /// own name) and bind the leaf's options and arguments.
    pub fn bind(&self, tokens: Vec<Token>) -> Result<Invocation<'_, C>, DispatchError> {
        let mut path = vec![self.name.clone()];
        let mut command = self;
        let mut tokens = tokens.into_iter();

        loop {
            match &command.kind {
                CommandKind::Branch { .. } => {
                    let name = match tokens.next() {
                        Some(Token::Positional(name)) => name,
                        Some(Token::Option(input)) => {
                            return Err(UnknownCommandError::NotACommand(input.flag()).into());
                        }
                        None => {
                            return Err(UnknownCommandError::MissingSubcommand(path.join(" ")).into());
                        }
                    };
                    command = command.subcommand(&name).ok_or_else(|| {
                        UnknownCommandError::UnknownSubcommand {
                            parent: path.join(" "),
                            name: name.clone(),
                        }
                    })?;
                    path.push(name);
                }
                CommandKind::Leaf(leaf) => {
                    let namespace = leaf.bind(tokens.collect())?;
                    tracing::debug!(command = %path.join(" "), "resolved command");
                    return Ok(Invocation {
                        path,
                        command,
                        namespace,
                        handler: &leaf.handler,
                    });
                }
            }
        }
    }

    /// Bind `tokens` and run the resolved handler.
    pub fn execute(&self, tokens: Vec<Token>, ctx: &mut C) -> Result<(), DispatchError> {
        self.bind(tokens)?.invoke(ctx)
    }

    /// Execute pre-split arguments, skipping tokenization.
    pub fn process<I, S>(&self, args: I, ctx: &mut C) -> Result<(), DispatchError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.execute(classify(args), ctx)
    }
}

impl<C> Leaf<C> {
    pub(crate) fn resolve_option(&self, name: &str) -> Option<&OptionDef<C>> {
        let mut chars = name.chars();
        let position = match (chars.next(), chars.next()) {
            (Some(short), None) => self.short_index.get(&short),
            _ => self.long_index.get(name),
        };
        position.map(|&position| &self.options[position])
    }

    fn bind(&self, tokens: Vec<Token>) -> Result<Namespace, DispatchError> {
        let mut namespace = Namespace::new();
        for argument in &self.arguments {
            argument.seed(&mut namespace);
        }
        for option in &self.options {
            option.seed(&mut namespace);
        }

        let compressed = compress(tokens, |name| self.resolve_option(name))?;
        tracing::trace!(tokens = ?compressed, "compressed tokens");
        let grouped = group(compressed)?;

        for input in &grouped.options {
            let option = self
                .resolve_option(&input.name)
                .ok_or_else(|| GrammarError::UnknownOption(input.flag()))?;
            option.apply(input, &mut namespace)?;
        }

        for (position, raw) in grouped.positionals.iter().enumerate() {
            let argument = match self.arguments.get(position) {
                Some(argument) => argument,
                None => match self.arguments.last() {
                    Some(last) if last.array => last,
                    _ => return Err(ArityError::Unexpected(raw.clone()).into()),
                },
            };
            argument.apply(raw, &mut namespace)?;
        }

        for option in &self.options {
            option.finish(&mut namespace)?;
        }
        for argument in &self.arguments {
            argument.finish(&mut namespace)?;
        }
        Ok(namespace)
    }
}

impl<C> fmt::Debug for PreparedCommand<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("PreparedCommand");
        debug
            .field("name", &self.name)
            .field("description", &self.description)
            .field("group", &self.group);
        match &self.kind {
            CommandKind::Branch { subcommands, .. } => debug.field("subcommands", subcommands),
            CommandKind::Leaf(leaf) => debug
                .field("options", &leaf.options)
                .field("arguments", &leaf.arguments),
        };
        debug.finish_non_exhaustive()
    }
}
