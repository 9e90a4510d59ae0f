use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::command::prepared::{CommandKind, Leaf};
use crate::command::{
    ArgumentDef, CompletionOverride, CompletionRequest, Handler, Namespace, OptionDef,
    PreparedCommand, StructuralError, StructuralViolation,
};
use crate::grammar::Token;

/// A command as declared by the embedding application.
///
/// A command either has subcommands, or its own options, arguments and
/// handler. Call [`Command::prepare`] to validate the tree before use.
pub struct Command<C> {
    pub name: String,
    pub description: String,
    /// Heading the command is listed under in help output
    pub group: Option<String>,
    pub subcommands: Vec<Command<C>>,
    pub options: Vec<OptionDef<C>>,
    pub arguments: Vec<ArgumentDef<C>>,
    pub handler: Option<Handler<C>>,
    pub complete_override: Option<CompletionOverride<C>>,
}

impl<C> Command<C> {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            group: None,
            subcommands: Vec::new(),
            options: Vec::new(),
            arguments: Vec::new(),
            handler: None,
            complete_override: None,
        }
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn subcommand(mut self, command: Command<C>) -> Self {
        self.subcommands.push(command);
        self
    }

    pub fn option(mut self, option: OptionDef<C>) -> Self {
        self.options.push(option);
        self
    }

    pub fn argument(mut self, argument: ArgumentDef<C>) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn handler(
        mut self,
        handler: impl Fn(&Namespace, &mut C) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.handler = Some(Box::new(handler));
        self
    }

    pub fn complete_with(
        mut self,
        complete: impl Fn(&[Token], &CompletionRequest<'_>, &C) -> Vec<String> + 'static,
    ) -> Self {
        self.complete_override = Some(Box::new(complete));
        self
    }

    /// Validate the whole tree and build its lookup indices.
    pub fn prepare(self) -> Result<PreparedCommand<C>, StructuralError> {
        let path = display_name(&self.name, 0);
        self.prepare_at(path)
    }

    fn prepare_at(self, path: String) -> Result<PreparedCommand<C>, StructuralError> {
        let Command {
            name,
            description,
            group,
            subcommands,
            mut options,
            mut arguments,
            handler,
            complete_override,
        } = self;
        let at = |violation: StructuralViolation| StructuralError::new(path.as_str(), violation);

        if name.trim().is_empty() {
            return Err(at(StructuralViolation::MissingName));
        }
        if description.trim().is_empty() {
            return Err(at(StructuralViolation::MissingDescription));
        }

        let kind = if !subcommands.is_empty() {
            if handler.is_some() {
                return Err(at(StructuralViolation::BranchWithHandler));
            }
            if !options.is_empty() {
                return Err(at(StructuralViolation::BranchWithOptions));
            }
            if !arguments.is_empty() {
                return Err(at(StructuralViolation::BranchWithArguments));
            }
            if complete_override.is_some() {
                return Err(at(StructuralViolation::BranchWithCompletion));
            }

            let mut prepared = subcommands
                .into_iter()
                .enumerate()
                .map(|(position, child)| {
                    let child_path = format!("{path} {}", display_name(&child.name, position));
                    child.prepare_at(child_path)
                })
                .collect::<Result<Vec<_>, _>>()?;
            prepared.sort_by(|a, b| a.name.cmp(&b.name));

            if let Some(pair) = prepared.windows(2).find(|pair| pair[0].name == pair[1].name) {
                return Err(at(StructuralViolation::DuplicateSubcommand(
                    pair[0].name.clone(),
                )));
            }
            let index = prepared
                .iter()
                .enumerate()
                .map(|(position, child)| (child.name.clone(), position))
                .collect();
            CommandKind::Branch {
                subcommands: prepared,
                index,
            }
        } else {
            let handler = handler.ok_or_else(|| at(StructuralViolation::MissingHandler))?;

            let mut names = HashSet::new();
            let mut shorts = HashSet::new();
            for option in &mut options {
                option.prepare().map_err(at)?;
                if !names.insert(option.name.clone()) {
                    return Err(at(StructuralViolation::DuplicateName(option.name.clone())));
                }
                if let Some(short) = option.short
                    && !shorts.insert(short)
                {
                    return Err(at(StructuralViolation::DuplicateShortName(short)));
                }
            }
            let count = arguments.len();
            for (position, argument) in arguments.iter_mut().enumerate() {
                argument.prepare(position + 1 == count).map_err(at)?;
                if !names.insert(argument.name.clone()) {
                    return Err(at(StructuralViolation::DuplicateName(argument.name.clone())));
                }
            }

            options.sort_by(|a, b| a.name.cmp(&b.name));
            let long_index: HashMap<String, usize> = options
                .iter()
                .enumerate()
                .map(|(position, option)| (option.name.clone(), position))
                .collect();
            let short_index: HashMap<char, usize> = options
                .iter()
                .enumerate()
                .filter_map(|(position, option)| option.short.map(|short| (short, position)))
                .collect();

            CommandKind::Leaf(Leaf {
                options,
                arguments,
                long_index,
                short_index,
                handler,
                complete_override,
            })
        };

        Ok(PreparedCommand {
            name,
            description,
            group,
            kind,
        })
    }
}

fn display_name(name: &str, position: usize) -> String {
    if name.trim().is_empty() {
        format!("#{position}")
    } else {
        name.to_string()
    }
}

impl<C> fmt::Debug for Command<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("group", &self.group)
            .field("subcommands", &self.subcommands)
            .field("options", &self.options)
            .field("arguments", &self.arguments)
            .field("handler", &self.handler.is_some())
            .finish_non_exhaustive()
    }
}
