use std::fmt;
use std::process::ExitStatus;

use crate::command::ValueType;
use crate::grammar::{GrammarError, TokenizeError};

/// Whether a declaration is an option or a positional argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Option,
    Argument,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Option => f.write_str("option"),
            Self::Argument => f.write_str("argument"),
        }
    }
}

/// A command tree that failed preparation.
///
/// `path` is the space-separated command path of the offending node; nodes
/// without a name appear as `#<index>` among their siblings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid command \"{path}\": {violation}")]
pub struct StructuralError {
    pub path: String,
    pub violation: StructuralViolation,
}

impl StructuralError {
    pub fn new(path: impl Into<String>, violation: StructuralViolation) -> Self {
        Self {
            path: path.into(),
            violation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StructuralViolation {
    #[error("command requires a name")]
    MissingName,
    #[error("command requires a description")]
    MissingDescription,
    #[error("commands with subcommands cannot declare a handler")]
    BranchWithHandler,
    #[error("commands with subcommands cannot declare their own options")]
    BranchWithOptions,
    #[error("commands with subcommands cannot declare their own arguments")]
    BranchWithArguments,
    #[error("commands with subcommands cannot override completion")]
    BranchWithCompletion,
    #[error("commands without subcommands require a handler")]
    MissingHandler,
    #[error("command \"{0}\" is already registered")]
    DuplicateCommand(String),
    #[error("subcommand \"{0}\" is declared more than once")]
    DuplicateSubcommand(String),
    #[error("name \"{0}\" is already used by another option or argument")]
    DuplicateName(String),
    #[error("short name -{0} is already used by another option")]
    DuplicateShortName(char),
    #[error("option name \"{0}\" must be at least 2 characters long")]
    OptionNameTooShort(String),
    #[error("option name \"{0}\" can only contain A-Z, a-z, 0-9 and _")]
    InvalidOptionName(String),
    #[error("short name '{short}' of option \"{option}\" must be one of A-Z, a-z, 0-9 and _")]
    InvalidShortName { option: String, short: char },
    #[error("argument name \"{0}\" must be at least 2 characters long")]
    ArgumentNameTooShort(String),
    #[error("{kind} \"{name}\" requires a description")]
    MissingSlotDescription { kind: SlotKind, name: String },
    #[error("argument \"{0}\" can only declare a default in the final position")]
    DefaultNotLast(String),
    #[error("argument \"{0}\" can only be an array in the final position")]
    ArrayNotLast(String),
    #[error("{kind} \"{name}\" cannot declare both a membership set and a completion function")]
    CompletionConflict { kind: SlotKind, name: String },
    #[error("option \"{0}\" cannot be an array and carry an implicit value")]
    ImplicitArray(String),
    #[error("option \"{0}\" implicit value must be a string, int, float or bool")]
    ImplicitNotScalar(String),
    #[error("{kind} \"{name}\" default does not match its declared type {expected}")]
    DefaultTypeMismatch {
        kind: SlotKind,
        name: String,
        expected: ValueType,
    },
}

/// A value that does not parse as its declared type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{owner} \"{name}\": \"{value}\" is not a valid {expected}")]
pub struct ConversionError {
    pub owner: SlotKind,
    pub name: String,
    pub expected: ValueType,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArityError {
    #[error("expected argument \"{0}\"")]
    Expected(String),
    #[error("unexpected argument \"{0}\"")]
    Unexpected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnknownCommandError {
    #[error("command \"{0}\" not found")]
    NotFound(String),
    #[error("\"{name}\" is not a valid subcommand of \"{parent}\"")]
    UnknownSubcommand { parent: String, name: String },
    #[error("\"{0}\" requires a subcommand")]
    MissingSubcommand(String),
    #[error("expected a command name, found option {0}")]
    NotACommand(String),
}

/// Any failure while turning a line into a handler invocation, or the
/// handler's own failure.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("no input supplied")]
    EmptyInput,
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error(transparent)]
    Arity(#[from] ArityError),
    #[error(transparent)]
    UnknownCommand(#[from] UnknownCommandError),
    #[error("failed to run \"{program}\": {source}")]
    ShellEscape {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("\"{program}\" failed: {status}")]
    ShellEscapeStatus { program: String, status: ExitStatus },
    /// Returned by the command's handler; passed through untouched.
    #[error(transparent)]
    Handler(anyhow::Error),
}
