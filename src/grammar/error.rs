#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizeError {
    #[error("unterminated quotation mark")]
    UnterminatedQuote,
}

/// Violations of the option/argument grammar detected while compressing,
/// grouping or applying tokens to a leaf command.
///
/// Option names are carried in their invocation form (`-a`, `--age` or
/// `-a/--attribute`) so messages can be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("unknown option {0}")]
    UnknownOption(String),
    #[error("options must precede positional arguments (found {0})")]
    OptionAfterPositional(String),
    #[error("option {0} requires a companion argument")]
    MissingCompanion(String),
    #[error("option {0} does not accept an \"=\" assignment")]
    AssignmentNotAllowed(String),
    #[error("option {0} must specify a value")]
    MissingValue(String),
    #[error("option {0} is required")]
    MissingRequired(String),
    #[error("\"{value}\" is not a valid value for {name} (expected one of: {})", .allowed.join(", "))]
    NotAMember {
        name: String,
        value: String,
        allowed: Vec<String>,
    },
}
