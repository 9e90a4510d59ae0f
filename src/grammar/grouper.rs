use crate::grammar::{GrammarError, OptionInput, Token};

/// Options and positionals of a leaf command, each in input order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Grouped {
    pub options: Vec<OptionInput>,
    pub positionals: Vec<String>,
}

/// Split a compressed token stream into options and positionals.
///
/// Once the first positional has been seen, any further option is an error.
pub fn group(tokens: Vec<Token>) -> Result<Grouped, GrammarError> {
    let mut grouped = Grouped::default();

    for token in tokens {
        match token {
            Token::Positional(value) => grouped.positionals.push(value),
            Token::Option(input) if !grouped.positionals.is_empty() => {
                return Err(GrammarError::OptionAfterPositional(input.flag()));
            }
            Token::Option(input) => grouped.options.push(input),
        }
    }

    Ok(grouped)
}
