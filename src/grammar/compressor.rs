use crate::grammar::{GrammarError, Token};

/// What the compressor needs to know about a declared option.
pub trait OptionShape {
    /// Whether the option takes its value from the following token when no
    /// `=` value was given.
    fn takes_companion(&self) -> bool;

    /// The option's invocation form for error messages (e.g. `-a/--age`).
    fn invocation(&self) -> String;
}

/// Reunite option flags with their separately typed values.
///
/// For every option token without an inline value whose declaration takes a
/// companion, the next token must be positional and becomes the option's
/// value. `resolve` maps a short or long name to the declaration; unknown
/// names fail here.
pub fn compress<'d, O, F>(tokens: Vec<Token>, resolve: F) -> Result<Vec<Token>, GrammarError>
where
    O: OptionShape + 'd,
    F: Fn(&str) -> Option<&'d O>,
{
    let mut compressed = Vec::with_capacity(tokens.len());
    let mut tokens = tokens.into_iter();

    while let Some(token) = tokens.next() {
        let mut input = match token {
            Token::Option(input) => input,
            positional => {
                compressed.push(positional);
                continue;
            }
        };

        let shape = resolve(input.name.as_str())
            .ok_or_else(|| GrammarError::UnknownOption(input.flag()))?;

        if input.value.is_none() && shape.takes_companion() {
            match tokens.next() {
                Some(Token::Positional(value)) => input.value = Some(value),
                _ => return Err(GrammarError::MissingCompanion(shape.invocation())),
            }
        }
        compressed.push(Token::Option(input));
    }

    Ok(compressed)
}
