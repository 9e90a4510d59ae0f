use crate::grammar::TokenizeError;

/// Raw tokens split from a line, plus whether a quote was left open.
///
/// An open quote must be treated as a failure by executing callers; the
/// completion path treats it as "nothing to suggest".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized<'a> {
    pub tokens: Vec<&'a str>,
    pub unterminated_quote: bool,
}

impl<'a> Tokenized<'a> {
    /// Return the tokens, or `UnterminatedQuote` if a quote was left open.
    pub fn into_result(self) -> Result<Vec<&'a str>, TokenizeError> {
        if self.unterminated_quote {
            Err(TokenizeError::UnterminatedQuote)
        } else {
            Ok(self.tokens)
        }
    }
}

/// Split a line into tokens on unquoted runs of spaces.
///
/// Handles:
/// - Single- and double-quoted regions, which may contain spaces
/// - A token that both starts and ends with the same quote character has
///   those quotes stripped; its interior is kept verbatim
/// - A quote only closes on the character that opened it (`"` is literal
///   inside `'...'` and vice versa)
/// - Empty tokens are dropped
pub fn tokenize(line: &str) -> Tokenized<'_> {
    let mut tokens = Vec::new();
    let mut open_quote: Option<char> = None;
    let mut token_start = 0;

    for (pos, ch) in line.char_indices() {
        match ch {
            ' ' if open_quote.is_none() => {
                push_token(&mut tokens, &line[token_start..pos]);
                token_start = pos;
            }
            '"' | '\'' => match open_quote {
                Some(quote) if quote == ch => open_quote = None,
                Some(_) => {}
                None => open_quote = Some(ch),
            },
            _ => {}
        }
    }
    push_token(&mut tokens, &line[token_start..]);

    Tokenized {
        tokens,
        unterminated_quote: open_quote.is_some(),
    }
}

fn push_token<'a>(tokens: &mut Vec<&'a str>, raw: &'a str) {
    let token = strip_quotes(raw.trim_matches(' '));
    if !token.is_empty() {
        tokens.push(token);
    }
}

fn strip_quotes(token: &str) -> &str {
    for quote in ['"', '\''] {
        if token.len() >= 2 && token.starts_with(quote) && token.ends_with(quote) {
            return &token[1..token.len() - 1];
        }
    }
    token
}

/// Join pre-split arguments (e.g. from `std::env::args`) into a single line
/// that tokenizes back into the same arguments.
///
/// Arguments containing a space or a quote are wrapped in double quotes, or
/// in single quotes when they already contain a double quote.
pub fn join_args<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter()
        .map(|arg| {
            let arg = arg.as_ref();
            if !arg.contains([' ', '"', '\'']) {
                arg.to_string()
            } else if !arg.contains('"') {
                format!("\"{arg}\"")
            } else {
                format!("'{arg}'")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
