/// A classified token: either a bare positional string or a structured
/// option record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A bare string (command name, argument, or an option's companion value)
    Positional(String),
    /// An option flag such as `-a`, `-a=1`, `--age` or `--age=1`
    Option(OptionInput),
}

/// An option as it appeared in the input.
///
/// `value` is `Some` only when the value was attached with `=` or reunited
/// with the flag by the compressor. `Some("")` (from `--name=`) is kept
/// distinct from `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionInput {
    pub name: String,
    pub value: Option<String>,
}

impl OptionInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Whether the option was given by its single-character short name.
    pub fn is_short(&self) -> bool {
        self.name.chars().count() == 1
    }

    /// The flag as the user typed it, without any value (`-a` or `--age`).
    pub fn flag(&self) -> String {
        if self.is_short() {
            format!("-{}", self.name)
        } else {
            format!("--{}", self.name)
        }
    }
}

/// Characters allowed in option names, long and short.
pub fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub(crate) fn is_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_name_char)
}

/// Classify raw tokens into positional strings and option records.
///
/// Grammar, tried in order for each token:
/// 1. `-c` -> option `c`
/// 2. `-c=value` -> option `c` with `value` (which may be empty or contain anything)
/// 3. `-abc` -> grouped short options `a`, `b`, `c`
/// 4. `--name` (two or more name characters) -> option `name`
/// 5. `--name=value` -> option `name` with `value`
/// 6. anything else is positional, passed through unchanged
pub fn classify<I, S>(tokens: I) -> Vec<Token>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut output = Vec::new();
    for token in tokens {
        classify_into(token.as_ref(), &mut output);
    }
    output
}

fn classify_into(raw: &str, output: &mut Vec<Token>) {
    if let Some(long) = raw.strip_prefix("--") {
        let (name, value) = match long.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (long, None),
        };
        if name.len() >= 2 && is_name(name) {
            output.push(Token::Option(OptionInput {
                name: name.to_string(),
                value: value.map(str::to_string),
            }));
            return;
        }
    } else if let Some(short) = raw.strip_prefix('-') {
        match short.split_once('=') {
            Some((name, value)) if name.len() == 1 && is_name(name) => {
                output.push(Token::Option(OptionInput::with_value(name, value)));
                return;
            }
            Some(_) => {}
            // A single character is the plain short form; more are a group.
            None if is_name(short) => {
                output.extend(
                    short
                        .chars()
                        .map(|c| Token::Option(OptionInput::new(c.to_string()))),
                );
                return;
            }
            None => {}
        }
    }

    output.push(Token::Positional(raw.to_string()));
}
