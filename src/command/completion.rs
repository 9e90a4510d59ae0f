use crate::command::prepared::{CommandKind, Leaf};
use crate::command::{Completer, PreparedCommand};
use crate::grammar::{Token, classify, compress};

/// A completion query: the text before and after the cursor, and the full
/// line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionRequest<'a> {
    pub before_cursor: &'a str,
    pub after_cursor: &'a str,
    pub full: &'a str,
}

impl<'a> CompletionRequest<'a> {
    pub fn new(before_cursor: &'a str, after_cursor: &'a str, full: &'a str) -> Self {
        Self {
            before_cursor,
            after_cursor,
            full,
        }
    }

    /// A request with the cursor at the end of `line`.
    pub fn at_end(line: &'a str) -> Self {
        Self::new(line, "", line)
    }

    /// The same request with its first word removed, as seen by a command
    /// that completes on behalf of the rest of the line.
    pub fn without_first_word(&self) -> Self {
        Self::new(
            strip_first_word(self.before_cursor),
            self.after_cursor,
            strip_first_word(self.full),
        )
    }
}

fn strip_first_word(text: &str) -> &str {
    let text = text.trim_start_matches(' ');
    match text.find(' ') {
        Some(end) => text[end..].trim_start_matches(' '),
        None => "",
    }
}

/// Names starting with `prefix`, sorted. A lone exact match means there is
/// nothing left to complete.
pub fn complete_names<'n, I>(names: I, prefix: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'n str>,
{
    let mut matches: Vec<String> = names
        .into_iter()
        .filter(|name| name.starts_with(prefix))
        .map(str::to_string)
        .collect();
    if matches.len() == 1 && matches[0] == prefix {
        return Vec::new();
    }
    matches.sort();
    matches
}

pub(crate) fn suggest<C>(
    member_of: &[String],
    completer: Option<&Completer<C>>,
    prefix: &str,
    ctx: &C,
) -> Vec<String> {
    if let Some(completer) = completer {
        return completer(prefix, ctx);
    }
    member_of
        .iter()
        .filter(|member| member.starts_with(prefix))
        .cloned()
        .collect()
}

impl<C> PreparedCommand<C> {
    /// Complete below this command.
    ///
    /// `tokens` are the raw tokens after this command's name; the last one
    /// is the partially typed word (empty when the cursor follows a space).
    pub fn complete(&self, tokens: &[&str], request: &CompletionRequest<'_>, ctx: &C) -> Vec<String> {
        match &self.kind {
            CommandKind::Leaf(leaf) => leaf.complete(tokens, request, ctx),
            CommandKind::Branch { subcommands, .. } => match tokens {
                [] => Vec::new(),
                [prefix] => complete_names(subcommands.iter().map(PreparedCommand::name), prefix),
                [name, rest @ ..] => match self.subcommand(name) {
                    Some(command) => command.complete(rest, request, ctx),
                    None => Vec::new(),
                },
            },
        }
    }
}

impl<C> Leaf<C> {
    fn complete(&self, tokens: &[&str], request: &CompletionRequest<'_>, ctx: &C) -> Vec<String> {
        let Some(prefix) = tokens.last() else {
            return Vec::new();
        };
        let classified = classify(tokens);
        if matches!(classified.last(), Some(Token::Option(_))) {
            return Vec::new();
        }
        let Ok(compressed) = compress(classified, |name| self.resolve_option(name)) else {
            return Vec::new();
        };
        tracing::debug!(tokens = ?compressed, "completion scope");

        if let Some(complete) = &self.complete_override {
            return complete(&compressed, request, ctx);
        }

        match compressed.last() {
            Some(Token::Option(input)) => self
                .resolve_option(&input.name)
                .map(|option| option.suggest(prefix, ctx))
                .unwrap_or_default(),
            Some(Token::Positional(_)) => {
                let supplied = compressed
                    .iter()
                    .filter(|token| matches!(token, Token::Positional(_)))
                    .count();
                let argument = match self.arguments.get(supplied - 1) {
                    Some(argument) => argument,
                    None => match self.arguments.last() {
                        Some(last) if last.array => last,
                        _ => return Vec::new(),
                    },
                };
                argument.suggest(prefix, ctx)
            }
            None => Vec::new(),
        }
    }
}
