use std::collections::BTreeMap;

use anyhow::anyhow;

use crate::command::PreparedCommand;
use crate::dispatcher::Dispatcher;

/// Help text for `path`, or the command overview when `path` is empty.
pub fn render(dispatcher: &Dispatcher, path: &[&str]) -> anyhow::Result<String> {
    let Some((first, rest)) = path.split_first() else {
        return Ok(overview(dispatcher));
    };
    let unknown = |name: &str| anyhow!("unknown command or subcommand \"{name}\"");

    let mut command = dispatcher.command(first).ok_or_else(|| unknown(*first))?;
    for name in rest {
        command = command.subcommand(name).ok_or_else(|| unknown(*name))?;
    }
    Ok(command_help(command, &path.join(" ")))
}

/// Every registered command under its group heading. Groups and the
/// commands within them are sorted by name.
pub fn overview(dispatcher: &Dispatcher) -> String {
    let heading = dispatcher.settings().default_heading.as_str();
    let mut groups: BTreeMap<&str, Vec<(String, &str)>> = BTreeMap::new();
    for command in dispatcher.commands() {
        groups
            .entry(command.group().unwrap_or(heading))
            .or_default()
            .push((command.name().to_string(), command.description()));
    }

    let mut out = String::new();
    for (group, rows) in &groups {
        out.push_str(&format!("{group}:\n"));
        out.push_str(&table(rows));
        out.push('\n');
    }
    out
}

/// Usage and declarations of one command. `path` is the full command path
/// shown in the usage line.
pub fn command_help<C>(command: &PreparedCommand<C>, path: &str) -> String {
    let mut out = format!("{}\n\nusage: {path}", command.description());

    if !command.is_leaf() {
        out.push_str(" <subcommand>\n\nsubcommands:\n");
        let rows: Vec<(String, &str)> = command
            .subcommands()
            .iter()
            .map(|sub| (sub.name().to_string(), sub.description()))
            .collect();
        out.push_str(&table(&rows));
        return out;
    }

    if !command.options().is_empty() {
        out.push_str(" [<options...>]");
    }
    for argument in command.arguments() {
        out.push(' ');
        out.push_str(&argument.usage());
    }
    out.push('\n');

    if !command.arguments().is_empty() {
        let rows: Vec<(String, &str)> = command
            .arguments()
            .iter()
            .map(|argument| (argument.name.clone(), argument.description.as_str()))
            .collect();
        out.push_str("\narguments:\n");
        out.push_str(&table(&rows));
    }

    if !command.options().is_empty() {
        let rows: Vec<(String, String)> = command
            .options()
            .iter()
            .map(|option| {
                let description = match &option.default {
                    Some(default) => format!("{} (default: {default})", option.description),
                    None => option.description.clone(),
                };
                (option.invocation(), description)
            })
            .collect();
        out.push_str("\noptions:\n");
        out.push_str(&table(&rows));
    }
    out
}

fn table<S: AsRef<str>>(rows: &[(String, S)]) -> String {
    let width = rows
        .iter()
        .map(|(left, _)| left.chars().count())
        .max()
        .unwrap_or(0);
    rows.iter()
        .map(|(left, right)| format!("  {left:<width$}  {}\n", right.as_ref()))
        .collect()
}
