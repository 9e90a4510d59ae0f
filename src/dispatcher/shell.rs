use std::process::Command;

use crate::command::DispatchError;
use crate::grammar::tokenize;

/// Run the text after a leading `!` as an external program with inherited
/// stdio and wait for it.
pub(crate) fn run(line: &str) -> Result<(), DispatchError> {
    let argv = tokenize(line).into_result()?;
    let Some((program, args)) = argv.split_first() else {
        return Err(DispatchError::EmptyInput);
    };
    tracing::debug!(program, ?args, "running shell escape");

    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|source| DispatchError::ShellEscape {
            program: program.to_string(),
            source,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(DispatchError::ShellEscapeStatus {
            program: program.to_string(),
            status,
        })
    }
}
