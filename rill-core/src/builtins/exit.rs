use std::io::Write;

use clap::Parser;

use crate::{builtins, commands};

/// Exit the shell.
#[derive(Parser)]
pub(crate) struct ExitCommand {
    /// The exit code to return; non-numeric operands count as 0.
    code: Option<String>,
}

impl builtins::Command for ExitCommand {
    fn execute(
        &self,
        _context: commands::ExecutionContext<'_>,
    ) -> Result<builtins::ExitCode, crate::error::Error> {
        let code = self
            .code
            .as_ref()
            .map_or(0, |code| code.parse().unwrap_or(0));

        // The whole process terminates, even from a capture subshell.
        let _ = std::io::stdout().flush();
        std::process::exit(code);
    }
}
