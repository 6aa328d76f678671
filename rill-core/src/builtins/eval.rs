use clap::Parser;

use crate::{builtins, commands, interp, trace_categories};

/// Re-expand the given words and run them as one command.
#[derive(Parser)]
pub(crate) struct EvalCommand {
    /// The words to evaluate.
    #[clap(allow_hyphen_values = true)]
    args: Vec<String>,
}

impl builtins::Command for EvalCommand {
    fn execute(
        &self,
        context: commands::ExecutionContext<'_>,
    ) -> Result<builtins::ExitCode, crate::error::Error> {
        if self.args.is_empty() {
            return Ok(builtins::ExitCode::Success);
        }

        // Each word is re-wrapped in quotes so the rejoined string splits
        // back into the same words. Not faithful for words containing a
        // literal quote; a known limitation.
        let quoted = format!("\"{}\"", self.args.join("\" \""));
        tracing::debug!(target: trace_categories::COMMANDS, "evaluating: {quoted}");

        let commands::ExecutionContext {
            shell, open_files, ..
        } = context;

        let expanded = shell.expand(&quoted)?;
        let exit_code = interp::execute_command_string(shell, &expanded, open_files)?;

        Ok(builtins::ExitCode::Custom(exit_code))
    }
}
