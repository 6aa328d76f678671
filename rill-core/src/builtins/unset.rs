use clap::Parser;

use crate::{builtins, commands};

/// Unset an environment variable.
#[derive(Parser)]
pub(crate) struct UnsetCommand {
    /// Name of the variable to unset.
    #[clap(allow_hyphen_values = true)]
    name: Option<String>,
}

impl builtins::Command for UnsetCommand {
    fn execute(
        &self,
        mut context: commands::ExecutionContext<'_>,
    ) -> Result<builtins::ExitCode, crate::error::Error> {
        context.close_stdin()?;

        if let Some(name) = &self.name {
            if !name.is_empty() && !name.contains(['=', '\0']) {
                std::env::remove_var(name);
            }
        }

        Ok(builtins::ExitCode::Success)
    }
}
