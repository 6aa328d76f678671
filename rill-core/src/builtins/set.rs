use std::io::Write;

use clap::Parser;

use crate::{builtins, commands};

/// Manipulate environment variables.
#[derive(Parser)]
pub(crate) struct SetCommand {
    /// Name of the variable to set; with no operands, the whole environment
    /// is printed.
    #[clap(allow_hyphen_values = true)]
    name: Option<String>,

    /// Value to assign; defaults to the empty string.
    #[clap(allow_hyphen_values = true)]
    value: Option<String>,
}

impl builtins::Command for SetCommand {
    fn execute(
        &self,
        mut context: commands::ExecutionContext<'_>,
    ) -> Result<builtins::ExitCode, crate::error::Error> {
        context.close_stdin()?;

        if let Some(name) = &self.name {
            if name.is_empty() || name.contains(['=', '\0']) {
                writeln!(context.stderr(), "set: invalid variable name: {name}")?;
                return Ok(builtins::ExitCode::Custom(1));
            }
            std::env::set_var(name, self.value.as_deref().unwrap_or(""));
        } else {
            for (name, value) in std::env::vars() {
                writeln!(context.stdout(), "{name}={value}")?;
            }
        }

        Ok(builtins::ExitCode::Success)
    }
}
