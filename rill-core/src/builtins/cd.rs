use std::io::Write;
use std::path::PathBuf;

use clap::Parser;

use crate::{builtins, commands};

/// Change the current shell working directory.
#[derive(Parser)]
pub(crate) struct CdCommand {
    /// Directory to change to.
    target_dir: Option<PathBuf>,
}

impl builtins::Command for CdCommand {
    fn execute(
        &self,
        mut context: commands::ExecutionContext<'_>,
    ) -> Result<builtins::ExitCode, crate::error::Error> {
        context.close_stdin()?;

        let Some(target_dir) = &self.target_dir else {
            writeln!(context.stderr(), "cd: missing directory operand")?;
            return Ok(builtins::ExitCode::Custom(-1));
        };

        match std::env::set_current_dir(target_dir) {
            Ok(()) => Ok(builtins::ExitCode::Success),
            Err(e) => {
                writeln!(context.stderr(), "cd: {e}")?;
                Ok(builtins::ExitCode::Custom(-1))
            }
        }
    }
}
