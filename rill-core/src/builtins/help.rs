use std::io::Write;

use clap::Parser;
use itertools::Itertools;

use crate::{builtins, commands};

/// Display help for the built-in commands.
#[derive(Parser)]
pub(crate) struct HelpCommand {}

impl builtins::Command for HelpCommand {
    fn execute(
        &self,
        mut context: commands::ExecutionContext<'_>,
    ) -> Result<builtins::ExitCode, crate::error::Error> {
        context.close_stdin()?;

        let commands::ExecutionContext {
            shell,
            mut open_files,
            ..
        } = context;

        for (name, registration) in shell.builtins.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
            writeln!(open_files.stdout, "{name}:")?;
            for line in registration.help_lines {
                writeln!(open_files.stdout, "\t{line}")?;
            }
        }

        Ok(builtins::ExitCode::Success)
    }
}
