use std::io::Write;
use std::path::PathBuf;

use clap::Parser;

use crate::error::Error;
use crate::interp::{ExecutionParameters, ExecutionResult};
use crate::{builtins, commands};

/// Read and execute the contents of each named file, line by line.
#[derive(Parser)]
pub(crate) struct SourceCommand {
    /// Paths of the scripts to run.
    script_paths: Vec<PathBuf>,
}

impl builtins::Command for SourceCommand {
    fn execute(
        &self,
        context: commands::ExecutionContext<'_>,
    ) -> Result<builtins::ExitCode, Error> {
        let commands::ExecutionContext {
            shell, open_files, ..
        } = context;
        let mut params = ExecutionParameters { open_files };

        let mut last = ExecutionResult::success();
        for path in &self.script_paths {
            match shell.source_file(path, &params) {
                Ok(result) => {
                    last = result;
                    if last.is_fatal() {
                        break;
                    }
                }
                Err(Error::FailedSourcingFile(failed_path, e)) => {
                    writeln!(
                        params.open_files.stderr,
                        "source: failed to open {}: {e}",
                        failed_path.display()
                    )?;
                    return Ok(builtins::ExitCode::Custom(e.raw_os_error().unwrap_or(1)));
                }
                Err(e) => return Err(e),
            }
        }

        Ok(builtins::ExitCode::Custom(last.exit_code))
    }
}
