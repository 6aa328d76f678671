//! Command composition and execution context.

use std::process::Stdio;

use crate::openfiles::{self, OpenFile, OpenFiles};
use crate::{error, Shell};

/// Represents the context in which a built-in command executes.
pub struct ExecutionContext<'a> {
    /// The shell in which the command is being executed.
    pub shell: &'a mut Shell,
    /// The name of the command being executed.
    pub command_name: String,
    /// The endpoints wired up for this command.
    pub open_files: OpenFiles,
}

impl ExecutionContext<'_> {
    /// Returns the standard output stream for this command; usable with
    /// `write!` et al.
    pub fn stdout(&mut self) -> &mut OpenFile {
        &mut self.open_files.stdout
    }

    /// Returns the standard error stream for this command.
    pub fn stderr(&mut self) -> &mut OpenFile {
        &mut self.open_files.stderr
    }

    /// Releases this command's input descriptor. Built-ins that consume no
    /// input call this up front so an upstream pipeline stage observes EOF
    /// without waiting for the built-in to return.
    pub fn close_stdin(&mut self) -> Result<(), error::Error> {
        self.open_files.stdin = openfiles::null()?;
        Ok(())
    }
}

/// Composes a `std::process::Command` for the given argument vector, wiring
/// its standard streams from the provided endpoints. The child inherits this
/// process's environment and working directory.
pub(crate) fn compose_std_command(args: &[String], open_files: OpenFiles) -> std::process::Command {
    let mut cmd = std::process::Command::new(&args[0]);
    cmd.args(&args[1..]);

    let OpenFiles {
        stdin,
        stdout,
        stderr,
    } = open_files;

    let as_stdio: Stdio = stdin.into();
    cmd.stdin(as_stdio);

    let as_stdio: Stdio = stdout.into();
    cmd.stdout(as_stdio);

    let as_stdio: Stdio = stderr.into();
    cmd.stderr(as_stdio);

    cmd
}
