//! Infrastructure for shell built-in commands.

use std::collections::HashMap;
use std::io::Write;

use clap::Parser;

use crate::{commands, error};

mod cd;
mod eval;
mod exit;
mod help;
mod set;
mod source;
mod unset;

/// Exit codes for built-in commands.
pub enum ExitCode {
    /// The command was successful.
    Success,
    /// The command returned a specific numerical exit code. Negative codes
    /// indicate failure and are fatal to the enclosing pipeline.
    Custom(i32),
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        match code {
            ExitCode::Success => 0,
            ExitCode::Custom(code) => code,
        }
    }
}

/// Trait implemented by built-in shell commands.
///
/// Contract: a handler receives the already word-split argument vector
/// (parsed through clap) and the endpoints wired up for its pipeline stage.
/// A handler that consumes no input closes its read end up front; all output
/// goes to the stage's write end; a non-negative status is success and a
/// negative status is failure.
pub trait Command: Parser {
    /// Instantiates the built-in command with the given arguments.
    fn new<I>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = String>,
    {
        Self::try_parse_from(args)
    }

    /// Executes the built-in command in the provided context.
    fn execute(
        &self,
        context: commands::ExecutionContext<'_>,
    ) -> Result<ExitCode, error::Error>;
}

/// Type of a function implementing a built-in command.
pub type CommandExecuteFunc =
    fn(commands::ExecutionContext<'_>, Vec<String>) -> Result<i32, error::Error>;

/// Encapsulates a registration for a built-in command.
#[derive(Clone)]
pub struct Registration {
    /// Function to execute the built-in.
    pub execute_func: CommandExecuteFunc,
    /// Help lines displayed by the `help` built-in.
    pub help_lines: &'static [&'static str],
}

/// Returns a built-in command registration, given an implementation of the
/// `Command` trait.
fn builtin<B: Command>(help_lines: &'static [&'static str]) -> Registration {
    Registration {
        execute_func: exec_builtin::<B>,
        help_lines,
    }
}

fn exec_builtin<B: Command>(
    mut context: commands::ExecutionContext<'_>,
    args: Vec<String>,
) -> Result<i32, error::Error> {
    let command = match B::new(args) {
        Ok(command) => command,
        Err(e) => {
            write!(context.stderr(), "{e}")?;
            return Ok(2);
        }
    };

    Ok(command.execute(context)?.into())
}

/// Returns the default set of built-in commands.
pub(crate) fn get_default_builtins() -> HashMap<String, Registration> {
    HashMap::from([
        (
            String::from("cd"),
            builtin::<cd::CdCommand>(&["change directory."]),
        ),
        (
            String::from("eval"),
            builtin::<eval::EvalCommand>(&["evaluate expression."]),
        ),
        (
            String::from("exit"),
            builtin::<exit::ExitCommand>(&["exit the shell."]),
        ),
        (
            String::from("help"),
            builtin::<help::HelpCommand>(&["show help about builtin commands."]),
        ),
        (
            String::from("set"),
            builtin::<set::SetCommand>(&[
                "manipulate environment variables.",
                "/set/ displays all keys and values in the environment.",
                "/set A/ sets the value of A to \"\".",
                "/set A B/ sets the value of A to B.",
            ]),
        ),
        (
            String::from("unset"),
            builtin::<unset::UnsetCommand>(&[
                "unset an environment variable.",
                "/unset A/ unsets variable A.",
            ]),
        ),
        (
            String::from("source"),
            builtin::<source::SourceCommand>(&[
                "read & execute contents of a file, line by line.",
            ]),
        ),
    ])
}
