use clap::Parser;

const SHORT_DESCRIPTION: &str = "a small pipe-oriented command interpreter";

const LONG_DESCRIPTION: &str = r"
rill reads command lines from a terminal, a file, or an argument string and
executes each line as a pipeline of commands connected through anonymous
pipes. It is not compatible with any existing shell grammar; it supports
double-quoted literals with C-style escapes, ${NAME}, $0..$9, $?, $(...) and
|-piping, plus a handful of built-in commands (run `help` inside the shell
for a list).
";

/// Parsed command-line arguments for the rill shell.
#[derive(Parser)]
#[clap(name = "rill",
       version,
       about = SHORT_DESCRIPTION,
       long_about = LONG_DESCRIPTION)]
pub(crate) struct CommandLineArgs {
    /// Execute the provided command string and then exit.
    #[arg(short = 'c', value_name = "STRING", conflicts_with = "interactive")]
    pub command: Option<String>,

    /// Run an interactive shell with a prompt; press Ctrl+C to interrupt the
    /// current command and Ctrl+D to exit.
    #[arg(short = 'i')]
    pub interactive: bool,

    /// Trailing arguments; visible to commands only as the positional
    /// parameters $0..$9.
    #[clap(num_args = 0.., trailing_var_arg = true)]
    pub script_args: Vec<String>,
}
