//! Implements the command-line interface for the rill shell.

mod args;
mod interactive;

use clap::Parser;

use crate::args::CommandLineArgs;

/// Main entry point for the rill shell.
fn main() {
    let parsed_args = match CommandLineArgs::try_parse() {
        Ok(parsed_args) => parsed_args,
        Err(e) => {
            let _ = e.print();

            // clap reports `--help` and `--version` as errors; everything
            // else is a genuine usage failure.
            let exit_code = match e.kind() {
                clap::error::ErrorKind::DisplayHelp => 0,
                clap::error::ErrorKind::DisplayVersion => 0,
                _ => -1,
            };

            std::process::exit(exit_code);
        }
    };

    init_tracing();

    let exit_code = match run(parsed_args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("error: {:#}", e);
            -1
        }
    };

    std::process::exit(exit_code);
}

/// Runs the shell in the mode selected by the parsed arguments; returns the
/// exit code.
fn run(args: CommandLineArgs) -> Result<i32, rill_core::Error> {
    let mut shell = rill_core::Shell::new(rill_core::CreateOptions {
        positional_parameters: std::env::args().collect(),
    });

    if let Some(command) = &args.command {
        // Execute the provided string as one line and exit with its status.
        let params = shell.default_exec_params();
        let result = shell.run_string(command, &params)?;
        Ok(result.exit_code)
    } else if args.interactive {
        rill_core::sys::signal::install_sigint_sweep()?;
        interactive::run(&mut shell)
    } else {
        // Drive the read-eval loop over standard input.
        let params = shell.default_exec_params();
        let stdin = std::io::stdin();
        let result = shell.run_lines(&mut stdin.lock(), &params)?;
        Ok(result.exit_code)
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("RILL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_command_string() {
        let args =
            CommandLineArgs::try_parse_from(["rill", "-c", "echo hi"]).unwrap();
        assert_eq!(args.command.as_deref(), Some("echo hi"));
        assert!(!args.interactive);
    }

    #[test]
    fn parse_trailing_args() {
        let args = CommandLineArgs::try_parse_from(["rill", "one", "two"]).unwrap();
        assert!(args.command.is_none());
        assert_eq!(args.script_args, ["one", "two"]);
    }

    #[test]
    fn parse_rejects_conflicting_modes() {
        assert!(CommandLineArgs::try_parse_from(["rill", "-c", "echo", "-i"]).is_err());
    }

    #[test]
    fn parse_rejects_unknown_flag() {
        assert!(CommandLineArgs::try_parse_from(["rill", "-q"]).is_err());
    }
}
