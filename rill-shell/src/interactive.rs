//! The interactive read-eval loop.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Prompt template installed on first entry when `PROMPT` is unset: the
/// working directory in brackets, lightly styled.
const DEFAULT_PROMPT: &str = "\x1b[0m[\x1b[33m${PWD}\x1b[0m]\x1b[31m,`'\x1b[0m ";

const FALLBACK_PROMPT: &str = "($PROMPT Unavailable)> ";

/// Runs the interactive shell until end-of-input; returns the exit code.
pub(crate) fn run(shell: &mut rill_core::Shell) -> Result<i32, rill_core::Error> {
    if std::env::var_os("PROMPT").is_none() {
        std::env::set_var("PROMPT", DEFAULT_PROMPT);
    }

    let mut editor = DefaultEditor::new().map_err(into_io_error)?;

    loop {
        shell.refresh_well_known_vars();

        let template =
            std::env::var("PROMPT").unwrap_or_else(|_| String::from(FALLBACK_PROMPT));
        let prompt = shell.expand(&template).unwrap_or(template);

        match editor.readline(&prompt) {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());

                let params = shell.default_exec_params();
                match shell.run_string(&line, &params) {
                    Ok(result) if result.is_fatal() => {
                        eprintln!("task exited abnormally, status = {}", result.exit_code);
                    }
                    Ok(_) => (),
                    Err(e) => {
                        eprintln!("rill: {e}");
                        shell.last_exit_status = -1;
                    }
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => return Ok(0),
            Err(e) => return Err(into_io_error(e).into()),
        }
    }
}

fn into_io_error(e: ReadlineError) -> std::io::Error {
    std::io::Error::other(e)
}
