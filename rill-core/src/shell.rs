use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::Path;

use crate::interp::{self, ExecutionParameters, ExecutionResult};
use crate::openfiles::OpenFiles;
use crate::sys::users;
use crate::{builtins, error, expansion, trace_categories};

/// Options for creating a new shell.
#[derive(Default)]
pub struct CreateOptions {
    /// The launcher's own command-line arguments; `$0..$9` index into these.
    pub positional_parameters: Vec<String>,
}

/// Represents an instance of a shell.
pub struct Shell {
    /// The status of the last completed pipeline, read back by `$?`.
    /// Negative values indicate internal failure.
    pub last_exit_status: i32,

    /// A fixed view over the launcher's command-line arguments; index 0 is
    /// the launcher itself.
    pub positional_parameters: Vec<String>,

    /// Shell built-in commands.
    pub(crate) builtins: HashMap<String, builtins::Registration>,
}

impl Shell {
    /// Returns a new shell instance created with the options provided.
    pub fn new(options: CreateOptions) -> Self {
        Self {
            last_exit_status: 0,
            positional_parameters: options.positional_parameters,
            builtins: builtins::get_default_builtins(),
        }
    }

    /// Returns execution parameters wired to this process's standard
    /// streams.
    pub fn default_exec_params(&self) -> ExecutionParameters {
        ExecutionParameters {
            open_files: OpenFiles::default(),
        }
    }

    /// Runs one command line to completion: strips the comment, expands `$`
    /// constructs, splits the result into pipeline stages, executes them,
    /// and records the exit status for later `$?` lookup.
    pub fn run_string(
        &mut self,
        command: impl AsRef<str>,
        params: &ExecutionParameters,
    ) -> Result<ExecutionResult, error::Error> {
        let line = command.as_ref();
        let line = line.split_once('#').map_or(line, |(code, _comment)| code);

        let expanded = expansion::expand_line(self, line)?;
        let stages = rill_parser::tokenize(&expanded, rill_parser::STAGE_DELIMITERS, true)?;

        let result = interp::run_pipeline(self, &stages, params)?;
        self.last_exit_status = result.exit_code;

        Ok(result)
    }

    /// Drives the read-eval loop over a line source until end-of-input or a
    /// fatal status. The well-known environment variables are refreshed
    /// before each line so every line sees an up-to-date `PWD` and `USER`;
    /// parse and expansion errors are reported on the standard error
    /// endpoint and yield status -1, which is fatal here.
    pub fn run_lines(
        &mut self,
        reader: &mut dyn BufRead,
        params: &ExecutionParameters,
    ) -> Result<ExecutionResult, error::Error> {
        let mut result = ExecutionResult::success();
        let mut line = String::new();

        loop {
            self.refresh_well_known_vars();

            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }

            tracing::debug!(target: trace_categories::INPUT, "read line: {:?}", line);

            match self.run_string(&line, params) {
                Ok(line_result) => {
                    result = line_result;
                    if result.is_fatal() {
                        break;
                    }
                }
                Err(e) => {
                    let mut stderr = params.open_files.stderr.try_dup()?;
                    writeln!(stderr, "rill: {e}")?;

                    result = ExecutionResult::new(-1);
                    self.last_exit_status = result.exit_code;
                    break;
                }
            }
        }

        Ok(result)
    }

    /// Opens the given file and drives the read-eval loop over its contents.
    pub fn source_file(
        &mut self,
        path: &Path,
        params: &ExecutionParameters,
    ) -> Result<ExecutionResult, error::Error> {
        let file = std::fs::File::open(path)
            .map_err(|e| error::Error::FailedSourcingFile(path.to_owned(), e))?;
        let mut reader = std::io::BufReader::new(file);
        self.run_lines(&mut reader, params)
    }

    /// Expands all `$` constructs in the given string.
    pub fn expand(&mut self, s: &str) -> Result<String, error::Error> {
        expansion::expand_line(self, s)
    }

    /// Runs a command line with its output captured into a string, its input
    /// optionally pre-fed from `input`. Yields `None` when the command
    /// reports a non-zero status.
    pub fn capture_output(
        &mut self,
        command: &str,
        input: Option<&str>,
    ) -> Result<Option<String>, error::Error> {
        interp::run_captured(self, command, input)
    }

    /// Refreshes the well-known environment variables: `PWD` from the
    /// current working directory and `USER` from the login name of the real
    /// user id (empty if unavailable).
    pub fn refresh_well_known_vars(&self) {
        if let Ok(cwd) = std::env::current_dir() {
            std::env::set_var("PWD", &cwd);
        }

        std::env::set_var("USER", users::get_current_username().unwrap_or_default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_shell() -> Shell {
        Shell::new(CreateOptions::default())
    }

    fn capture(shell: &mut Shell, command: &str) -> Option<String> {
        shell.capture_output(command, None).unwrap()
    }

    #[test]
    fn test_pipeline_through_external_commands() {
        let mut shell = test_shell();
        assert_eq!(
            capture(&mut shell, "echo hello | tr a-z A-Z"),
            Some(String::from("HELLO\n"))
        );
        assert_eq!(shell.last_exit_status, 0);
    }

    #[test]
    fn test_empty_lines_succeed_without_children() {
        let mut shell = test_shell();
        assert_eq!(capture(&mut shell, ""), Some(String::new()));
        assert_eq!(capture(&mut shell, "   \t  "), Some(String::new()));
        assert_eq!(capture(&mut shell, "# only a comment"), Some(String::new()));
        assert_eq!(shell.last_exit_status, 0);
    }

    #[test]
    fn test_quoted_pipe_is_not_a_pipeline() {
        let mut shell = test_shell();
        assert_eq!(
            capture(&mut shell, r#"echo "a|b""#),
            Some(String::from("a|b\n"))
        );
    }

    #[test]
    fn test_escapes_decode_inside_quotes() {
        let mut shell = test_shell();
        assert_eq!(
            capture(&mut shell, r#"echo "\x41\x42""#),
            Some(String::from("AB\n"))
        );
    }

    #[test]
    fn test_failing_command_records_status() {
        let mut shell = test_shell();
        assert_eq!(capture(&mut shell, "false"), None);
        assert_eq!(shell.last_exit_status, 1);

        assert_eq!(capture(&mut shell, "echo $?"), Some(String::from("1\n")));
    }

    #[test]
    fn test_command_not_found_is_nonfatal() {
        let mut shell = test_shell();
        assert_eq!(capture(&mut shell, "definitely-no-such-command-here"), None);
        assert_eq!(shell.last_exit_status, 127);
    }

    #[test]
    fn test_set_and_unset_builtins() {
        let mut shell = test_shell();
        let params = shell.default_exec_params();

        shell.run_string("set RILL_SHELL_TEST marker", &params).unwrap();
        assert_eq!(
            std::env::var("RILL_SHELL_TEST").as_deref(),
            Ok("marker")
        );
        assert_eq!(
            capture(&mut shell, "echo ${RILL_SHELL_TEST}"),
            Some(String::from("marker\n"))
        );

        shell.run_string("unset RILL_SHELL_TEST", &params).unwrap();
        assert!(std::env::var("RILL_SHELL_TEST").is_err());
    }

    #[test]
    fn test_variable_visible_to_children() {
        let mut shell = test_shell();
        let params = shell.default_exec_params();

        shell.run_string("set RILL_CHILD_TEST 42", &params).unwrap();
        assert_eq!(
            capture(&mut shell, "printenv RILL_CHILD_TEST"),
            Some(String::from("42\n"))
        );
    }

    #[test]
    fn test_eval_builtin_reexpands() {
        let mut shell = test_shell();
        assert_eq!(
            capture(&mut shell, "eval echo hi"),
            Some(String::from("hi\n"))
        );
    }

    #[test]
    fn test_help_builtin_lists_table() {
        let mut shell = test_shell();
        let output = capture(&mut shell, "help").unwrap();
        for name in ["cd:", "eval:", "exit:", "help:", "set:", "unset:", "source:"] {
            assert!(output.contains(name), "missing {name} in: {output}");
        }
    }

    #[test]
    fn test_cd_builtin_failure_is_fatal() {
        let mut shell = test_shell();
        assert_eq!(capture(&mut shell, "cd /definitely/not/a/dir"), None);
        assert_eq!(shell.last_exit_status, -1);
    }

    #[test]
    fn test_run_lines_stops_on_fatal_status() {
        let mut shell = test_shell();
        let params = shell.default_exec_params();

        let script = "cd /definitely/not/a/dir\nset RILL_UNREACHED yes\n";
        let result = shell.run_lines(&mut script.as_bytes(), &params).unwrap();

        assert_eq!(result.exit_code, -1);
        assert!(std::env::var("RILL_UNREACHED").is_err());
    }

    #[test]
    fn test_source_builtin_runs_file() {
        let mut shell = test_shell();

        let path = std::env::temp_dir().join(format!("rill-source-{}", std::process::id()));
        std::fs::write(&path, "echo sourced\n").unwrap();

        let output = capture(&mut shell, &format!("source {}", path.display()));
        std::fs::remove_file(&path).unwrap();

        assert_eq!(output, Some(String::from("sourced\n")));
    }

    #[test]
    fn test_capture_with_prefed_input() {
        let mut shell = test_shell();
        let output = shell
            .capture_output("tr a-z A-Z", Some("fed\n"))
            .unwrap();
        assert_eq!(output, Some(String::from("FED\n")));
    }

    #[test]
    fn test_refresh_well_known_vars() {
        let shell = test_shell();
        shell.refresh_well_known_vars();

        let pwd = std::env::var("PWD").unwrap();
        assert_eq!(
            std::path::PathBuf::from(pwd),
            std::env::current_dir().unwrap()
        );
        assert!(std::env::var("USER").is_ok());
    }
}
