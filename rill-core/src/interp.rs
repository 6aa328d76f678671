//! Pipeline interpretation: spawning stages, reaping children, capturing
//! output for command substitution.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::os::unix::process::ExitStatusExt;

use crate::openfiles::{self, OpenFile, OpenFiles};
use crate::{commands, error, trace_categories, Shell};

/// Encapsulates the result of executing a command.
#[derive(Clone, Debug)]
pub struct ExecutionResult {
    /// The numerical exit code of the command. Negative codes come from
    /// failed built-ins and are treated as fatal.
    pub exit_code: i32,
}

impl ExecutionResult {
    /// Returns a new result with the given exit code.
    pub fn new(exit_code: i32) -> Self {
        Self { exit_code }
    }

    /// Returns a result indicating success.
    pub fn success() -> Self {
        Self::new(0)
    }

    /// Returns whether the result indicates success.
    pub const fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns whether the result is fatal to the enclosing pipeline or
    /// read-eval loop.
    pub const fn is_fatal(&self) -> bool {
        self.exit_code < 0
    }
}

/// Parameters for execution: the endpoints a pipeline is wired to.
pub struct ExecutionParameters {
    /// The endpoints supplying the pipeline's outer standard streams.
    pub open_files: OpenFiles,
}

/// The outcome of launching one pipeline stage: either a child process to be
/// reaped later, or a status produced inline (built-ins and empty stages).
pub(crate) enum CommandSpawnResult {
    SpawnedProcess(std::process::Child),
    ImmediateExit(i32),
}

/// Executes an ordered sequence of pipeline stages, wiring adjacent stages
/// together through anonymous pipes and the outer endpoints from `params`.
///
/// Stages run concurrently; built-ins run inline in this process. Children
/// are reaped in stage order, and the last reaped status wins unless a stage
/// reports a negative (fatal) status, which aborts reaping. On every exit
/// path, any still-living child is killed and reaped, every pipe end created
/// here is released, and standard output is flushed.
pub(crate) fn run_pipeline(
    shell: &mut Shell,
    stages: &[String],
    params: &ExecutionParameters,
) -> Result<ExecutionResult, error::Error> {
    let mut children = VecDeque::new();
    let result = spawn_and_reap_stages(shell, stages, params, &mut children);

    // Cleanup runs identically on success and failure: whatever is still
    // tracked gets killed and reaped, so no child survives this return.
    sweep_spawned_children(&mut children);
    let _ = std::io::stdout().flush();

    result
}

fn spawn_and_reap_stages(
    shell: &mut Shell,
    stages: &[String],
    params: &ExecutionParameters,
    children: &mut VecDeque<CommandSpawnResult>,
) -> Result<ExecutionResult, error::Error> {
    if stages.is_empty() {
        return Ok(ExecutionResult::success());
    }

    // Stage i reads from inputs[i] and writes to outputs[i]; the interior
    // entries are the two ends of the pipes connecting adjacent stages, and
    // the exterior entries duplicate the caller's endpoints so that all of
    // them can be released uniformly.
    let n = stages.len();
    let mut inputs: Vec<OpenFile> = Vec::with_capacity(n);
    let mut outputs: Vec<OpenFile> = Vec::with_capacity(n);

    inputs.push(params.open_files.stdin.try_dup()?);
    for _ in 1..n {
        let (reader, writer) = openfiles::pipe()?;
        inputs.push(reader.into());
        outputs.push(writer.into());
    }
    outputs.push(params.open_files.stdout.try_dup()?);

    for (stage, (stage_stdin, stage_stdout)) in
        stages.iter().zip(inputs.into_iter().zip(outputs))
    {
        let open_files = OpenFiles {
            stdin: stage_stdin,
            stdout: stage_stdout,
            stderr: params.open_files.stderr.try_dup()?,
        };

        // Launching moves both pipe ends into the stage; once it returns,
        // this process holds no copy of the stage's write end, so the next
        // stage's reader observes EOF when this one terminates.
        let spawned = launch_stage(shell, stage, open_files)?;

        // A failed built-in aborts the pipeline at launch time: the
        // remaining stages never start, and the caller's sweep disposes of
        // the stages already running rather than waiting on them.
        if let CommandSpawnResult::ImmediateExit(code) = &spawned {
            if *code < 0 {
                return Ok(ExecutionResult::new(*code));
            }
        }

        children.push_back(spawned);
    }

    let mut result = ExecutionResult::success();
    while let Some(child) = children.pop_front() {
        let exit_code = match child {
            CommandSpawnResult::ImmediateExit(code) => code,
            CommandSpawnResult::SpawnedProcess(mut child) => exit_code_of(child.wait()?),
        };

        result = ExecutionResult::new(exit_code);
        if result.is_fatal() {
            break;
        }
    }

    Ok(result)
}

/// Word-splits one pipeline stage and either runs it inline (built-ins, empty
/// stages) or spawns a child process for it.
pub(crate) fn launch_stage(
    shell: &mut Shell,
    command: &str,
    open_files: OpenFiles,
) -> Result<CommandSpawnResult, error::Error> {
    let args = rill_parser::tokenize(command, rill_parser::WORD_DELIMITERS, false)?;
    if args.is_empty() {
        return Ok(CommandSpawnResult::ImmediateExit(0));
    }

    let name = args[0].clone();

    if let Some(registration) = shell.builtins.get(&name).cloned() {
        tracing::debug!(target: trace_categories::COMMANDS, "running builtin: {name}");
        let context = commands::ExecutionContext {
            shell,
            command_name: name,
            open_files,
        };
        let exit_code = (registration.execute_func)(context, args)?;
        return Ok(CommandSpawnResult::ImmediateExit(exit_code));
    }

    tracing::debug!(target: trace_categories::COMMANDS, "spawning: {name}");
    let mut cmd = commands::compose_std_command(&args, open_files);
    match cmd.spawn() {
        Ok(child) => Ok(CommandSpawnResult::SpawnedProcess(child)),
        Err(e) => {
            let _ = writeln!(std::io::stderr(), "rill: failed to execute {name}: {e}");
            Ok(CommandSpawnResult::ImmediateExit(127))
        }
    }
}

/// Runs a single command string to completion with the given endpoints and
/// returns its exit status; used by the `eval` built-in.
pub(crate) fn execute_command_string(
    shell: &mut Shell,
    command: &str,
    open_files: OpenFiles,
) -> Result<i32, error::Error> {
    match launch_stage(shell, command, open_files)? {
        CommandSpawnResult::ImmediateExit(code) => Ok(code),
        CommandSpawnResult::SpawnedProcess(mut child) => Ok(exit_code_of(child.wait()?)),
    }
}

/// Runs one full line to completion with its standard input optionally
/// pre-fed from `input` and its standard output drained into a fresh string.
/// Yields `None` when the line reports a non-zero status.
pub(crate) fn run_captured(
    shell: &mut Shell,
    command: &str,
    input: Option<&str>,
) -> Result<Option<String>, error::Error> {
    let (input_reader, mut input_writer) = openfiles::pipe()?;
    let (mut output_reader, output_writer) = openfiles::pipe()?;

    if let Some(input) = input {
        input_writer.write_all(input.as_bytes())?;
    }
    drop(input_writer);

    let params = ExecutionParameters {
        open_files: OpenFiles {
            stdin: input_reader.into(),
            stdout: output_writer.into(),
            stderr: OpenFile::Stderr,
        },
    };
    let result = shell.run_string(command, &params)?;

    // All children have been reaped and the executor's duplicates released;
    // dropping our own write end leaves EOF as the read delimiter.
    drop(params);

    if !result.is_success() {
        return Ok(None);
    }

    let mut captured = vec![];
    output_reader.read_to_end(&mut captured)?;
    Ok(Some(String::from_utf8_lossy(&captured).into_owned()))
}

fn sweep_spawned_children(children: &mut VecDeque<CommandSpawnResult>) {
    while let Some(child) = children.pop_front() {
        if let CommandSpawnResult::SpawnedProcess(mut child) = child {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

fn exit_code_of(status: std::process::ExitStatus) -> i32 {
    status
        .code()
        .unwrap_or_else(|| 128 + status.signal().unwrap_or(0))
}
