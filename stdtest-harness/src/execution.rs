//! Execution logic for running the target program.

use crate::error::ProcessError;
use std::ffi::OsString;
use std::io::Read;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// How to launch the program under test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetProgram {
    /// Executable to start.
    pub program: PathBuf,
    /// Arguments passed ahead of any per-case arguments.
    pub args: Vec<OsString>,
}

impl TargetProgram {
    /// Describes an executable run with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: vec![],
        }
    }

    /// Describes a source file run through a launcher command line, e.g. `go run main.go`.
    ///
    /// With no launcher words, the source path itself is executed.
    pub fn launched<I, S>(launcher: I, source_path: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let source_path = source_path.into();
        let mut words = launcher.into_iter().map(Into::into);

        match words.next() {
            Some(program) => {
                let mut args: Vec<OsString> = words.collect();
                args.push(source_path.into_os_string());
                Self {
                    program: program.into(),
                    args,
                }
            }
            None => Self::new(source_path),
        }
    }

    /// Appends arguments.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn display_name(&self) -> String {
        self.program.to_string_lossy().to_string()
    }
}

/// Result of running the target to a successful exit.
#[derive(Debug)]
pub struct RunResult {
    /// Exit status of the target.
    pub exit_status: ExitStatus,
    /// Standard output and standard error, interleaved as written.
    pub output: String,
    /// Wall-clock duration of the run.
    pub duration: Duration,
}

/// Runs the target program once per call, feeding it input and capturing its output.
#[derive(Clone, Debug)]
pub struct ProcessRunner {
    target: TargetProgram,
}

impl ProcessRunner {
    /// Creates a runner for the given target.
    pub const fn new(target: TargetProgram) -> Self {
        Self { target }
    }

    /// Returns the target this runner launches.
    pub const fn target(&self) -> &TargetProgram {
        &self.target
    }

    /// Runs the target with `input` on its stdin and returns its combined output.
    ///
    /// The input is written from a separate task while output is drained, so
    /// neither side can stall on a full pipe. Fails if the target can't be
    /// started, its input can't be written, it exits unsuccessfully, or it
    /// outlives `timeout`.
    pub async fn run(
        &self,
        input: &str,
        extra_args: &[String],
        timeout: Option<Duration>,
    ) -> Result<RunResult, ProcessError> {
        let start_time = std::time::Instant::now();

        // stdout and stderr share one pipe so their relative order is preserved.
        let (output_reader, output_writer) =
            std::io::pipe().map_err(ProcessError::CaptureOutput)?;
        let stderr_writer = output_writer
            .try_clone()
            .map_err(ProcessError::CaptureOutput)?;

        let mut cmd = self.create_command(extra_args);
        cmd.stdin(Stdio::piped())
            .stdout(output_writer)
            .stderr(stderr_writer);

        let mut child = cmd.spawn().map_err(|source| ProcessError::Spawn {
            program: self.target.display_name(),
            source,
        })?;

        // The command holds our copies of the pipe's write end; the reader only sees
        // EOF once they are gone.
        drop(cmd);

        // The pid is gone from `child` once it has been reaped, but its process group
        // can outlive it.
        let pid = child.id();
        tracing::debug!(
            target: "process",
            "spawned {} (pid {pid:?})",
            self.target.display_name()
        );

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ProcessError::WriteInput(std::io::ErrorKind::BrokenPipe.into()))?;
        let input_bytes = input.as_bytes().to_vec();
        let writer = tokio::spawn(write_input(stdin, input_bytes));

        let reader = tokio::task::spawn_blocking(move || read_all(output_reader));

        // A bound covers draining the output too: anything the target left running
        // may still hold the pipe open after the target itself exits.
        let (exit_status, output) = match timeout {
            Some(limit) => {
                if let Ok(completed) =
                    tokio::time::timeout(limit, wait_and_drain(&mut child, reader)).await
                {
                    completed?
                } else {
                    tracing::debug!(
                        target: "process",
                        "timed out after {limit:?}; killing target"
                    );
                    kill_target(&mut child, pid).await;
                    writer.abort();
                    return Err(ProcessError::Timeout(limit));
                }
            }
            None => wait_and_drain(&mut child, reader).await?,
        };

        let output = String::from_utf8_lossy(output.as_slice()).to_string();

        writer.await?.map_err(ProcessError::WriteInput)?;

        let duration = start_time.elapsed();

        tracing::debug!(
            target: "process",
            "target exited with {exit_status} after {duration:?}; captured {} byte(s)",
            output.len()
        );

        if !exit_status.success() {
            return Err(ProcessError::ExitStatus {
                status: exit_status,
                output,
            });
        }

        Ok(RunResult {
            exit_status,
            output,
            duration,
        })
    }

    fn create_command(&self, extra_args: &[String]) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.target.program);
        cmd.args(&self.target.args).args(extra_args).kill_on_drop(true);

        // SAFETY:
        // Placing the target in its own session makes it the leader of a fresh process
        // group, so a timed-out target can be killed together with anything it spawned
        // (e.g. the binary started by `go run`). setsid() is async-signal-safe and does
        // not touch any state inherited from the parent after fork().
        #[cfg(unix)]
        unsafe {
            cmd.pre_exec(|| {
                let _ = nix::unistd::setsid();
                Ok(())
            });
        }

        cmd
    }
}

/// Writes all of `input` to the target's stdin, then closes it.
async fn write_input(
    mut stdin: tokio::process::ChildStdin,
    input: Vec<u8>,
) -> Result<(), std::io::Error> {
    let result = async {
        if !input.is_empty() {
            stdin.write_all(input.as_slice()).await?;
        }
        stdin.shutdown().await
    }
    .await;

    drop(stdin);

    match result {
        // The target may legitimately exit without consuming all of its input.
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => {
            tracing::debug!(target: "process", "target closed its input early");
            Ok(())
        }
        other => other,
    }
}

/// Waits for the target to exit, then for every writer to close the output pipe.
async fn wait_and_drain(
    child: &mut tokio::process::Child,
    reader: tokio::task::JoinHandle<Result<Vec<u8>, std::io::Error>>,
) -> Result<(ExitStatus, Vec<u8>), ProcessError> {
    let exit_status = child.wait().await.map_err(ProcessError::Wait)?;
    let output = reader.await?.map_err(ProcessError::CaptureOutput)?;
    Ok((exit_status, output))
}

/// Drains the combined output pipe until every writer has closed it.
fn read_all(mut reader: std::io::PipeReader) -> Result<Vec<u8>, std::io::Error> {
    let mut output = vec![];
    reader.read_to_end(&mut output)?;
    Ok(output)
}

/// Kills the target's whole process group, then the target itself.
async fn kill_target(child: &mut tokio::process::Child, pid: Option<u32>) {
    #[cfg(unix)]
    if let Some(pid) = pid.and_then(|pid| i32::try_from(pid).ok()) {
        let _ = nix::sys::signal::killpg(
            nix::unistd::Pid::from_raw(pid),
            nix::sys::signal::Signal::SIGKILL,
        );
    }

    #[cfg(not(unix))]
    let _ = pid;

    let _ = child.kill().await;
}
