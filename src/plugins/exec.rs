//! Timed execution of external commands.
//!
//! Spawns one process per dispatch target, optionally feeds it piped input,
//! and races its exit against a wall-clock deadline. An overrunning process
//! is forcibly killed; a process that exits right as the deadline fires is
//! not treated as an error (the failed kill is swallowed). Captured output
//! travels back in the [`ExecutionResult`] for the caller to report.

use std::{
    process::{ExitStatus, Stdio},
    time::Duration,
};

use thiserror::Error;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWriteExt},
    process::Command,
    time,
};

/// Failures that abort a single command execution.
///
/// Non-zero exits, stderr output, and timeout kills are *not* errors; they
/// are recorded on the [`ExecutionResult`] so one misbehaving target cannot
/// block its siblings.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The resolved argument list was empty.
    #[error("empty command template")]
    EmptyCommand,

    /// The process could not be spawned.
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        /// The program that failed to start.
        command: String,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the input payload or waiting for the process failed.
    #[error("i/o error while running '{command}': {source}")]
    Io {
        /// The program being driven.
        command: String,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of one timed command execution. Not persisted; only reported.
#[derive(Debug)]
pub struct ExecutionResult {
    /// OS process id, when the process was still running at capture time.
    pub pid: Option<u32>,
    /// Exit status, if the process could be reaped.
    pub status: Option<ExitStatus>,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the watchdog forcibly terminated the process.
    pub timed_out: bool,
}

impl ExecutionResult {
    /// True when the process ran to completion and exited zero.
    pub fn success(&self) -> bool {
        !self.timed_out && self.status.is_some_and(|status| status.success())
    }
}

/// Runs one command under an optional deadline.
///
/// With `input` present the payload is written to the child's stdin and the
/// pipe closed; otherwise the child gets no stdin stream at all and cannot
/// block waiting for input. With `limit` absent the call waits for natural
/// completion.
pub async fn run_command(
    argv: &[String],
    input: Option<&str>,
    limit: Option<Duration>,
) -> Result<ExecutionResult, ExecError> {
    let (program, args) = argv.split_first().ok_or(ExecError::EmptyCommand)?;

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(if input.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command.spawn().map_err(|source| ExecError::Spawn {
        command: program.clone(),
        source,
    })?;
    let pid = child.id();
    tracing::debug!(command = %program, ?pid, timeout = ?limit, "spawned dispatch process");

    // Readers are detached so the child never stalls on a full pipe while
    // we are writing input or waiting for it to exit.
    let stdout_task = child.stdout.take().map(|pipe| tokio::spawn(drain(pipe)));
    let stderr_task = child.stderr.take().map(|pipe| tokio::spawn(drain(pipe)));

    let stdin_pipe = child.stdin.take();
    let payload = input.map(|s| s.as_bytes().to_vec());
    let interaction = async {
        if let (Some(mut pipe), Some(payload)) = (stdin_pipe, payload) {
            pipe.write_all(&payload).await?;
            pipe.shutdown().await?;
            // Dropping the pipe closes the child's stdin.
        }
        child.wait().await
    };

    let (status, timed_out) = match limit {
        Some(limit) => {
            let waited = time::timeout(limit, interaction).await;
            match waited {
                Ok(status) => {
                    let status = status.map_err(|source| ExecError::Io {
                        command: program.clone(),
                        source,
                    })?;
                    (Some(status), false)
                }
                Err(_elapsed) => {
                    // The process may have exited in the race window between
                    // the deadline firing and the kill; that is not an error.
                    if let Err(error) = child.kill().await {
                        tracing::debug!(?pid, %error, "kill after deadline failed; process already gone");
                    }
                    let status = match child.wait().await {
                        Ok(status) => Some(status),
                        Err(error) => {
                            tracing::debug!(?pid, %error, "could not reap timed-out process");
                            None
                        }
                    };
                    (status, true)
                }
            }
        }
        None => {
            let status = interaction.await.map_err(|source| ExecError::Io {
                command: program.clone(),
                source,
            })?;
            (Some(status), false)
        }
    };

    let stdout = collect(stdout_task).await;
    let stderr = collect(stderr_task).await;

    Ok(ExecutionResult { pid, status, stdout, stderr, timed_out })
}

/// Logs one execution result with the severities the reporting contract
/// requires: lifecycle at debug, captured stdout at info, stderr and
/// timeout kills at error.
pub fn report(plugin: &str, label: &str, result: &ExecutionResult) {
    if result.timed_out {
        tracing::error!(
            plugin,
            label,
            pid = ?result.pid,
            "process exceeded its deadline and was killed"
        );
    }
    if !result.stdout.is_empty() {
        tracing::info!(plugin, label, output = %result.stdout.trim_end(), "command output");
    }
    if !result.stderr.is_empty() {
        tracing::error!(plugin, label, error = %result.stderr.trim_end(), "command error output");
    }
    tracing::debug!(
        plugin,
        label,
        pid = ?result.pid,
        exit = ?result.status,
        success = result.success(),
        "dispatch target finished"
    );
}

async fn drain<R: AsyncRead + Unpin>(mut pipe: R) -> String {
    let mut buf = Vec::new();
    if let Err(error) = pipe.read_to_end(&mut buf).await {
        tracing::debug!(%error, "output capture ended early");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

async fn collect(task: Option<tokio::task::JoinHandle<String>>) -> String {
    match task {
        Some(task) => task.await.unwrap_or_default(),
        None => String::new(),
    }
}
