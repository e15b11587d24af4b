//! Parallel execution of independent verification commands.

use std::{path::PathBuf, process::Stdio, time::Duration};

use futures_util::StreamExt;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tracing::{error, info};

use crate::error::DevnetError;

/// Concurrency width the deposit checks run at: one signer index per
/// slot, so simultaneously-submitted transactions never contend on a
/// nonce.
pub const DEFAULT_PARALLELISM: usize = 2;

/// One external verification command, consumed exactly once.
#[derive(Debug, Clone)]
pub struct CommandPreset {
    /// Logical name used to annotate streamed output.
    pub name: String,
    /// Program and arguments.
    pub args: Vec<String>,
    /// Working directory.
    pub cwd: PathBuf,
    /// Hard deadline; the process is killed on expiry.
    pub timeout: Duration,
}

impl CommandPreset {
    /// Creates a preset.
    pub fn new(
        name: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
        cwd: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.into(),
            timeout,
        }
    }
}

/// Result of one command from a batch.
#[derive(Debug)]
pub struct CommandOutcome {
    /// Logical name of the command.
    pub name: String,
    /// Success, or why it failed.
    pub result: Result<(), DevnetError>,
}

/// Runs a batch of commands, at most `max_concurrency` at a time.
///
/// Output lines are streamed as they arrive, annotated with a timestamp
/// and the command name, interleaved across concurrent commands. A failed
/// or timed-out command never cancels its siblings; every preset gets an
/// outcome.
pub async fn run_commands(
    presets: Vec<CommandPreset>,
    max_concurrency: usize,
) -> Vec<CommandOutcome> {
    futures_util::stream::iter(presets.into_iter().map(|preset| async move {
        let name = preset.name.clone();
        let result = run_preset(preset).await;
        CommandOutcome { name, result }
    }))
    .buffer_unordered(max_concurrency.max(1))
    .collect()
    .await
}

/// Logs every failure in a batch and fails with the first one.
pub fn into_result(outcomes: Vec<CommandOutcome>) -> Result<(), DevnetError> {
    let mut first_failure = None;
    for outcome in outcomes {
        match outcome.result {
            Ok(()) => info!(name = %outcome.name, "Command succeeded"),
            Err(err) => {
                error!(name = %outcome.name, error = %err, "Command failed");
                first_failure.get_or_insert(err);
            }
        }
    }
    first_failure.map_or(Ok(()), Err)
}

/// Runs one preset to completion.
///
/// Stdout is streamed line-by-line; stderr is captured for the failure
/// report. The child is force-killed in cleanup regardless of outcome, so
/// no orphan survives a timeout or a streaming error.
pub async fn run_preset(preset: CommandPreset) -> Result<(), DevnetError> {
    let name = preset.name.clone();
    let (program, args) = preset
        .args
        .split_first()
        .ok_or_else(|| DevnetError::Command {
            name: name.clone(),
            code: None,
            stderr: "empty argument vector".to_string(),
        })?;

    let mut child = tokio::process::Command::new(program)
        .args(args)
        .current_dir(&preset.cwd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| DevnetError::Spawn { name: name.clone(), source })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let waited = tokio::time::timeout(preset.timeout, async {
        let ((), stderr_text, status) = tokio::join!(
            stream_stdout(stdout, &name),
            collect_stderr(stderr),
            child.wait(),
        );
        (status, stderr_text)
    })
    .await;

    // Terminate unconditionally; a clean exit makes this a no-op.
    let _ = child.kill().await;

    match waited {
        Err(_) => Err(DevnetError::Timeout { what: format!("command `{name}`"), attempts: 1 }),
        Ok((status, stderr_text)) => {
            let status =
                status.map_err(|source| DevnetError::Spawn { name: name.clone(), source })?;
            if status.success() {
                Ok(())
            } else {
                Err(DevnetError::Command { name, code: status.code(), stderr: stderr_text })
            }
        }
    }
}

async fn stream_stdout(stdout: Option<tokio::process::ChildStdout>, name: &str) {
    let Some(stdout) = stdout else { return };
    let mut lines = BufReader::new(stdout).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let timestamp = chrono::Utc::now().format("%H:%M:%S%.6f");
        println!("[{timestamp}][{name}] {line}");
    }
}

async fn collect_stderr(stderr: Option<tokio::process::ChildStderr>) -> String {
    let Some(stderr) = stderr else { return String::new() };
    let mut buf = String::new();
    let _ = BufReader::new(stderr).read_to_string(&mut buf).await;
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell_preset(name: &str, script: &str, timeout: Duration) -> CommandPreset {
        CommandPreset::new(name, ["sh", "-c", script], std::env::temp_dir(), timeout)
    }

    #[tokio::test]
    async fn test_fast_command_not_blocked_by_slow_timeout() {
        let presets = vec![
            shell_preset("fast", "sleep 0.1", Duration::from_secs(5)),
            shell_preset("slow", "sleep 1", Duration::from_millis(50)),
        ];

        let outcomes = run_commands(presets, 2).await;
        assert_eq!(outcomes.len(), 2);

        let fast = outcomes.iter().find(|o| o.name == "fast").unwrap();
        assert!(fast.result.is_ok());

        let slow = outcomes.iter().find(|o| o.name == "slow").unwrap();
        assert!(slow.result.as_ref().unwrap_err().is_timeout());
    }

    #[tokio::test]
    async fn test_nonzero_exit_reports_stderr() {
        let outcomes = run_commands(
            vec![shell_preset("broken", "echo details >&2; exit 7", Duration::from_secs(5))],
            DEFAULT_PARALLELISM,
        )
        .await;

        match &outcomes[0].result {
            Err(DevnetError::Command { code, stderr, .. }) => {
                assert_eq!(*code, Some(7));
                assert_eq!(stderr.trim(), "details");
            }
            other => panic!("expected command failure, got {other:?}"),
        }

        assert!(into_result(outcomes).is_err());
    }

    #[tokio::test]
    async fn test_failure_does_not_cancel_siblings() {
        let presets = vec![
            shell_preset("bad", "exit 1", Duration::from_secs(5)),
            shell_preset("good", "sleep 0.2", Duration::from_secs(5)),
        ];

        let outcomes = run_commands(presets, 2).await;
        let good = outcomes.iter().find(|o| o.name == "good").unwrap();
        assert!(good.result.is_ok());
    }
}
