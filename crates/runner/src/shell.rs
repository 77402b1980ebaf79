//! `ShellRunner` — real subprocess execution through `sh -c`.

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::{CommandOutput, CommandRunner, ExecutionError};

/// Default upper bound on a single command's run time.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Executes commands with a POSIX shell and a hard timeout.
///
/// The child is spawned with `kill_on_drop`, so when the timeout fires and the
/// wait future is dropped the process is killed rather than left running.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
    timeout: Duration,
}

impl ShellRunner {
    pub fn new(timeout: Duration) -> Self {
        Self {
            shell: "sh".to_string(),
            timeout,
        }
    }

    /// Use a different shell binary (it must accept `-c <command>`).
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run_with_input(
        &self,
        command: &str,
        input: Option<&str>,
    ) -> Result<CommandOutput, ExecutionError> {
        let start = Instant::now();

        let mut child = Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecutionError::Spawn(e.to_string()))?;

        // Feed stdin from its own task so a child that writes output before
        // draining its input cannot deadlock against us.
        let writer = match (child.stdin.take(), input) {
            (Some(mut stdin), Some(input)) => {
                let payload = input.as_bytes().to_vec();
                Some(tokio::spawn(async move {
                    if let Err(e) = stdin.write_all(&payload).await {
                        debug!(error = %e, "stdin closed before payload was written");
                    }
                }))
            }
            _ => None,
        };

        let waited = tokio::time::timeout(self.timeout, child.wait_with_output()).await;
        if let Some(writer) = writer {
            writer.abort();
        }

        let output = match waited {
            Ok(result) => result.map_err(|e| ExecutionError::Wait(e.to_string()))?,
            Err(_) => {
                let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                warn!(timeout_ms, "command timed out, child killed");
                return Err(ExecutionError::TimedOut { timeout_ms });
            }
        };

        let exit_code = output.status.code();
        debug!(
            ?exit_code,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "command finished"
        );

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code,
        })
    }
}
