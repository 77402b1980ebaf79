//! The `CommandRunner` trait — the contract every runner must fulfil.

use async_trait::async_trait;

use crate::ExecutionError;

/// Everything a finished command left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// Successful output carrying only `stdout`.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
        }
    }

    /// Output of a command that exited with `code` and wrote `stderr`.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code: Some(code),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a fully-formed shell command and captures both output streams.
///
/// Implementations must not retry and must not interpret the output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str) -> Result<CommandOutput, ExecutionError> {
        self.run_with_input(command, None).await
    }

    /// Like [`CommandRunner::run`], writing `input` to the command's stdin.
    ///
    /// Payloads of any size go here rather than into the command line, which
    /// the OS caps per argument.
    async fn run_with_input(
        &self,
        command: &str,
        input: Option<&str>,
    ) -> Result<CommandOutput, ExecutionError>;
}
