//! Runner-level error type.

use thiserror::Error;

/// Reasons a command produced no output at all.
///
/// A command that ran and exited (with any status) is *not* an error here;
/// the caller decides what the exit code and stderr mean.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// The shell process could not be started.
    #[error("failed to spawn command: {0}")]
    Spawn(String),

    /// The process started but waiting on it failed.
    #[error("failed to wait for command: {0}")]
    Wait(String),

    /// The process outlived the configured timeout and was killed.
    #[error("command timed out after {timeout_ms}ms")]
    TimedOut { timeout_ms: u64 },
}
