//! `MockRunner` — a test double for `CommandRunner`.
//!
//! Useful in unit and integration tests where spawning the real SQL engine is
//! either unavailable or irrelevant.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::{CommandOutput, CommandRunner, ExecutionError};

/// What the mock does when it runs out of scripted responses.
#[derive(Debug, Clone)]
pub enum Fallback {
    /// Return this output for every unscripted call.
    Output(CommandOutput),
    /// Panic, so a test notices an unexpected extra command.
    Panic,
}

/// A mock runner that records every command it receives and replays a
/// programmer-specified queue of results.
#[derive(Debug, Clone)]
pub struct MockRunner {
    responses: Arc<Mutex<VecDeque<Result<CommandOutput, ExecutionError>>>>,
    fallback: Fallback,
    /// All commands seen by this runner (in call order).
    pub calls: Arc<Mutex<Vec<String>>>,
    /// The stdin payload of each call, parallel to `calls`.
    pub inputs: Arc<Mutex<Vec<Option<String>>>>,
}

impl MockRunner {
    /// A mock that answers every command with empty, successful output.
    pub fn new() -> Self {
        Self::with_fallback(Fallback::Output(CommandOutput::ok("")))
    }

    /// A mock that panics on any command not covered by a queued response.
    pub fn strict() -> Self {
        Self::with_fallback(Fallback::Panic)
    }

    fn with_fallback(fallback: Fallback) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            fallback,
            calls: Arc::new(Mutex::new(Vec::new())),
            inputs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a successful output with the given stdout.
    pub fn push_stdout(&self, stdout: impl Into<String>) -> &Self {
        self.push(Ok(CommandOutput::ok(stdout)))
    }

    /// Queue an output that exited with `code` and wrote `stderr`.
    pub fn push_failure(&self, code: i32, stderr: impl Into<String>) -> &Self {
        self.push(Ok(CommandOutput::failed(code, stderr)))
    }

    /// Queue an execution error (the command never produced output).
    pub fn push_error(&self, err: ExecutionError) -> &Self {
        self.push(Err(err))
    }

    /// Queue any result, output or error, as the next response.
    pub fn push(&self, response: Result<CommandOutput, ExecutionError>) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    /// Number of commands this runner has executed.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The most recent command, if any.
    pub fn last_call(&self) -> Option<String> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// The stdin payload of the most recent command, if it had one.
    pub fn last_input(&self) -> Option<String> {
        self.inputs.lock().unwrap().last().cloned().flatten()
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run_with_input(
        &self,
        command: &str,
        input: Option<&str>,
    ) -> Result<CommandOutput, ExecutionError> {
        self.calls.lock().unwrap().push(command.to_string());
        self.inputs.lock().unwrap().push(input.map(str::to_string));

        if let Some(response) = self.responses.lock().unwrap().pop_front() {
            return response;
        }

        match &self.fallback {
            Fallback::Output(out) => Ok(out.clone()),
            Fallback::Panic => panic!("MockRunner: unexpected command `{command}`"),
        }
    }
}
