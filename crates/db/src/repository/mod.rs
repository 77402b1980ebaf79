//! The `TodoRepository` — one method per datastore operation.
//!
//! Every operation is a fresh round trip through the [`CommandRunner`]; the
//! repository keeps no state between calls beyond its configuration.
//! No HTTP concerns, no validation beyond what the statement builders need.

pub mod schema;
pub mod todos;

use std::sync::Arc;

use runner::{CommandOutput, CommandRunner};
use tracing::{debug, error};

use crate::{sql::shell_quote, DbConfig, RepositoryError};

/// How the engine should print result rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Plain,
}

/// Stateless gateway to the todo datastore.
pub struct TodoRepository {
    config: DbConfig,
    runner: Arc<dyn CommandRunner>,
}

impl TodoRepository {
    pub fn new(config: DbConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    /// `'<bin>' -cmd '.timeout <ms>' <flags...> '<path>'`.
    ///
    /// The engine reads statements from stdin after this.
    fn invocation(&self, flags: &[&str]) -> String {
        let busy_ms = self.config.busy_timeout.as_millis();
        let mut parts = Vec::with_capacity(flags.len() + 4);
        parts.push(shell_quote(&self.config.sqlite_bin));
        parts.push("-cmd".to_string());
        parts.push(shell_quote(&format!(".timeout {busy_ms}")));
        parts.extend(flags.iter().map(|f| (*f).to_string()));
        parts.push(shell_quote(&self.config.engine_path()));
        parts.join(" ")
    }

    /// Run one SQL statement and return its stdout.
    ///
    /// The statement travels on stdin, so its length is not bounded by the
    /// OS limit on a single command-line argument.
    async fn run_sql(
        &self,
        format: OutputFormat,
        statement: &str,
        on_failure: fn(String) -> RepositoryError,
    ) -> Result<String, RepositoryError> {
        let flags: &[&str] = match format {
            OutputFormat::Json => &["-json"],
            OutputFormat::Plain => &[],
        };
        self.run_command(&self.invocation(flags), Some(statement), on_failure)
            .await
    }

    async fn run_command(
        &self,
        command: &str,
        input: Option<&str>,
        on_failure: fn(String) -> RepositoryError,
    ) -> Result<String, RepositoryError> {
        debug!(command, input_len = input.map_or(0, str::len), "running engine");

        let output = self
            .runner
            .run_with_input(command, input)
            .await
            .inspect_err(|e| error!(error = %e, "engine could not be run"))?;

        classify(output).map_err(|message| {
            error!(%message, "engine reported failure");
            on_failure(message)
        })
    }
}

/// Split engine output into stdout on success or a failure message.
///
/// A non-zero exit fails, and so does any non-blank stderr even when the exit
/// code is zero: the engine reports some statement errors only there.
fn classify(output: CommandOutput) -> Result<String, String> {
    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        return Err(stderr.to_string());
    }
    match output.exit_code {
        Some(0) => Ok(output.stdout),
        Some(code) => Err(format!("engine exited with status {code}")),
        None => Err("engine terminated by signal".to_string()),
    }
}
