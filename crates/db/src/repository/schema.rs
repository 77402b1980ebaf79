//! Schema initialisation.

use std::path::Path;

use tracing::{info, instrument};

use super::{OutputFormat, TodoRepository};
use crate::{sql, RepositoryError};

impl TodoRepository {
    /// Create the `todos` table if it does not exist yet. Idempotent.
    #[instrument(skip(self), fields(db = %self.config.path.display()))]
    pub async fn init_schema(&self) -> Result<(), RepositoryError> {
        self.run_sql(
            OutputFormat::Plain,
            sql::CREATE_TODOS_TABLE,
            RepositoryError::SchemaFailed,
        )
        .await?;

        info!("schema ready");
        Ok(())
    }

    /// Feed a SQL script to the engine, stopping at the first error.
    ///
    /// The script is redirected to the engine's stdin, so it may mix SQL with
    /// the engine's dot-commands.
    #[instrument(skip(self), fields(db = %self.config.path.display()))]
    pub async fn apply_sql_file(&self, path: &Path) -> Result<(), RepositoryError> {
        match tokio::fs::metadata(path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => {
                return Err(RepositoryError::SchemaFile(format!(
                    "{} is not a file",
                    path.display()
                )))
            }
            Err(e) => {
                return Err(RepositoryError::SchemaFile(format!(
                    "{}: {e}",
                    path.display()
                )))
            }
        }

        let command = format!(
            "{} < {}",
            self.invocation(&["-bail"]),
            sql::shell_quote(&path.to_string_lossy())
        );
        self.run_command(&command, None, RepositoryError::SchemaFailed)
            .await?;

        info!(script = %path.display(), "sql script applied");
        Ok(())
    }
}
