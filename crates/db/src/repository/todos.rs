//! Todo CRUD operations.

use tracing::{debug, error, info, instrument};

use super::{OutputFormat, TodoRepository};
use crate::{
    models::{parse_todo_rows, Todo},
    sql, RepositoryError,
};

impl TodoRepository {
    /// Return every todo in the engine's default order.
    ///
    /// An empty datastore yields an empty vec, not an error.
    #[instrument(skip(self))]
    pub async fn list_todos(&self) -> Result<Vec<Todo>, RepositoryError> {
        let stdout = self
            .run_sql(OutputFormat::Json, sql::SELECT_TODOS, RepositoryError::QueryFailed)
            .await?;

        let todos = parse_todo_rows(&stdout)
            .inspect_err(|e| error!(error = %e, "could not parse todo listing"))?;

        debug!(count = todos.len(), "listed todos");
        Ok(todos)
    }

    /// Insert a todo. The generated id is not returned; re-list to see it.
    ///
    /// Callers are expected to have rejected blank text already.
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub async fn create_todo(&self, text: &str) -> Result<(), RepositoryError> {
        let statement = sql::insert_todo(text)?;
        self.run_sql(OutputFormat::Plain, &statement, RepositoryError::InsertFailed)
            .await?;

        info!("todo created");
        Ok(())
    }

    /// Permanently delete a todo by id.
    ///
    /// Deleting an id that does not exist succeeds.
    #[instrument(skip(self))]
    pub async fn delete_todo(&self, id: i64) -> Result<(), RepositoryError> {
        if id <= 0 {
            return Err(RepositoryError::InvalidInput(format!(
                "todo id must be positive, got {id}"
            )));
        }

        self.run_sql(
            OutputFormat::Plain,
            &sql::delete_todo(id),
            RepositoryError::DeleteFailed,
        )
        .await?;

        info!("todo deleted");
        Ok(())
    }
}
