//! Typed error type for the db crate.

use thiserror::Error;

use runner::ExecutionError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("query failed: {0}")]
    QueryFailed(String),

    #[error("insert failed: {0}")]
    InsertFailed(String),

    #[error("delete failed: {0}")]
    DeleteFailed(String),

    #[error("schema initialisation failed: {0}")]
    SchemaFailed(String),

    #[error("schema file error: {0}")]
    SchemaFile(String),

    /// The engine answered, but not with the rows we asked for.
    #[error("malformed engine output: {0}")]
    MalformedOutput(String),

    /// A value that cannot be expressed as a statement literal.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("engine could not be run: {0}")]
    Execution(#[from] ExecutionError),
}
