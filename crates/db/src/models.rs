//! The `Todo` model and the parser for engine output.
//!
//! `sqlite3 -json` prints one JSON array per result set. Integer columns
//! normally come out as JSON numbers, but values stored with text affinity
//! come out as strings, so ids are coerced explicitly. Rows that do not match
//! the expected shape reject the whole listing instead of being patched up.

use serde::{Deserialize, Serialize};

use crate::RepositoryError;

/// A persisted todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub text: String,
}

/// One row exactly as the engine printed it.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTodoRow {
    id: RawId,
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

impl TryFrom<RawTodoRow> for Todo {
    type Error = String;

    fn try_from(raw: RawTodoRow) -> Result<Self, Self::Error> {
        let id = match raw.id {
            RawId::Int(id) => id,
            RawId::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("id {s:?} is not an integer"))?,
        };
        if id <= 0 {
            return Err(format!("id {id} is not positive"));
        }
        if raw.text.trim().is_empty() {
            return Err(format!("todo {id} has empty text"));
        }
        Ok(Todo { id, text: raw.text })
    }
}

/// Parse the stdout of a `-json` listing into todos.
///
/// The engine prints nothing at all for an empty result set, so blank output
/// is an empty listing rather than a parse error.
pub fn parse_todo_rows(stdout: &str) -> Result<Vec<Todo>, RepositoryError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<RawTodoRow> = serde_json::from_str(trimmed)
        .map_err(|e| RepositoryError::MalformedOutput(e.to_string()))?;

    rows.into_iter()
        .enumerate()
        .map(|(i, raw)| {
            Todo::try_from(raw)
                .map_err(|msg| RepositoryError::MalformedOutput(format!("row {i}: {msg}")))
        })
        .collect()
}
