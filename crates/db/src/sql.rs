//! Statement builders and quoting.
//!
//! Values never reach the engine spliced in raw. Text becomes a single SQL
//! string literal through [`string_literal`], and statements are written to
//! the engine's stdin rather than its command line. The words that do go on
//! the command line (engine binary, datastore path, script path) pass through
//! [`shell_quote`]. Integers are formatted from typed values.

use crate::RepositoryError;

pub const CREATE_TODOS_TABLE: &str = "CREATE TABLE IF NOT EXISTS todos (\
     id INTEGER PRIMARY KEY AUTOINCREMENT, \
     todo TEXT NOT NULL\
     );";

pub const SELECT_TODOS: &str = "SELECT id, todo AS text FROM todos;";

/// `INSERT` for one todo.
pub fn insert_todo(text: &str) -> Result<String, RepositoryError> {
    Ok(format!(
        "INSERT INTO todos(todo) VALUES ({});",
        string_literal(text)?
    ))
}

/// `DELETE` for one todo by id.
pub fn delete_todo(id: i64) -> String {
    format!("DELETE FROM todos WHERE id = {id};")
}

/// Quote `value` as a SQL string literal by doubling single quotes.
///
/// NUL would end the statement early, so it is rejected.
pub fn string_literal(value: &str) -> Result<String, RepositoryError> {
    if value.contains('\0') {
        return Err(RepositoryError::InvalidInput(
            "text contains a NUL byte".to_string(),
        ));
    }
    Ok(format!("'{}'", value.replace('\'', "''")))
}

/// Quote `arg` as one POSIX shell word.
///
/// Inside single quotes the shell interprets nothing, so the only character
/// needing care is `'` itself, written as `'\''`.
pub fn shell_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}
