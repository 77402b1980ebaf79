//! HTTP handlers. One module per resource.

pub mod todos;

use std::sync::Arc;

use db::TodoRepository;

/// Shared state handed to every handler.
///
/// Cloning is cheap; the repository itself holds no mutable state.
#[derive(Clone)]
pub struct AppState {
    pub todos: Arc<TodoRepository>,
}

impl AppState {
    pub fn new(todos: TodoRepository) -> Self {
        Self {
            todos: Arc::new(todos),
        }
    }
}
