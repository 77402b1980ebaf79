use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use db::Todo;
use serde::Deserialize;
use tracing::info;

use super::AppState;
use crate::response::{ApiError, Envelope};

#[derive(Debug, Deserialize)]
pub struct CreateTodoDto {
    #[serde(default)]
    pub todo: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Envelope<Vec<Todo>>>, ApiError> {
    let todos = state
        .todos
        .list_todos()
        .await
        .map_err(ApiError::repository("Failed to fetch todos"))?;

    Ok(Json(Envelope::data(todos)))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateTodoDto>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<()>>), ApiError> {
    let Json(payload) = payload.map_err(|rejection| {
        info!(%rejection, "unreadable create body");
        ApiError::validation("Invalid request body")
    })?;

    let text = payload.todo.as_deref().map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(ApiError::validation("Todo cannot be empty"));
    }

    state
        .todos
        .create_todo(text)
        .await
        .map_err(ApiError::repository("Failed to create todo"))?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok("Todo created successfully")),
    ))
}

pub async fn delete(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let id = match id.trim().parse::<i64>() {
        Ok(id) if id > 0 => id,
        _ => return Err(ApiError::validation("Invalid todo id")),
    };

    state
        .todos
        .delete_todo(id)
        .await
        .map_err(ApiError::repository("Failed to delete todo"))?;

    Ok(Json(Envelope::ok("Todo deleted successfully")))
}

/// `DELETE /todos` with no id segment.
pub async fn delete_without_id() -> ApiError {
    ApiError::validation("Todo id is required")
}
