//! The JSON envelope every response is wrapped in, and the handler error type.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use db::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

/// Message sent when a handler panicked.
pub const SERVER_ERROR: &str = "Server error";

/// `{success, data}` on reads, `{success, message}` on writes and failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

impl Envelope<()> {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Everything a todo handler can fail with.
///
/// Only the `Display` text of a variant reaches the client; repository
/// details are logged and replaced with a fixed message.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was rejected before the datastore was touched.
    #[error("{0}")]
    Validation(String),

    #[error("{context}")]
    Repository {
        context: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wrap a repository failure under a client-facing `context` message.
    ///
    /// Input the repository refused to encode is still the client's fault.
    pub fn repository(context: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |source| match source {
            RepositoryError::InvalidInput(message) => Self::Validation(message),
            source => Self::Repository { context, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Repository { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Validation(message) => warn!(%message, "request rejected"),
            Self::Repository { context, source } => {
                error!(error = %source, context = *context, "repository operation failed");
            }
        }
        (self.status(), Json(Envelope::failure(self.to_string()))).into_response()
    }
}

/// Panic boundary: turn a handler panic into the generic 500 envelope.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    error!(detail, "handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Envelope::failure(SERVER_ERROR)),
    )
        .into_response()
}
