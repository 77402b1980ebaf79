//! `api` crate — HTTP layer for the todo service.
//!
//! Exposes:
//!   GET    /todos
//!   POST   /todos
//!   DELETE /todos/{id}
//!
//! and, when a client directory is configured, serves it for every other
//! path. Every API response is an [`Envelope`]; handler panics are turned
//! into a 500 envelope at the boundary.

pub mod handlers;
pub mod response;

use std::path::PathBuf;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};
use tracing::{info, warn};

pub use handlers::AppState;
pub use response::{ApiError, Envelope};

use handlers::todos;

/// Router-level options.
#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    /// Directory holding the browser client, served for non-API paths.
    pub static_dir: Option<PathBuf>,
    /// Allow cross-origin requests from anywhere.
    pub cors: bool,
}

/// Build the full router.
pub fn router(state: AppState, config: &ApiConfig) -> Router {
    let mut app = Router::new()
        .route(
            "/todos",
            get(todos::list)
                .post(todos::create)
                .delete(todos::delete_without_id),
        )
        .route("/todos/{id}", axum::routing::delete(todos::delete));

    if let Some(dir) = &config.static_dir {
        if dir.is_dir() {
            info!(dir = %dir.display(), "serving static client");
            app = app.fallback_service(ServeDir::new(dir));
        } else {
            warn!(dir = %dir.display(), "static directory not found, client not served");
        }
    }

    let mut app = app
        .with_state(state)
        .layer(CatchPanicLayer::custom(response::panic_response))
        .layer(TraceLayer::new_for_http());

    if config.cors {
        app = app.layer(CorsLayer::permissive());
    }

    app
}

/// Bind `bind` and serve until Ctrl-C or SIGTERM.
pub async fn serve(bind: &str, state: AppState, config: ApiConfig) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(bind).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(state, &config))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "could not listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
