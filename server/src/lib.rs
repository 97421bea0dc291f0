//! Todo list REST service.
//!
//! # Overview
//! Serves a single ordered todo list under `/api` and static front-end files
//! from an assets directory at `/`. Todos are ranked by `order`, highest
//! first; moving a todo onto an occupied order swaps the two.
//!
//! # Design
//! - [`store::TodoStore`] is the only shared mutable resource. It is opened
//!   once at startup and handed to handlers through [`AppState`].
//! - Request bodies pass [`validate`] before any handler logic runs.
//! - Handlers return [`AppError`], which is the one place failures are
//!   logged and turned into `{"errorMessage": ...}` responses.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod ordering;
pub mod store;
pub mod validate;

use std::path::Path;

use axum::routing::{get, patch};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::AppError;
pub use handlers::AppState;
pub use model::Todo;

/// Routes under `/api`, without state or static files.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api", get(handlers::greet))
        .route("/api/", get(handlers::greet))
        .route(
            "/api/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/api/todos/{todo_id}",
            patch(handlers::update_todo).delete(handlers::delete_todo),
        )
}

/// The complete application: API routes, static assets from `assets_dir`
/// for every other path, and request tracing.
pub fn app(state: AppState, assets_dir: impl AsRef<Path>) -> Router {
    api_routes()
        .fallback_service(ServeDir::new(assets_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(
    listener: TcpListener,
    state: AppState,
    assets_dir: &Path,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state, assets_dir)).await
}
