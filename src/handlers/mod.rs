// Handlers module
// HTTP handlers for the REST API

pub mod favorites;
pub mod movies;
pub mod users;

use axum::{http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::db::Database;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub featured_limit: i64,
}

/// Root handler
/// Returns a plain liveness message, matching what deployed frontends poll
pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, "server is running")
}

/// Health check handler
/// Returns "OK" with 200 status for monitoring purposes
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
