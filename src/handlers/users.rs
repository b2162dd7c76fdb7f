// User handlers
// HTTP handlers for user lookup and creation

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::{
    error::ApiError,
    handlers::AppState,
    models::movie::InsertOutcome,
    models::user::ListUsersQuery,
};

/// Find a user by exact email match
/// GET /users?email=
pub async fn find_user(
    State(state): State<AppState>,
    Query(params): Query<ListUsersQuery>,
) -> Result<impl IntoResponse, ApiError> {
    // Checked here rather than in the extractor so the caller gets a
    // descriptive message instead of a bare 422
    let email = params
        .email
        .ok_or_else(|| ApiError::validation("The email query parameter is required"))?;

    info!("Looking up user by email: {}", email);
    let user = state.db.find_user_by_email(&email).await?;

    Ok((StatusCode::OK, Json(user)))
}

/// Create a new user from the request body, stored verbatim
/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    let inserted_id = state.db.create_user(body).await?;

    Ok((StatusCode::CREATED, Json(InsertOutcome::new(inserted_id))))
}
