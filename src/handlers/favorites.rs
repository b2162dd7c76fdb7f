// Favorites handlers
// HTTP handlers for the per-user favorites set

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::info;

use crate::{error::ApiError, handlers::AppState, models::user::AddFavoriteRequest};

/// Resolve a user's favorites to full movie documents
/// GET /favorites/:user_id
pub async fn get_favorite_movies(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let movies = state.db.get_favorite_movies(&user_id).await?;

    if movies.is_empty() {
        info!("User {} has no favorite movies", user_id);
        return Ok((
            StatusCode::OK,
            Json(json!({ "message": "No favorite movies yet" })),
        )
            .into_response());
    }

    info!("Retrieved {} favorite movies for user {}", movies.len(), user_id);
    Ok((StatusCode::OK, Json(movies)).into_response())
}

/// Add a movie to a user's favorites set (no duplicates)
/// POST /favorites/:user_id
pub async fn add_favorite(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<AddFavoriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let update = state.db.add_favorite(&user_id, &request.movie_id).await?;

    Ok((StatusCode::OK, Json(update)))
}

/// Remove a movie from a user's favorites set
/// DELETE /favorites/:user_id/:movie_id
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let update = state.db.remove_favorite(&user_id, &movie_id).await?;

    Ok((StatusCode::OK, Json(update)))
}
