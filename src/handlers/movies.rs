// Movie handlers
// HTTP handlers for movie collection operations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::{
    error::ApiError,
    handlers::AppState,
    models::movie::{DeleteOutcome, InsertOutcome},
};

/// Get all movies
/// GET /movies
pub async fn get_all_movies(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let movies = state.db.get_all_movies().await?;

    info!("Retrieved {} movies", movies.len());
    Ok((StatusCode::OK, Json(movies)))
}

/// Get movie by ID
/// GET /movies/:id
pub async fn get_movie_by_id(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let movie = state.db.get_movie_by_id(&movie_id).await?;

    Ok((StatusCode::OK, Json(movie)))
}

/// Get the featured list: top movies by rating, descending
/// GET /features
pub async fn get_featured_movies(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let movies = state.db.get_featured_movies(state.featured_limit).await?;

    info!("Retrieved {} featured movies", movies.len());
    Ok((StatusCode::OK, Json(movies)))
}

/// Create a new movie from the request body, stored verbatim
/// POST /movies
pub async fn create_movie(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    let inserted_id = state.db.create_movie(body).await?;

    Ok((StatusCode::CREATED, Json(InsertOutcome::new(inserted_id))))
}

/// Merge request body fields into an existing movie
/// PATCH /movies/:id
pub async fn update_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<impl IntoResponse, ApiError> {
    let movie = state.db.update_movie(&movie_id, body).await?;

    Ok((StatusCode::OK, Json(movie)))
}

/// Delete movie by ID
/// DELETE /movies/:id
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted_count = state.db.delete_movie(&movie_id).await?;

    Ok((StatusCode::OK, Json(DeleteOutcome { deleted_count })))
}
