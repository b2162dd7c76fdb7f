use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mongodb::error::ErrorKind;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::Database(ref err) => {
                tracing::error!("MongoDB error: {}", err);

                // Map driver failures to a user-facing message without
                // leaking connection strings or server internals
                let user_message = if err.contains("timed out") || err.contains("timeout") {
                    "Database operation timed out, please try again"
                } else if err.contains("selection") || err.contains("connection") {
                    "Database service is temporarily unavailable"
                } else {
                    "A database error occurred"
                };

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    user_message.to_string(),
                )
            }
            ApiError::Validation(ref message) => {
                tracing::debug!("Validation error: {}", message);
                (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    message.clone(),
                )
            }
            ApiError::NotFound(ref resource) => {
                tracing::debug!("Resource not found: {}", resource);
                (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{} not found", resource),
                )
            }
            ApiError::Internal(ref err) => {
                tracing::error!("Internal server error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

// MongoDB driver error mapping
impl From<mongodb::error::Error> for ApiError {
    fn from(err: mongodb::error::Error) -> Self {
        match *err.kind {
            ErrorKind::ServerSelection { ref message, .. } => {
                tracing::error!("MongoDB server selection failed: {}", message);
                ApiError::Database("Database server selection failed".to_string())
            }
            ErrorKind::Io(ref io_err) => {
                tracing::error!("MongoDB connection I/O error: {}", io_err);
                ApiError::Database("Database connection unavailable".to_string())
            }
            ErrorKind::Authentication { ref message, .. } => {
                tracing::error!("MongoDB authentication failed: {}", message);
                ApiError::Database("Database access denied".to_string())
            }
            ErrorKind::InvalidArgument { ref message, .. } => {
                ApiError::Validation(format!("Invalid query argument: {}", message))
            }
            ErrorKind::BsonSerialization(ref bson_err) => {
                ApiError::Validation(format!("Invalid document payload: {}", bson_err))
            }
            ErrorKind::BsonDeserialization(ref bson_err) => {
                tracing::error!("Failed to decode stored document: {}", bson_err);
                ApiError::Database("Stored document could not be decoded".to_string())
            }
            _ => {
                tracing::error!("Unhandled MongoDB error: {}", err);
                ApiError::Database("Database operation failed".to_string())
            }
        }
    }
}

// Result type alias for convenience
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let response = ApiError::validation("bad id").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = ApiError::not_found("Movie").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_database_maps_to_500() {
        let response = ApiError::Database("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_maps_to_500() {
        let response = ApiError::Internal(anyhow::anyhow!("oops")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
