// Library root for the Movie REST API

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;

// Re-export commonly used types
pub use db::Database;
pub use error::{ApiError, ApiResult};
pub use handlers::AppState;
