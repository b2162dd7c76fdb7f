use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{error, info};

use movie_rest_api::{
    config::Config,
    db::Database,
    handlers::{
        favorites::{add_favorite, get_favorite_movies, remove_favorite},
        health_check,
        movies::{
            create_movie, delete_movie, get_all_movies, get_featured_movies, get_movie_by_id,
            update_movie,
        },
        root,
        users::{create_user, find_user},
        AppState,
    },
    middleware::{apply_middleware, init_tracing},
};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize tracing: {}", e);
        std::process::exit(1);
    }

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Build the database handle; the driver connects lazily
    let database = match Database::connect(&config.database).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!("Failed to build database client: {}", e);
            std::process::exit(1);
        }
    };

    // Verify the store is reachable before accepting traffic
    if let Err(e) = database.ping().await {
        error!("Database is unreachable: {}", e);
        std::process::exit(1);
    }
    info!("Database connection established");

    let state = AppState {
        db: database,
        featured_limit: config.featured_limit,
    };

    // Create the Axum router with all endpoints and middleware
    let app = apply_middleware(create_router(state));

    // Create socket address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            info!("Server listening on {}", addr);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Start the server with graceful shutdown handling
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

/// Create the Axum router with all endpoints
fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness endpoints
        .route("/", get(root))
        .route("/health", get(health_check))
        // Movie collection endpoints
        .route("/movies", get(get_all_movies))
        .route("/movies", post(create_movie))
        .route("/movies/:id", get(get_movie_by_id))
        .route("/movies/:id", patch(update_movie))
        .route("/movies/:id", delete(delete_movie))
        .route("/features", get(get_featured_movies))
        // User endpoints
        .route("/users", get(find_user))
        .route("/users", post(create_user))
        // Favorites relationship endpoints
        .route("/favorites/:user_id", get(get_favorite_movies))
        .route("/favorites/:user_id", post(add_favorite))
        .route("/favorites/:user_id/:movie_id", delete(remove_favorite))
        // Shared state (database handle + featured list limit)
        .with_state(state)
}

/// Graceful shutdown signal handler
/// Listens for SIGTERM and SIGINT signals
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, initiating graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, initiating graceful shutdown");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{self, Request, StatusCode},
    };
    use http_body_util::BodyExt; // for `collect`
    use movie_rest_api::config::DatabaseConfig;
    use serde_json::{json, Value};
    use tower::ServiceExt; // for `oneshot`

    /// Builds a router over a lazily-connecting client. No MongoDB server is
    /// running in tests, so any route that passes validation and actually
    /// queries the store would fail; the routes exercised here must reject
    /// bad input before any store access.
    async fn test_app() -> Router {
        let database = DatabaseConfig {
            host: "localhost:27017".to_string(),
            database: "moviesDB".to_string(),
            username: "test".to_string(),
            password: "test".to_string(),
            connection_string: None,
        };
        let db = Database::connect(&database)
            .await
            .expect("client construction should not require a live server");

        create_router(AppState {
            db: Arc::new(db),
            featured_limit: 7,
        })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_reports_liveness() {
        let app = test_app().await;

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"server is running");
    }

    #[tokio::test]
    async fn health_check_returns_ok() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/does-not-exist")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn user_lookup_requires_email_parameter() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("email"));
    }

    #[tokio::test]
    async fn malformed_movie_id_is_rejected_before_store_access() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/movies/not-an-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn add_favorite_rejects_malformed_user_id() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method(http::Method::POST)
                    .uri("/favorites/not-an-id")
                    .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                    .body(Body::from(
                        serde_json::to_vec(&json!({"movieId": "653f1a2b3c4d5e6f7a8b9c0d"}))
                            .unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn remove_favorite_rejects_malformed_movie_id() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method(http::Method::DELETE)
                    .uri("/favorites/653f1a2b3c4d5e6f7a8b9c0d/garbage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn create_movie_rejects_non_object_body() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method(http::Method::POST)
                    .uri("/movies")
                    .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                    .body(Body::from(serde_json::to_vec(&json!([1, 2, 3])).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_movie_rejects_empty_patch() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .method(http::Method::PATCH)
                    .uri("/movies/653f1a2b3c4d5e6f7a8b9c0d")
                    .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
                    .body(Body::from(serde_json::to_vec(&json!({})).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
