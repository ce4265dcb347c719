use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A migration error.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A Redis error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// No resolvable identity for an operation that requires one.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The session backend rejected credentials or returned a partial session.
    #[error("Session error: {0}")]
    Session(String),

    /// A resource not found error. The body stays generic so a caller
    /// cannot tell a missing row from another user's row.
    #[error("Resource not found")]
    NotFound,

    /// A validation error, caught before any backend call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required external credential is absent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The external catalog failed; details are logged, never surfaced.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),

    /// A rate limit exceeded error.
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// The status code and user-facing message for this error.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }

            AppError::Migration(e) => {
                tracing::error!("Migration error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Migration error".to_string())
            }

            AppError::Redis(e) => {
                tracing::error!("Redis error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Session backend error".to_string())
            }

            AppError::Authentication(msg) => {
                tracing::warn!("Authentication failed: {}", msg);
                (StatusCode::UNAUTHORIZED, msg.clone())
            }

            AppError::Session(msg) => {
                tracing::warn!("Session error: {}", msg);
                (StatusCode::UNAUTHORIZED, msg.clone())
            }

            AppError::NotFound => {
                tracing::debug!("Resource not found");
                (StatusCode::NOT_FOUND, "Resource not found".to_string())
            }

            AppError::Validation(msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::Config(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }

            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch from catalog".to_string(),
                )
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }

            AppError::RateLimitExceeded(msg) => {
                tracing::warn!("Rate limit exceeded: {}", msg);
                (StatusCode::TOO_MANY_REQUESTS, msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_maps_to_401_with_message() {
        let (status, message) =
            AppError::Authentication("Not authenticated".to_string()).status_and_message();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Not authenticated");
    }

    #[test]
    fn validation_maps_to_400() {
        let (status, message) =
            AppError::Validation("Query is required".to_string()).status_and_message();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Query is required");
    }

    #[test]
    fn not_found_body_stays_generic() {
        let (status, message) = AppError::NotFound.status_and_message();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "Resource not found");
    }

    #[test]
    fn upstream_details_are_not_surfaced() {
        let (status, message) =
            AppError::Upstream("omdb returned 503: backend melted".to_string())
                .status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Failed to fetch from catalog");
    }

    #[test]
    fn config_maps_to_500() {
        let (status, _) =
            AppError::Config("Catalog API key not configured".to_string()).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn rate_limit_maps_to_429() {
        let (status, _) =
            AppError::RateLimitExceeded("Try again later".to_string()).status_and_message();
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    }
}
