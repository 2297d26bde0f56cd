//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`; the response body is always `{message, error?}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::{AuthError, ProviderError};

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// External provider (media host, payment, AI) failed.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized")]
    Unauthorized,

    /// Authenticated but not allowed.
    #[error("Forbidden")]
    Forbidden,

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body: `{message, error?}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl AppError {
    /// Whether this error is a server fault worth capturing to Sentry.
    ///
    /// A repository `NotFound` is a routine 404, not a fault.
    fn is_server_fault(&self) -> bool {
        match self {
            Self::Database(RepositoryError::NotFound) => false,
            Self::Database(_) | Self::Internal(_) | Self::Provider(_) => true,
            _ => false,
        }
    }

    /// The status and JSON body this error responds with.
    fn response_parts(&self) -> (StatusCode, ErrorBody) {
        let status = match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Provider(_) => StatusCode::BAD_GATEWAY,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = match self {
            Self::Database(RepositoryError::NotFound) => ErrorBody {
                message: "Not found".to_string(),
                error: None,
            },
            // Server faults keep a generic message; the detail rides in `error`
            Self::Database(_) | Self::Internal(_) => ErrorBody {
                message: "Server error".to_string(),
                error: Some(self.to_string()),
            },
            Self::Provider(err) => ErrorBody {
                message: "Upstream provider error".to_string(),
                error: Some(err.to_string()),
            },
            Self::Auth(err) => ErrorBody {
                message: match err {
                    AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                    AuthError::UserAlreadyExists => {
                        "An account with this email already exists".to_string()
                    }
                    AuthError::WeakPassword(msg) => msg.clone(),
                    AuthError::InvalidEmail(_) => "Invalid email address".to_string(),
                    _ => "Authentication error".to_string(),
                },
                error: None,
            },
            _ => ErrorBody {
                message: self.to_string(),
                error: None,
            },
        };

        (status, body)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_fault() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let (status, body) = self.response_parts();
        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Product not found".to_string());
        assert_eq!(err.to_string(), "Product not found");

        let err = AppError::Unauthorized;
        assert_eq!(err.to_string(), "Unauthorized");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(get_status(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(get_status(AppError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_repository_not_found_is_a_routine_404() {
        let err = AppError::Database(RepositoryError::NotFound);
        assert!(!err.is_server_fault());

        let (status, body) = err.response_parts();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "Not found");
        assert!(body.error.is_none());
    }

    #[test]
    fn test_other_database_errors_are_server_faults() {
        let err = AppError::Database(RepositoryError::DataCorruption("bad row".to_string()));
        assert!(err.is_server_fault());

        let (status, body) = err.response_parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Server error");
        assert!(body.error.is_some());
    }

    #[test]
    fn test_error_body_skips_missing_detail() {
        let body = ErrorBody {
            message: "Unauthorized".to_string(),
            error: None,
        };
        let json = serde_json::to_string(&body).expect("serialize");
        assert_eq!(json, r#"{"message":"Unauthorized"}"#);
    }
}
