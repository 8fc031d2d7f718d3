//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and its mapping
//! onto HTTP responses.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reading_tracker_core::ports::PortError;
use tracing::{debug, error};

use crate::config::ConfigError;
use crate::web::envelope::Envelope;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core services.
    #[error(transparent)]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a failure to apply the embedded migrations.
    #[error("Migration Error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The caller is authenticated but lacks the required role.
    #[error("Forbidden resource")]
    Forbidden,

    /// The request payload or query failed validation.
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Port(port) => match port {
                PortError::NotFound(_) => StatusCode::NOT_FOUND,
                PortError::InvalidRange(_)
                | PortError::OverlapConflict(_)
                | PortError::AlreadyExists(_)
                | PortError::InvalidCredentials => StatusCode::BAD_REQUEST,
                PortError::Unauthorized => StatusCode::UNAUTHORIZED,
                PortError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Config(_)
            | ApiError::Database(_)
            | ApiError::Migration(_)
            | ApiError::Io(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The short error name placed in the envelope's `error` field.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Port(PortError::NotFound(_)) => "NotFound",
            ApiError::Port(PortError::InvalidRange(_)) => "InvalidRange",
            ApiError::Port(PortError::OverlapConflict(_)) => "OverlapConflict",
            ApiError::Port(PortError::AlreadyExists(_)) => "AlreadyExists",
            ApiError::Port(PortError::InvalidCredentials) => "InvalidCredentials",
            ApiError::Port(PortError::Unauthorized) => "Unauthorized",
            ApiError::Forbidden => "Forbidden",
            ApiError::Validation(_) => "ValidationError",
            _ => "Internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!("Request failed: {:?}", self);
            "Internal server error".to_string()
        } else {
            debug!(status = status.as_u16(), "Request rejected: {}", self);
            self.to_string()
        };
        let body = Envelope::<()>::failure(status, self.kind(), message);
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(vec![rejection.body_text()])
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(vec![rejection.body_text()])
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(vec![rejection.body_text()])
    }
}
