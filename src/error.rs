//! Application error type shared by every layer.
//!
//! Each variant corresponds to one failure kind of the shortening flow and maps
//! to a single HTTP status. The response body is always `{"error": "<message>"}`;
//! internal causes are logged and never sent to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::utils::db_error::is_unique_violation_on_code;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Malformed input (bad URL, bad request body). Never retried.
    #[error("{message}")]
    Validation { message: String },

    #[error("{message}")]
    NotFound { message: String },

    /// The short code (or, in strict mode, the original URL) is already taken.
    #[error("{message}")]
    Conflict { message: String },

    /// A storage call exceeded its deadline.
    #[error("{message}")]
    Timeout { message: String },

    /// Every generated candidate collided with an existing code.
    #[error("failed to generate a unique short code after {attempts} attempts")]
    ExhaustedRetries { attempts: u32 },

    #[error("{message}")]
    Internal { message: String },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }
    pub fn exhausted_retries(attempts: u32) -> Self {
        Self::ExhaustedRetries { attempts }
    }
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status the delivery layer answers with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            AppError::ExhaustedRetries { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to expose to clients.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Internal { .. } => "internal server error".to_string(),
            AppError::Timeout { .. } => "storage operation timed out".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Internal { message } => tracing::error!("internal server error: {message}"),
            AppError::Timeout { message } => tracing::error!("deadline exceeded: {message}"),
            AppError::ExhaustedRetries { attempts } => {
                tracing::error!(attempts, "short code generation exhausted its retry budget")
            }
            _ => {}
        }

        let body = ErrorBody {
            error: self.public_message(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request(format!("incorrect fields in input data: {e}"))
    }
}

pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if is_unique_violation_on_code(&e) {
        return AppError::conflict("this short url already exists");
    }

    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        tracing::warn!(
            constraint = db.constraint().unwrap_or("unknown"),
            "unique constraint violation"
        );
        return AppError::conflict("this record already exists");
    }

    match e {
        sqlx::Error::PoolTimedOut => AppError::timeout("timed out acquiring a database connection"),
        other => AppError::internal(format!("database error: {other}")),
    }
}
