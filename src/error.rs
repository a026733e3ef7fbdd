//! Service error type and its HTTP mapping.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

/// Result alias used across the service layer.
pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Every failure a request can end in.
#[derive(Error, Debug)]
pub enum AppError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: sqlx::Error,
    },
    /// Entity lookup by identifier failed
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    Validation { field: String, reason: String },
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    /// State conflicts such as duplicate keys or exhausted seats
    #[error("{0}")]
    Conflict(String),
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,
    /// Upstream payment gateway failures
    #[error("Payment gateway error: {0}")]
    Payment(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wrap a sqlx error with a short description of the failed operation.
    pub fn database(message: impl Into<String>, source: sqlx::Error) -> Self {
        match source {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict(format!("{}: record already exists", message.into()))
            }
            source => AppError::Database {
                message: message.into(),
                source,
            },
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        AppError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable label placed in the `error` field of responses.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Database { .. } | AppError::Internal(_) => "Internal Server Error",
            AppError::NotFound { .. } => "Not Found",
            AppError::Validation { .. } => "Bad Request",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Forbidden(_) => "Forbidden",
            AppError::Conflict(_) => "Conflict",
            AppError::RateLimited => "Too Many Requests",
            AppError::Payment(_) => "Bad Gateway",
        }
    }
}

/// Attach an operation description to sqlx results.
pub trait DbContext<T> {
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DbContext<T> for std::result::Result<T, sqlx::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| AppError::database(message, e))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::Payment(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            // Never leak driver details to clients
            AppError::Database { message, source } => {
                tracing::error!(error = %source, "{}", message);
                "A database error occurred".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.kind(),
            "message": message,
        }))
    }
}
