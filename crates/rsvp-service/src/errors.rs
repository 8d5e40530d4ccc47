//! RSVP service error types.
//!
//! Every error maps to an HTTP status via the `IntoResponse` impl. Messages for
//! internal failures are generic; the underlying detail is logged server-side.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// RSVP service error type.
///
/// Status mapping:
/// - Database, Cache, Crypto, Email, Internal: 500
/// - InvalidCredentials, AccountNotActivated, Unauthorized: 401
/// - Forbidden: 403
/// - NotFound: 404
/// - BadRequest, DuplicateEmail: 400
#[derive(Debug, Error)]
pub enum RsvpError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Email error: {0}")]
    Email(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account not activated")]
    AccountNotActivated,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Email address already in use")]
    DuplicateEmail,

    #[error("Internal server error")]
    Internal,
}

impl RsvpError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RsvpError::Database(_)
            | RsvpError::Cache(_)
            | RsvpError::Crypto(_)
            | RsvpError::Email(_)
            | RsvpError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            RsvpError::InvalidCredentials
            | RsvpError::AccountNotActivated
            | RsvpError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            RsvpError::Forbidden(_) => StatusCode::FORBIDDEN,
            RsvpError::NotFound(_) => StatusCode::NOT_FOUND,
            RsvpError::BadRequest(_) | RsvpError::DuplicateEmail => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for RsvpError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (code, message) = match &self {
            RsvpError::Database(err) => {
                tracing::error!(target: "rsvp.database", error = %err, "Database operation failed");
                ("DATABASE_ERROR", "An internal database error occurred".to_string())
            }
            RsvpError::Cache(err) => {
                tracing::error!(target: "rsvp.cache", error = %err, "Session cache operation failed");
                ("CACHE_ERROR", "An internal cache error occurred".to_string())
            }
            RsvpError::Crypto(err) => {
                tracing::error!(target: "rsvp.crypto", error = %err, "Cryptographic operation failed");
                (
                    "CRYPTO_ERROR",
                    "An internal cryptographic error occurred".to_string(),
                )
            }
            RsvpError::Email(err) => {
                tracing::error!(target: "rsvp.email", error = %err, "Email operation failed");
                ("EMAIL_ERROR", "An internal email error occurred".to_string())
            }
            RsvpError::InvalidCredentials => (
                "INVALID_CREDENTIALS",
                "Invalid email or password".to_string(),
            ),
            RsvpError::AccountNotActivated => (
                "ACCOUNT_NOT_ACTIVATED",
                "Account has not been activated".to_string(),
            ),
            RsvpError::Unauthorized(reason) => ("UNAUTHORIZED", reason.clone()),
            RsvpError::Forbidden(reason) => ("FORBIDDEN", reason.clone()),
            RsvpError::NotFound(resource) => ("NOT_FOUND", resource.clone()),
            RsvpError::BadRequest(reason) => ("BAD_REQUEST", reason.clone()),
            RsvpError::DuplicateEmail => (
                "DUPLICATE_EMAIL",
                "Email address already in use".to_string(),
            ),
            RsvpError::Internal => ("INTERNAL_ERROR", "An internal error occurred".to_string()),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<sqlx::Error> for RsvpError {
    fn from(err: sqlx::Error) -> Self {
        RsvpError::Database(err.to_string())
    }
}

impl From<redis::RedisError> for RsvpError {
    fn from(err: redis::RedisError) -> Self {
        RsvpError::Cache(err.to_string())
    }
}

impl From<JsonRejection> for RsvpError {
    fn from(rejection: JsonRejection) -> Self {
        RsvpError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for RsvpError {
    fn from(rejection: PathRejection) -> Self {
        RsvpError::BadRequest(rejection.body_text())
    }
}
