//! Error types for the company service
//!
//! Each component reports its own error type. [`ServiceError`] is the only
//! type that reaches callers; conversions into it log the underlying fault
//! and drop its text.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors reported by a company repository
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// No record matches, or the identifier is malformed
    #[error("Company not found")]
    NotFound,

    /// Another company already uses the email
    #[error("Email already registered")]
    DuplicateEmail,

    /// Storage engine failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Type alias for repository results
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors reported by the token service
#[derive(Error, Debug)]
pub enum TokenError {
    /// Malformed, tampered, expired or incomplete token
    #[error("Invalid token")]
    Invalid,

    /// Signing or serialization failure
    #[error("Failed to encode token: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),

    /// Key material could not be loaded
    #[error("Invalid token key material: {0}")]
    Key(String),
}

/// Errors reported by the password hasher
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Invalid hashing parameters: {0}")]
    Params(String),

    #[error("Hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Caller-facing error taxonomy of the company service
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The request asked for an API version this service does not implement
    #[error(
        "unsupported API version: service implements API version '{implemented}', but asked for '{requested}'"
    )]
    VersionMismatch {
        implemented: &'static str,
        requested: String,
    },

    /// Bad credentials, bad or expired token, or ownership violation
    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("Company not found")]
    NotFound,

    #[error("Email already registered")]
    AlreadyExists,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Hashing, token signing or storage fault; details are only logged
    #[error("Internal server error")]
    Internal,
}

impl ServiceError {
    pub const INVALID_TOKEN: Self = ServiceError::Unauthenticated("Invalid Token");
    pub const INVALID_CREDENTIALS: Self = ServiceError::Unauthenticated("Invalid credentials");

    /// HTTP status a transport should answer with
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::VersionMismatch { .. } => StatusCode::NOT_IMPLEMENTED,
            ServiceError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::AlreadyExists => StatusCode::CONFLICT,
            ServiceError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ServiceError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::DuplicateEmail => ServiceError::AlreadyExists,
            RepositoryError::Database(e) => {
                error!("Repository failure: {}", e);
                ServiceError::Internal
            }
        }
    }
}

impl From<TokenError> for ServiceError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => ServiceError::INVALID_TOKEN,
            other => {
                error!("Token service failure: {}", other);
                ServiceError::Internal
            }
        }
    }
}

impl From<HashError> for ServiceError {
    fn from(err: HashError) -> Self {
        error!("Password hashing failure: {}", err);
        ServiceError::Internal
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string(),
        }));

        (self.status_code(), body).into_response()
    }
}

/// Type alias for service results
pub type ServiceResult<T> = Result<T, ServiceError>;
