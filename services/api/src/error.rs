//! services/api/src/error.rs
//!
//! Defines the startup error type and the request-level error taxonomy that
//! every handler converts its failures into.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use study_notes_core::ports::PortError;

use crate::config::ConfigError;

/// The primary error type for starting and running the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// Everything a request can fail with. Each variant maps to exactly one status
/// code and a plain-text body.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Wrong shared secret, or a missing, malformed, forged or expired token.
    #[error("Unauthorized")]
    Unauthorized,

    /// A required field was missing or the body was not the expected JSON.
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Notes too long")]
    PayloadTooLarge,

    /// No provider credential is configured.
    #[error("No OpenAI API key")]
    ServiceUnavailable,

    #[error("Model refused to generate questions: {0}")]
    GenerationRefused(String),

    /// The provider answered with content that does not fit the output contract.
    #[error("Model returned malformed questions")]
    UpstreamParseError(String),

    /// The provider could not be reached or returned an API error.
    #[error("Failed to generate questions")]
    Upstream(String),

    #[error("Internal server error")]
    Internal(String),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::InvalidRequest(_) | ServiceError::PayloadTooLarge => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::ServiceUnavailable
            | ServiceError::GenerationRefused(_)
            | ServiceError::UpstreamParseError(_)
            | ServiceError::Upstream(_)
            | ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PortError> for ServiceError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Refused(reason) => ServiceError::GenerationRefused(reason),
            PortError::MalformedOutput(detail) => ServiceError::UpstreamParseError(detail),
            PortError::Unexpected(detail) => ServiceError::Upstream(detail),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
