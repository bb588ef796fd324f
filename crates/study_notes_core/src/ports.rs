//! crates/study_notes_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! The question generator is the only outbound dependency, and it sits behind
//! this boundary so the web layer never depends on a particular provider SDK.

use async_trait::async_trait;

use crate::domain::QuestionsResponse;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// The model declined to produce content, with its stated reason.
    #[error("Model refused: {0}")]
    Refused(String),
    /// The model answered, but not in the agreed output shape.
    #[error("Malformed model output: {0}")]
    MalformedOutput(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait QuestionGenerationService: Send + Sync {
    /// Turns free-text study notes into question/answer pairs.
    async fn generate_questions(&self, notes: &str) -> PortResult<QuestionsResponse>;
}
