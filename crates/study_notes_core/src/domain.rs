//! crates/study_notes_core/src/domain.rs
//!
//! Defines the core data structures exchanged between the browser, the service
//! and the question-generating model.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::ports::PortError;

/// The body a client sends to ask for questions.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NotesRequest {
    pub notes: String,
}

impl NotesRequest {
    /// Length of the notes in characters, which is what the size limit is measured in.
    pub fn len(&self) -> usize {
        self.notes.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

/// A single question-and-answer pair produced by the model.
///
/// `unsure` is set by the model when it believes the notes are factually wrong.
/// It is only serialized back out when the model actually provided it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct QAPair {
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unsure: Option<bool>,
}

impl QAPair {
    pub fn is_unsure(&self) -> bool {
        self.unsure.unwrap_or(false)
    }
}

/// The full set of pairs, in the order the model produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct QuestionsResponse {
    pub pairs: Vec<QAPair>,
}

impl QuestionsResponse {
    /// Parses raw model output against the output contract.
    ///
    /// Every pair must carry a string `question` and `answer`, may carry a boolean
    /// `unsure`, and nothing else. Anything short of that is rejected whole.
    pub fn from_model_output(raw: &str) -> Result<Self, PortError> {
        serde_json::from_str(raw).map_err(|e| PortError::MalformedOutput(e.to_string()))
    }
}
