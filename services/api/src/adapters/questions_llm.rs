//! services/api/src/adapters/questions_llm.rs
//!
//! This module contains the adapter for the question-generating LLM.
//! It implements the `QuestionGenerationService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
        ResponseFormatJsonSchema,
    },
    Client,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::Path;
use study_notes_core::{
    domain::QuestionsResponse,
    ports::{PortError, PortResult, QuestionGenerationService},
};
use tracing::{info, warn};

use crate::error::ApiError;

/// Reads the system instruction the model is primed with.
pub fn load_system_message(path: &Path) -> Result<String, ApiError> {
    let message = std::fs::read_to_string(path).map_err(|e| {
        ApiError::Internal(format!(
            "Failed to read system message from {}: {}",
            path.display(),
            e
        ))
    })?;
    if message.trim().is_empty() {
        return Err(ApiError::Internal(format!(
            "System message at {} is empty",
            path.display()
        )));
    }
    Ok(message)
}

/// The JSON schema the model's output is constrained to.
///
/// Accepts objects like:
///
/// ```json
/// { "pairs": [
///     { "question": "What is the capital of France?", "answer": "Paris" },
///     { "question": "What is the capital of Germany?", "answer": "Sydney", "unsure": true }
/// ] }
/// ```
pub fn questions_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "pairs": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "question": { "type": "string" },
                        "answer": { "type": "string" },
                        "unsure": { "type": "boolean" }
                    },
                    "required": ["question", "answer"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["pairs"]
    })
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `QuestionGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiQuestionsAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    system_message: String,
}

impl OpenAiQuestionsAdapter {
    /// Creates a new `OpenAiQuestionsAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, system_message: String) -> Self {
        Self {
            client,
            model,
            system_message,
        }
    }
}

//=========================================================================================
// `QuestionGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl QuestionGenerationService for OpenAiQuestionsAdapter {
    /// Sends the notes as the user message and parses the constrained reply.
    async fn generate_questions(&self, notes: &str) -> PortResult<QuestionsResponse> {
        let messages = vec![
            ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(self.system_message.as_str())
                    .build()
                    .map_err(|e| PortError::Unexpected(e.to_string()))?,
            ),
            ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(notes)
                    .build()
                    .map_err(|e| PortError::Unexpected(e.to_string()))?,
            ),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: None,
                    name: "questions".to_string(),
                    schema: Some(questions_schema()),
                    strict: None,
                },
            })
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let message = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| {
                PortError::Unexpected("Question LLM returned no choices in its response.".to_string())
            })?;

        if let Some(refusal) = message.refusal.filter(|r| !r.is_empty()) {
            warn!("Question LLM refused: {}", refusal);
            return Err(PortError::Refused(refusal));
        }

        let content = message.content.ok_or_else(|| {
            PortError::MalformedOutput("Question LLM response contained no text content.".to_string())
        })?;

        let questions = QuestionsResponse::from_model_output(&content)?;
        info!("Question LLM produced {} pairs", questions.pairs.len());
        Ok(questions)
    }
}
