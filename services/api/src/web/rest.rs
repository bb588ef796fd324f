//! services/api/src/web/rest.rs
//!
//! Contains the notes-to-questions relay handler and the master definition for
//! the OpenAPI specification.

use crate::{
    error::ServiceError,
    web::{
        auth::{self, TokenRequest},
        middleware::AuthenticatedEmail,
        state::AppState,
    },
};
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    Extension,
};
use std::sync::Arc;
use study_notes_core::domain::{NotesRequest, QAPair, QuestionsResponse};
use tracing::{error, info};
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::issue_token_handler,
        questions_handler,
    ),
    components(
        schemas(TokenRequest, NotesRequest, QAPair, QuestionsResponse)
    ),
    tags(
        (name = "Study Questions API", description = "Turns study notes into question/answer pairs.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Generate question/answer pairs from study notes.
///
/// Requires a token from `/api/token` in an `Authorization: Bearer` header.
#[utoipa::path(
    post,
    path = "/api/questions",
    request_body = NotesRequest,
    responses(
        (status = 200, description = "Generated pairs", body = QuestionsResponse),
        (status = 400, description = "Notes too long, empty or not valid JSON"),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 500, description = "Provider not configured, refused, or returned malformed output")
    ),
    params(
        ("Authorization" = String, Header, description = "`Bearer <token>`")
    )
)]
pub async fn questions_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthenticatedEmail(email)): Extension<AuthenticatedEmail>,
    payload: Result<Json<NotesRequest>, JsonRejection>,
) -> Result<Json<QuestionsResponse>, ServiceError> {
    let Json(body) = payload.map_err(|e| ServiceError::InvalidRequest(e.body_text()))?;

    if body.len() > state.config.max_notes_length {
        return Err(ServiceError::PayloadTooLarge);
    }
    if body.is_empty() {
        return Err(ServiceError::InvalidRequest("Notes required".to_string()));
    }

    // Kept so abuse of a shared deployment can be traced back to a token holder.
    info!(target: "audit", email = %email, notes = %body.notes, "Questions requested");

    let adapter = state
        .questions_adapter
        .as_ref()
        .ok_or(ServiceError::ServiceUnavailable)?;

    let questions = adapter
        .generate_questions(&body.notes)
        .await
        .map_err(|e| {
            error!("Question generation failed for {}: {:?}", email, e);
            ServiceError::from(e)
        })?;

    Ok(Json(questions))
}
