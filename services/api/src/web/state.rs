//! services/api/src/web/state.rs
//!
//! Defines the application state shared by every request.

use crate::{config::Config, web::auth::TokenService};
use study_notes_core::ports::QuestionGenerationService;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
///
/// Nothing in here is mutated after startup, so requests read it concurrently
/// without any locking.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: Arc<TokenService>,
    /// Only present when a provider API key was configured.
    pub questions_adapter: Option<Arc<dyn QuestionGenerationService>>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        questions_adapter: Option<Arc<dyn QuestionGenerationService>>,
    ) -> Self {
        let tokens = Arc::new(TokenService::new(
            config.user_secret.clone(),
            config.jwt_secret.as_bytes(),
        ));
        Self {
            config,
            tokens,
            questions_adapter,
        }
    }
}
