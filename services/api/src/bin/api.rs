//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{questions_llm::load_system_message, OpenAiQuestionsAdapter},
    config::Config,
    error::ApiError,
    web::{build_router, state::AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use std::sync::Arc;
use study_notes_core::ports::QuestionGenerationService;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");
    info!("Notes limit: {} characters", config.max_notes_length);

    // --- 2. Initialize the Question Generator ---
    // Built once and shared read-only by every request. Without a key the
    // service still issues tokens, but the relay answers with a 500.
    let questions_adapter: Option<Arc<dyn QuestionGenerationService>> =
        match config.openai_api_key.as_ref() {
            Some(api_key) => {
                let system_message = load_system_message(&config.system_message_path)?;
                let openai_client =
                    Client::with_config(OpenAIConfig::new().with_api_key(api_key.as_str()));
                info!("Question generator ready (model: {})", config.questions_model);
                Some(Arc::new(OpenAiQuestionsAdapter::new(
                    openai_client,
                    config.questions_model.clone(),
                    system_message,
                )))
            }
            None => {
                warn!("OPENAI_API_KEY is not set; /api/questions will be unavailable");
                None
            }
        };

    // --- 3. Build the Shared AppState & Router ---
    let app_state = Arc::new(AppState::new(config.clone(), questions_adapter));
    let app = build_router(app_state);

    // --- 4. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
