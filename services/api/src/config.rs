//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// Notes longer than this many characters are rejected unless overridden.
pub const DEFAULT_MAX_NOTES_LENGTH: usize = 2500;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Shared secret a caller must present to be issued a token.
    pub user_secret: String,
    /// Symmetric key tokens are signed with.
    pub jwt_secret: String,
    pub openai_api_key: Option<String>,
    pub questions_model: String,
    pub system_message_path: PathBuf,
    pub max_notes_length: usize,
}

// Secrets stay out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("log_level", &self.log_level)
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "<set>"))
            .field("questions_model", &self.questions_model)
            .field("system_message_path", &self.system_message_path)
            .field("max_notes_length", &self.max_notes_length)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server Settings ---
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Token Secrets ---
        let user_secret = lookup("WORKSHOP_PASSWORD")
            .or_else(|| lookup("USER_SECRET"))
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingVar("WORKSHOP_PASSWORD".to_string()))?;

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingVar("JWT_SECRET".to_string()))?;

        // --- Provider Settings (the API key is optional) ---
        let openai_api_key = lookup("OPENAI_API_KEY").filter(|k| !k.is_empty());
        let questions_model =
            lookup("QUESTIONS_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());
        let system_message_path = lookup("SYSTEM_MESSAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./prompts/system_message.txt"));

        let max_notes_length = match lookup("MAX_NOTES_LENGTH") {
            Some(raw) => raw.parse::<usize>().ok().filter(|n| *n > 0).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "MAX_NOTES_LENGTH".to_string(),
                    format!("'{}' is not a positive integer", raw),
                )
            })?,
            None => DEFAULT_MAX_NOTES_LENGTH,
        };

        Ok(Self {
            bind_address,
            log_level,
            user_secret,
            jwt_secret,
            openai_api_key,
            questions_model,
            system_message_path,
            max_notes_length,
        })
    }
}
