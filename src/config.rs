use crate::error::{env_error, AppResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;

/// Default Gemini model for timetable extraction
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default path for the usage-state TOML file
pub const DEFAULT_STATE_FILE: &str = "config/unitable-state.toml";

/// Main configuration structure for the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Gemini API key used by the extraction service (absent when only
    /// pre-extracted text is processed)
    pub gemini_api_key: Option<String>,
    /// Gemini model name
    pub gemini_model: String,
    /// Path of the TOML file backing the usage store
    pub state_file: String,
}

impl Config {
    /// Load configuration from environment
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let gemini_api_key = env::var("GEMINI_API_KEY").ok();

        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| String::from(DEFAULT_GEMINI_MODEL));

        let state_file =
            env::var("UNITABLE_STATE_FILE").unwrap_or_else(|_| String::from(DEFAULT_STATE_FILE));

        Ok(Config {
            gemini_api_key,
            gemini_model,
            state_file,
        })
    }

    /// Get the API key, failing when AI extraction was requested without one
    pub fn require_api_key(&self) -> AppResult<&str> {
        self.gemini_api_key
            .as_deref()
            .ok_or_else(|| env_error("GEMINI_API_KEY"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_api_key() {
        let config = Config {
            gemini_api_key: Some("key".to_string()),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            state_file: DEFAULT_STATE_FILE.to_string(),
        };
        assert_eq!(config.require_api_key().unwrap(), "key");

        let config = Config {
            gemini_api_key: None,
            ..config
        };
        assert!(config.require_api_key().is_err());
    }
}
