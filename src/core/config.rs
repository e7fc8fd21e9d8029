//! Environment-backed configuration
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial creation with required-variable validation

use anyhow::{anyhow, Result};
use std::env;

/// Default directory for transient audio and transcript files
pub const DEFAULT_WORK_DIR: &str = "temp_files";

/// Default Whisper model identifier
pub const DEFAULT_WHISPER_MODEL: &str = "whisper-1";

/// Bot configuration loaded from environment variables
///
/// Required variables: `DISCORD_TOKEN`, `OPENAI_API_KEY`.
/// Optional: `WHISPER_MODEL`, `WORK_DIR`, `LOG_LEVEL`.
#[derive(Clone, Debug)]
pub struct Config {
    pub discord_token: String,
    pub openai_api_key: String,
    pub whisper_model: String,
    pub work_dir: String,
    pub log_level: String,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Returns an error naming the missing variable so startup failures
    /// are diagnosable without reading the code.
    pub fn from_env() -> Result<Self> {
        let discord_token = require("DISCORD_TOKEN")?;
        let openai_api_key = require("OPENAI_API_KEY")?;

        Ok(Config {
            discord_token,
            openai_api_key,
            whisper_model: env::var("WHISPER_MODEL")
                .unwrap_or_else(|_| DEFAULT_WHISPER_MODEL.to_string()),
            work_dir: env::var("WORK_DIR").unwrap_or_else(|_| DEFAULT_WORK_DIR.to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(anyhow!(
            "Missing required environment variable {name}. Please check your .env file."
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_empty() {
        env::set_var("AUDIOSCRIBE_TEST_EMPTY", "   ");
        assert!(require("AUDIOSCRIBE_TEST_EMPTY").is_err());
        env::remove_var("AUDIOSCRIBE_TEST_EMPTY");
    }

    #[test]
    fn test_require_returns_value() {
        env::set_var("AUDIOSCRIBE_TEST_SET", "token-value");
        assert_eq!(require("AUDIOSCRIBE_TEST_SET").unwrap(), "token-value");
        env::remove_var("AUDIOSCRIBE_TEST_SET");
    }

    #[test]
    fn test_missing_variable_names_itself() {
        let err = require("AUDIOSCRIBE_TEST_MISSING").unwrap_err();
        assert!(err.to_string().contains("AUDIOSCRIBE_TEST_MISSING"));
    }
}
