//! Remote transcription client
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Plain-text response format, explicit error taxonomy
//! - 1.0.0: Initial release with Whisper API integration

use async_trait::async_trait;
use log::{error, info};
use reqwest::multipart;
use std::path::Path;

use crate::core::PipelineError;

/// OpenAI transcription endpoint
const TRANSCRIPTION_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Capability boundary to the speech-to-text provider
///
/// One call per pipeline run; the full transcript comes back as a single
/// string with no length limit imposed here. Implementations never retry.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, PipelineError>;
}

/// Whisper API client
///
/// Submits the audio file as multipart form data requesting plain-text
/// output. No language is specified; the provider auto-detects.
pub struct WhisperClient {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl WhisperClient {
    pub fn new(api_key: String, model: String) -> Self {
        WhisperClient {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }

    /// Extract a human-readable message from an OpenAI error body
    ///
    /// Error responses are JSON (`{"error": {"message": ...}}`) even when
    /// plain text was requested. Falls back to the raw body.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| body.trim().to_string())
    }
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, PipelineError> {
        info!("Transcribing audio file: {}", audio_path.display());

        // Scoped read: the file contents are owned here, nothing stays open
        let audio_bytes = tokio::fs::read(audio_path)
            .await
            .map_err(|e| PipelineError::transcription(format!("could not read audio file: {e}")))?;

        let filename = audio_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio.bin".to_string());

        let form = multipart::Form::new()
            .part("file", multipart::Part::bytes(audio_bytes).file_name(filename))
            .text("model", self.model.clone())
            .text("response_format", "text");

        let response = self
            .client
            .post(TRANSCRIPTION_URL)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!("Transcription request failed: {e}");
                if e.is_timeout() {
                    PipelineError::transcription("request to transcription service timed out")
                } else {
                    PipelineError::transcription(e)
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PipelineError::transcription(format!("malformed response: {e}")))?;

        if !status.is_success() {
            let message = Self::error_message(&body);
            error!("Transcription API error ({status}): {message}");
            return Err(PipelineError::transcription(message));
        }

        // response_format=text makes the body the transcript itself
        let text = body.trim_end_matches('\n').to_string();
        info!("Transcription successful, length: {} characters", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn Transcriber) {}

    #[test]
    fn test_error_message_from_json_body() {
        let body = r#"{"error": {"message": "Invalid file format.", "type": "invalid_request_error"}}"#;
        assert_eq!(WhisperClient::error_message(body), "Invalid file format.");
    }

    #[test]
    fn test_error_message_falls_back_to_raw_body() {
        assert_eq!(
            WhisperClient::error_message("Bad Gateway\n"),
            "Bad Gateway"
        );
    }

    #[test]
    fn test_error_message_json_without_error_field() {
        assert_eq!(WhisperClient::error_message(r#"{"ok":true}"#), r#"{"ok":true}"#);
    }
}
