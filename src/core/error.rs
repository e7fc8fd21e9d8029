//! Pipeline error taxonomy
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial creation with per-stage error variants

use thiserror::Error;

/// Errors that abort a single pipeline run
///
/// Each variant captures the underlying cause as text so it can be shown
/// to the user and logged. Rendering degradation (character substitution)
/// is deliberately not represented here: it is recovered locally by the
/// renderer and never aborts a run. No variant is process-fatal; a failed
/// run is reported to its own user and the dispatcher keeps going.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Attachment retrieval from the chat platform failed
    #[error("audio download failed: {cause}")]
    Download { cause: String },

    /// Remote transcription provider error, timeout, or malformed response
    #[error("transcription failed: {cause}")]
    Transcription { cause: String },

    /// Outbound delivery failed after rendering succeeded
    #[error("delivery failed: {cause}")]
    Delivery { cause: String },
}

impl PipelineError {
    pub fn download(cause: impl ToString) -> Self {
        PipelineError::Download {
            cause: cause.to_string(),
        }
    }

    pub fn transcription(cause: impl ToString) -> Self {
        PipelineError::Transcription {
            cause: cause.to_string(),
        }
    }

    pub fn delivery(cause: impl ToString) -> Self {
        PipelineError::Delivery {
            cause: cause.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_cause() {
        let err = PipelineError::transcription("request timed out after 60 seconds");
        assert_eq!(
            err.to_string(),
            "transcription failed: request timed out after 60 seconds"
        );
    }

    #[test]
    fn test_download_variant() {
        let err = PipelineError::download("HTTP 404");
        assert!(matches!(err, PipelineError::Download { .. }));
        assert!(err.to_string().contains("HTTP 404"));
    }
}
