//! Attachment eligibility classification
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial creation with voice-note and MIME rules

use crate::connector::InboundMessage;

/// What kind of transcribable media a message carries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    /// A voice-note attachment, always eligible
    Voice,
    /// A generic file attachment with an `audio/*` MIME type
    AudioDocument,
}

impl MediaKind {
    /// Prefix used in working-file names for this kind of media
    pub fn file_prefix(self) -> &'static str {
        match self {
            MediaKind::Voice => "voice",
            MediaKind::AudioDocument => "audio",
        }
    }
}

/// Outcome of classifying one inbound message
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Classification {
    Eligible {
        kind: MediaKind,
        mime_type: Option<String>,
    },
    NotEligible,
}

/// Decide whether a message should enter the transcription pipeline
///
/// Command-prefixed text (leading `/`) is never eligible, even with an
/// audio attachment: commands belong to the router. Voice notes are
/// always eligible; other attachments only when their declared MIME type
/// starts with `audio/`. Side-effect-free.
pub fn classify(message: &InboundMessage) -> Classification {
    if message.text.starts_with('/') {
        return Classification::NotEligible;
    }

    let Some(attachment) = &message.attachment else {
        return Classification::NotEligible;
    };

    if attachment.is_voice_note {
        return Classification::Eligible {
            kind: MediaKind::Voice,
            mime_type: attachment.mime_type.clone(),
        };
    }

    match &attachment.mime_type {
        Some(mime) if mime.starts_with("audio/") => Classification::Eligible {
            kind: MediaKind::AudioDocument,
            mime_type: Some(mime.clone()),
        },
        _ => Classification::NotEligible,
    }
}

/// Derive the working-file extension for an eligible attachment
///
/// Voice notes are stored as `ogg`; audio documents use the MIME subtype
/// (`audio/mpeg` → `mpeg`), falling back to `bin` when the subtype is
/// missing or empty.
pub fn file_extension(kind: MediaKind, mime_type: Option<&str>) -> String {
    match kind {
        MediaKind::Voice => "ogg".to_string(),
        MediaKind::AudioDocument => mime_type
            .and_then(|m| m.split('/').nth(1))
            .map(|s| s.split(';').next().unwrap_or(s).trim())
            .filter(|s| !s.is_empty())
            .unwrap_or("bin")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::{AttachmentMeta, ChatId};
    use chrono::Utc;

    fn message(text: &str, attachment: Option<AttachmentMeta>) -> InboundMessage {
        InboundMessage {
            chat: ChatId(1),
            user_id: 42,
            text: text.to_string(),
            attachment,
            received_at: Utc::now(),
        }
    }

    fn attachment(mime: Option<&str>, voice: bool) -> AttachmentMeta {
        AttachmentMeta {
            filename: "clip.bin".to_string(),
            mime_type: mime.map(str::to_string),
            is_voice_note: voice,
            download_url: "https://cdn.example/clip".to_string(),
        }
    }

    #[test]
    fn test_voice_note_is_eligible() {
        let msg = message("", Some(attachment(Some("audio/ogg"), true)));
        assert_eq!(
            classify(&msg),
            Classification::Eligible {
                kind: MediaKind::Voice,
                mime_type: Some("audio/ogg".to_string()),
            }
        );
    }

    #[test]
    fn test_audio_document_is_eligible() {
        let msg = message("listen to this", Some(attachment(Some("audio/mpeg"), false)));
        assert_eq!(
            classify(&msg),
            Classification::Eligible {
                kind: MediaKind::AudioDocument,
                mime_type: Some("audio/mpeg".to_string()),
            }
        );
    }

    #[test]
    fn test_non_audio_document_not_eligible() {
        let msg = message("", Some(attachment(Some("application/pdf"), false)));
        assert_eq!(classify(&msg), Classification::NotEligible);
    }

    #[test]
    fn test_missing_mime_not_eligible() {
        let msg = message("", Some(attachment(None, false)));
        assert_eq!(classify(&msg), Classification::NotEligible);
    }

    #[test]
    fn test_plain_text_not_eligible() {
        let msg = message("hello there", None);
        assert_eq!(classify(&msg), Classification::NotEligible);
    }

    #[test]
    fn test_command_never_eligible_even_with_audio() {
        let msg = message("/help", Some(attachment(Some("audio/ogg"), true)));
        assert_eq!(classify(&msg), Classification::NotEligible);
    }

    #[test]
    fn test_extension_for_voice() {
        assert_eq!(file_extension(MediaKind::Voice, Some("audio/ogg")), "ogg");
        assert_eq!(file_extension(MediaKind::Voice, None), "ogg");
    }

    #[test]
    fn test_extension_from_mime_subtype() {
        assert_eq!(
            file_extension(MediaKind::AudioDocument, Some("audio/mpeg")),
            "mpeg"
        );
        assert_eq!(
            file_extension(MediaKind::AudioDocument, Some("audio/mp4; codecs=aac")),
            "mp4"
        );
    }

    #[test]
    fn test_extension_fallback() {
        assert_eq!(file_extension(MediaKind::AudioDocument, None), "bin");
        assert_eq!(file_extension(MediaKind::AudioDocument, Some("audio/")), "bin");
    }
}
