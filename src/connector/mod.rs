//! # Connector Module
//!
//! Platform-neutral boundary to the chat service. The pipeline only sees
//! the [`ChatConnector`] trait; the concrete Discord adapter lives in
//! [`discord`]. Tests substitute mocks behind the same trait.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod discord;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use crate::core::PipelineError;

pub use discord::DiscordConnector;

/// Opaque identifier of the conversation a message belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub u64);

/// Metadata of an inbound attachment, as far as the pipeline cares
#[derive(Clone, Debug)]
pub struct AttachmentMeta {
    pub filename: String,
    pub mime_type: Option<String>,
    /// Set by the platform adapter for voice-note style attachments
    pub is_voice_note: bool,
    pub download_url: String,
}

/// One inbound chat message, already stripped of platform specifics
#[derive(Clone, Debug)]
pub struct InboundMessage {
    pub chat: ChatId,
    pub user_id: u64,
    pub text: String,
    pub attachment: Option<AttachmentMeta>,
    pub received_at: DateTime<Utc>,
}

/// Handle to a message the bot sent, for later edit or deletion
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusHandle {
    pub chat: ChatId,
    pub message_id: u64,
}

/// Capabilities the pipeline consumes from the chat platform
///
/// Method errors map onto the pipeline taxonomy where a stage depends on
/// them (`download_attachment` → `Download`, `send_files` → `Delivery`);
/// status-message operations return `anyhow::Result` because their
/// failures are reported or ignored, never classified.
#[async_trait]
pub trait ChatConnector: Send + Sync {
    /// Download an attachment to `dest`, overwriting any existing file
    async fn download_attachment(
        &self,
        attachment: &AttachmentMeta,
        dest: &Path,
    ) -> Result<(), PipelineError>;

    /// Send a plain text message, returning a handle for edit/delete
    async fn send_text(&self, chat: ChatId, text: &str) -> anyhow::Result<StatusHandle>;

    /// Replace the content of a previously sent message
    async fn edit_text(&self, handle: StatusHandle, text: &str) -> anyhow::Result<()>;

    /// Delete a previously sent message
    async fn delete_message(&self, handle: StatusHandle) -> anyhow::Result<()>;

    /// Send a message with file attachments
    async fn send_files(
        &self,
        chat: ChatId,
        text: &str,
        files: &[PathBuf],
    ) -> Result<(), PipelineError>;
}
