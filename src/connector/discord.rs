//! Discord implementation of the chat connector
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial creation over the serenity HTTP client

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use serenity::http::Http;
use serenity::model::channel::AttachmentType;
use serenity::model::id::{ChannelId, MessageId};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::{AttachmentMeta, ChatConnector, ChatId, StatusHandle};
use crate::core::PipelineError;

/// Timeout for attachment downloads in seconds
const DOWNLOAD_TIMEOUT_SECS: u64 = 60;

/// Chat connector backed by the Discord REST API
pub struct DiscordConnector {
    http: Arc<Http>,
    downloader: reqwest::Client,
}

impl DiscordConnector {
    pub fn new(http: Arc<Http>) -> Result<Self> {
        let downloader = reqwest::Client::builder()
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(DiscordConnector { http, downloader })
    }
}

#[async_trait]
impl ChatConnector for DiscordConnector {
    async fn download_attachment(
        &self,
        attachment: &AttachmentMeta,
        dest: &Path,
    ) -> Result<(), PipelineError> {
        debug!(
            "Downloading attachment {} to {}",
            attachment.filename,
            dest.display()
        );

        let response = self
            .downloader
            .get(&attachment.download_url)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PipelineError::download(format!(
                        "request timed out after {DOWNLOAD_TIMEOUT_SECS} seconds"
                    ))
                } else {
                    PipelineError::download(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::download(format!(
                "server returned HTTP {status}"
            )));
        }

        let bytes = response.bytes().await.map_err(PipelineError::download)?;
        tokio::fs::write(dest, &bytes)
            .await
            .map_err(PipelineError::download)?;

        Ok(())
    }

    async fn send_text(&self, chat: ChatId, text: &str) -> Result<StatusHandle> {
        let message = ChannelId(chat.0)
            .say(&self.http, text)
            .await
            .map_err(|e| anyhow!("failed to send message: {e}"))?;
        Ok(StatusHandle {
            chat,
            message_id: message.id.0,
        })
    }

    async fn edit_text(&self, handle: StatusHandle, text: &str) -> Result<()> {
        ChannelId(handle.chat.0)
            .edit_message(&self.http, MessageId(handle.message_id), |m| {
                m.content(text)
            })
            .await
            .map_err(|e| anyhow!("failed to edit message: {e}"))?;
        Ok(())
    }

    async fn delete_message(&self, handle: StatusHandle) -> Result<()> {
        ChannelId(handle.chat.0)
            .delete_message(&self.http, MessageId(handle.message_id))
            .await
            .map_err(|e| anyhow!("failed to delete message: {e}"))?;
        Ok(())
    }

    async fn send_files(
        &self,
        chat: ChatId,
        text: &str,
        files: &[PathBuf],
    ) -> Result<(), PipelineError> {
        let attachments = files
            .iter()
            .map(|p| AttachmentType::Path(p.as_path()))
            .collect::<Vec<_>>();

        ChannelId(chat.0)
            .send_files(&self.http, attachments, |m| m.content(text))
            .await
            .map_err(PipelineError::delivery)?;

        Ok(())
    }
}
