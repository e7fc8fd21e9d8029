//! Per-message transcription pipeline
//!
//! Owns the run state machine: acquire → transcribe → render → deliver →
//! cleanup. Each run executes as one independent task, owns its working
//! files exclusively, and always deletes them before terminating, on
//! success and on failure alike.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.2.0: Per-run token in working-file names (same-second collisions)
//! - 1.1.0: Failure reporting with captured causes, unconditional cleanup
//! - 1.0.0: Initial stage sequence

use chrono::Local;
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use super::classifier::{file_extension, MediaKind};
use super::renderer::{self, document_stamp};
use super::transcriber::Transcriber;
use crate::connector::{ChatConnector, ChatId, InboundMessage, StatusHandle};
use crate::core::{transcript_preview, PipelineError};

/// Acknowledgment sent before any blocking work begins
pub const ACK_TEXT: &str = "Processing your audio... Please wait.";
/// Status shown while the remote transcription call is in flight
pub const TRANSCRIBING_TEXT: &str = "Transcribing audio with AI...";
/// Status shown while artifacts are being delivered
pub const SENDING_TEXT: &str = "Sending your transcription...";

/// Stages of one pipeline run
///
/// Strictly sequential within a run; `Failed` is reachable from every
/// non-terminal stage and still passes through cleanup before the run
/// terminates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Received,
    Downloading,
    Transcribing,
    Rendering,
    Delivering,
    CleaningUp,
    Done,
    Failed,
}

/// The transcription pipeline, shared by all runs
///
/// Holds the explicit context (connector, transcriber, working directory)
/// passed in at construction; no ambient singletons. Cloning is cheap and
/// each spawned run takes its own clone.
#[derive(Clone)]
pub struct Pipeline {
    connector: Arc<dyn ChatConnector>,
    transcriber: Arc<dyn Transcriber>,
    work_dir: PathBuf,
}

/// Mutable state of one run; never shared across runs
struct PipelineRun {
    request_id: Uuid,
    user_id: u64,
    chat: ChatId,
    stage: Stage,
    status: Option<StatusHandle>,
    working_files: Vec<PathBuf>,
}

impl PipelineRun {
    fn new(message: &InboundMessage) -> Self {
        PipelineRun {
            request_id: Uuid::new_v4(),
            user_id: message.user_id,
            chat: message.chat,
            stage: Stage::Received,
            status: None,
            working_files: Vec::new(),
        }
    }

    fn advance(&mut self, stage: Stage) {
        debug!(
            "[{}] stage {:?} -> {:?} (user {})",
            self.request_id, self.stage, stage, self.user_id
        );
        self.stage = stage;
    }

    /// Short disambiguator making names unique even within one second
    fn token(&self) -> String {
        self.request_id.simple().to_string()[..8].to_string()
    }
}

impl Pipeline {
    pub fn new(
        connector: Arc<dyn ChatConnector>,
        transcriber: Arc<dyn Transcriber>,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Pipeline {
            connector,
            transcriber,
            work_dir: work_dir.into(),
        }
    }

    /// Execute one full run for an eligible message
    ///
    /// Never returns an error: every failure is reported to the user and
    /// absorbed here so the dispatcher keeps accepting events.
    pub async fn run(&self, message: InboundMessage, kind: MediaKind, mime_type: Option<String>) {
        let mut run = PipelineRun::new(&message);
        info!(
            "[{}] pipeline started for user {} ({:?})",
            run.request_id, run.user_id, kind
        );

        if let Err(e) = tokio::fs::create_dir_all(&self.work_dir).await {
            error!(
                "[{}] cannot create working directory {}: {e}",
                run.request_id,
                self.work_dir.display()
            );
            return;
        }

        // User feedback within one round trip, before any blocking work
        match self.connector.send_text(run.chat, ACK_TEXT).await {
            Ok(handle) => run.status = Some(handle),
            Err(e) => {
                // Nothing can be reported to this chat at all
                error!("[{}] failed to send acknowledgment: {e}", run.request_id);
                return;
            }
        }

        let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let token = run.token();

        run.advance(Stage::Downloading);
        let extension = file_extension(kind, mime_type.as_deref());
        let audio_path = self.work_dir.join(format!(
            "{}_{}_{}_{}.{}",
            kind.file_prefix(),
            run.user_id,
            stamp,
            token,
            extension
        ));
        run.working_files.push(audio_path.clone());

        let Some(attachment) = message.attachment.as_ref() else {
            // Unreachable through the dispatcher: classification requires one
            error!("[{}] eligible message without attachment", run.request_id);
            cleanup_working_files(&run.working_files).await;
            return;
        };
        if let Err(e) = self
            .connector
            .download_attachment(attachment, &audio_path)
            .await
        {
            self.fail(&mut run, e).await;
            return;
        }
        info!("[{}] downloaded audio: {}", run.request_id, audio_path.display());

        run.advance(Stage::Transcribing);
        self.update_status(&run, TRANSCRIBING_TEXT).await;
        let transcript = match self.transcriber.transcribe(&audio_path).await {
            Ok(text) => text,
            Err(e) => {
                self.fail(&mut run, e).await;
                return;
            }
        };
        info!(
            "[{}] transcription completed for user {}",
            run.request_id, run.user_id
        );

        run.advance(Stage::Rendering);
        let doc_stamp = document_stamp(Local::now());
        let txt_path = self
            .work_dir
            .join(format!("transcription_{}_{}_{}.txt", run.user_id, stamp, token));
        let pdf_path = self
            .work_dir
            .join(format!("transcription_{}_{}_{}.pdf", run.user_id, stamp, token));
        run.working_files.push(txt_path.clone());
        run.working_files.push(pdf_path.clone());

        // Render failures degrade the artifact set, never the run
        let mut artifacts = Vec::new();
        match renderer::write_text_artifact(&transcript, &doc_stamp, &txt_path) {
            Ok(()) => artifacts.push(txt_path.clone()),
            Err(e) => warn!("[{}] text artifact skipped: {e}", run.request_id),
        }
        match renderer::render_pdf(&transcript, &doc_stamp, &pdf_path) {
            Ok(outcome) => {
                if outcome.degraded {
                    info!(
                        "[{}] PDF rendered with character substitution",
                        run.request_id
                    );
                }
                artifacts.push(pdf_path.clone());
            }
            Err(e) => warn!("[{}] PDF artifact skipped: {e}", run.request_id),
        }

        run.advance(Stage::Delivering);
        self.update_status(&run, SENDING_TEXT).await;
        let completion = format!(
            "**Transcription Complete!**\n\nPreview:\n{}",
            transcript_preview(&transcript)
        );
        let delivery = if artifacts.is_empty() {
            self.connector
                .send_text(run.chat, &completion)
                .await
                .map(|_| ())
                .map_err(PipelineError::delivery)
        } else {
            self.connector
                .send_files(run.chat, &completion, &artifacts)
                .await
        };
        if let Err(e) = delivery {
            self.fail(&mut run, e).await;
            return;
        }

        // Transient acknowledgment is removed once the result is delivered
        if let Some(handle) = run.status.take() {
            if let Err(e) = self.connector.delete_message(handle).await {
                debug!("[{}] could not delete status message: {e}", run.request_id);
            }
        }

        run.advance(Stage::CleaningUp);
        cleanup_working_files(&run.working_files).await;
        run.advance(Stage::Done);
        info!(
            "[{}] pipeline finished for user {}",
            run.request_id, run.user_id
        );
    }

    /// Best-effort status edit; a failed edit never aborts the run
    async fn update_status(&self, run: &PipelineRun, text: &str) {
        if let Some(handle) = run.status {
            if let Err(e) = self.connector.edit_text(handle, text).await {
                debug!("[{}] status update failed: {e}", run.request_id);
            }
        }
    }

    /// Absorb a failed run: report it, then clean up unconditionally
    async fn fail(&self, run: &mut PipelineRun, error: PipelineError) {
        error!("[{}] run failed: {error}", run.request_id);
        run.advance(Stage::Failed);

        let report = format!(
            "Error processing audio: {error}\n\nPlease try again or contact support."
        );
        if let Err(e) = self.connector.send_text(run.chat, &report).await {
            error!("[{}] failed to report error to user: {e}", run.request_id);
        }

        if let Some(handle) = run.status.take() {
            if let Err(e) = self.connector.delete_message(handle).await {
                debug!("[{}] could not delete status message: {e}", run.request_id);
            }
        }

        run.advance(Stage::CleaningUp);
        cleanup_working_files(&run.working_files).await;
    }
}

/// Delete every working file of a run
///
/// Idempotent: files that were never created, or were already deleted,
/// are a no-op. Other delete failures are logged and ignored; cleanup is
/// never allowed to escalate.
pub async fn cleanup_working_files(paths: &[PathBuf]) {
    for path in paths {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!("removed working file {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("failed to remove working file {}: {e}", path.display()),
        }
    }
}

/// Build the audio working-file name for a run (exposed for tests)
#[doc(hidden)]
pub fn audio_file_name(kind: MediaKind, user_id: u64, stamp: &str, token: &str, ext: &str) -> String {
    format!("{}_{}_{}_{}.{}", kind.file_prefix(), user_id, stamp, token, ext)
}
