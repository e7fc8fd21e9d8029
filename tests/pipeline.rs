//! End-to-end pipeline tests with a mock connector and transcriber.

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use audioscribe::commands::CommandRouter;
use audioscribe::connector::{
    AttachmentMeta, ChatConnector, ChatId, InboundMessage, StatusHandle,
};
use audioscribe::core::PipelineError;
use audioscribe::dispatcher::Dispatcher;
use audioscribe::features::transcription::{MediaKind, Pipeline, Transcriber};

/// One `send_files` call as observed by the mock
#[derive(Clone)]
struct Delivery {
    text: String,
    /// Filename and contents captured at delivery time, before cleanup
    files: Vec<(String, Vec<u8>)>,
}

#[derive(Default)]
struct MockConnector {
    next_message_id: AtomicU64,
    sent: Mutex<Vec<(u64, String)>>,
    edits: Mutex<Vec<(u64, String)>>,
    deleted: Mutex<Vec<u64>>,
    deliveries: Mutex<Vec<Delivery>>,
    download_dests: Mutex<Vec<PathBuf>>,
}

impl MockConnector {
    fn sent_texts(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }

    fn edit_texts(&self) -> Vec<String> {
        self.edits.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }
}

#[async_trait]
impl ChatConnector for MockConnector {
    async fn download_attachment(
        &self,
        _attachment: &AttachmentMeta,
        dest: &Path,
    ) -> Result<(), PipelineError> {
        tokio::fs::write(dest, b"fake audio bytes")
            .await
            .map_err(PipelineError::download)?;
        self.download_dests.lock().unwrap().push(dest.to_path_buf());
        Ok(())
    }

    async fn send_text(&self, chat: ChatId, text: &str) -> anyhow::Result<StatusHandle> {
        let id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push((id, text.to_string()));
        Ok(StatusHandle {
            chat,
            message_id: id,
        })
    }

    async fn edit_text(&self, handle: StatusHandle, text: &str) -> anyhow::Result<()> {
        self.edits
            .lock()
            .unwrap()
            .push((handle.message_id, text.to_string()));
        Ok(())
    }

    async fn delete_message(&self, handle: StatusHandle) -> anyhow::Result<()> {
        self.deleted.lock().unwrap().push(handle.message_id);
        Ok(())
    }

    async fn send_files(
        &self,
        _chat: ChatId,
        text: &str,
        files: &[PathBuf],
    ) -> Result<(), PipelineError> {
        let mut captured = Vec::new();
        for path in files {
            let bytes = tokio::fs::read(path).await.map_err(PipelineError::delivery)?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            captured.push((name, bytes));
        }
        self.deliveries.lock().unwrap().push(Delivery {
            text: text.to_string(),
            files: captured,
        });
        Ok(())
    }
}

struct FixedTranscriber {
    text: String,
    calls: AtomicUsize,
}

impl FixedTranscriber {
    fn new(text: &str) -> Self {
        FixedTranscriber {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Transcriber for FixedTranscriber {
    async fn transcribe(&self, _audio_path: &Path) -> Result<String, PipelineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.text.clone())
    }
}

struct TimeoutTranscriber;

#[async_trait]
impl Transcriber for TimeoutTranscriber {
    async fn transcribe(&self, _audio_path: &Path) -> Result<String, PipelineError> {
        Err(PipelineError::transcription(
            "request to transcription service timed out",
        ))
    }
}

fn voice_message(user_id: u64) -> InboundMessage {
    InboundMessage {
        chat: ChatId(100),
        user_id,
        text: String::new(),
        attachment: Some(AttachmentMeta {
            filename: "voice-message.ogg".to_string(),
            mime_type: Some("audio/ogg".to_string()),
            is_voice_note: true,
            download_url: "https://cdn.example/voice".to_string(),
        }),
        received_at: Utc::now(),
    }
}

fn remaining_files(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect()
}

#[tokio::test]
async fn end_to_end_voice_note_success() {
    let work_dir = tempfile::tempdir().unwrap();
    let connector = Arc::new(MockConnector::default());
    let transcriber = Arc::new(FixedTranscriber::new("hello world"));
    let pipeline = Pipeline::new(connector.clone(), transcriber, work_dir.path());

    pipeline
        .run(voice_message(42), MediaKind::Voice, Some("audio/ogg".to_string()))
        .await;

    // Acknowledgment first, then both progress edits in order
    assert_eq!(connector.sent_texts(), vec!["Processing your audio... Please wait."]);
    assert_eq!(
        connector.edit_texts(),
        vec!["Transcribing audio with AI...", "Sending your transcription..."]
    );

    // One delivery with the exact preview and both artifacts
    let deliveries = connector.deliveries.lock().unwrap().clone();
    assert_eq!(deliveries.len(), 1);
    let delivery = &deliveries[0];
    assert_eq!(
        delivery.text,
        "**Transcription Complete!**\n\nPreview:\nhello world"
    );
    assert_eq!(delivery.files.len(), 2);

    let (txt_name, txt_bytes) = &delivery.files[0];
    assert!(txt_name.starts_with("transcription_42_") && txt_name.ends_with(".txt"));
    let txt = String::from_utf8(txt_bytes.clone()).unwrap();
    assert!(txt.starts_with("Audio Transcription\nDate: "));
    assert!(txt.contains(&"-".repeat(50)));
    assert!(txt.ends_with("\n\nhello world"));

    let (pdf_name, pdf_bytes) = &delivery.files[1];
    assert!(pdf_name.starts_with("transcription_42_") && pdf_name.ends_with(".pdf"));
    assert!(pdf_bytes.starts_with(b"%PDF"));

    // Acknowledgment removed, working directory empty
    assert_eq!(connector.deleted.lock().unwrap().len(), 1);
    assert!(remaining_files(work_dir.path()).is_empty());
}

#[tokio::test]
async fn transcription_timeout_reports_and_cleans_up() {
    let work_dir = tempfile::tempdir().unwrap();
    let connector = Arc::new(MockConnector::default());
    let pipeline = Pipeline::new(connector.clone(), Arc::new(TimeoutTranscriber), work_dir.path());

    pipeline
        .run(voice_message(42), MediaKind::Voice, Some("audio/ogg".to_string()))
        .await;

    let sent = connector.sent_texts();
    assert_eq!(sent.len(), 2);
    assert!(sent[1].starts_with("Error processing audio: transcription failed:"));
    assert!(sent[1].contains("request to transcription service timed out"));

    // No artifacts were delivered and nothing is left behind
    assert!(connector.deliveries.lock().unwrap().is_empty());
    assert!(remaining_files(work_dir.path()).is_empty());
}

#[tokio::test]
async fn dispatcher_starts_exactly_one_run_per_eligible_message() {
    let work_dir = tempfile::tempdir().unwrap();
    let connector = Arc::new(MockConnector::default());
    let transcriber = Arc::new(FixedTranscriber::new("ok"));
    let pipeline = Pipeline::new(connector.clone(), transcriber.clone(), work_dir.path());
    let dispatcher = Dispatcher::new(connector.clone(), CommandRouter::new(), pipeline);

    // Eligible voice note: one run
    let handle = dispatcher.dispatch(voice_message(7)).await;
    handle.expect("voice note must start a run").await.unwrap();
    assert_eq!(transcriber.calls.load(Ordering::SeqCst), 1);

    // Command: routed to the static responder, no run
    let mut cmd = voice_message(7);
    cmd.text = "/help".to_string();
    assert!(dispatcher.dispatch(cmd).await.is_none());
    assert!(connector
        .sent_texts()
        .iter()
        .any(|t| t.contains("How to use")));

    // Plain text and non-audio documents: no run
    let mut plain = voice_message(7);
    plain.text = "just words".to_string();
    plain.attachment = None;
    assert!(dispatcher.dispatch(plain).await.is_none());

    let mut doc = voice_message(7);
    doc.attachment = Some(AttachmentMeta {
        filename: "notes.pdf".to_string(),
        mime_type: Some("application/pdf".to_string()),
        is_voice_note: false,
        download_url: "https://cdn.example/notes".to_string(),
    });
    assert!(dispatcher.dispatch(doc).await.is_none());

    assert_eq!(transcriber.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_runs_for_same_user_do_not_collide() {
    let work_dir = tempfile::tempdir().unwrap();
    let connector = Arc::new(MockConnector::default());
    let transcriber = Arc::new(FixedTranscriber::new("same second"));
    let pipeline = Pipeline::new(connector.clone(), transcriber, work_dir.path());

    // Same user, effectively the same wall-clock second
    let run_a = pipeline.run(voice_message(42), MediaKind::Voice, Some("audio/ogg".to_string()));
    let run_b = pipeline.run(voice_message(42), MediaKind::Voice, Some("audio/ogg".to_string()));
    tokio::join!(run_a, run_b);

    let dests = connector.download_dests.lock().unwrap().clone();
    assert_eq!(dests.len(), 2);
    assert_ne!(dests[0], dests[1]);

    // Both runs delivered and cleaned up independently
    assert_eq!(connector.deliveries.lock().unwrap().len(), 2);
    assert!(remaining_files(work_dir.path()).is_empty());
}

#[tokio::test]
async fn transcript_with_unencodable_characters_still_delivers_pdf() {
    let work_dir = tempfile::tempdir().unwrap();
    let connector = Arc::new(MockConnector::default());
    let transcriber = Arc::new(FixedTranscriber::new("héllo 🌍 world"));
    let pipeline = Pipeline::new(connector.clone(), transcriber, work_dir.path());

    pipeline
        .run(voice_message(9), MediaKind::Voice, Some("audio/ogg".to_string()))
        .await;

    let deliveries = connector.deliveries.lock().unwrap().clone();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].files.len(), 2);

    // Text artifact stays byte-faithful; PDF still rendered
    let txt = String::from_utf8(deliveries[0].files[0].1.clone()).unwrap();
    assert!(txt.ends_with("héllo 🌍 world"));
    assert!(deliveries[0].files[1].1.starts_with(b"%PDF"));
    assert!(remaining_files(work_dir.path()).is_empty());
}
