//! # Feature: Audio Transcription
//!
//! Whisper-powered transcription of audio attachments, delivered back to
//! the user as a text file and a paginated PDF with an inline preview.
//!
//! - **Version**: 1.2.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Collision-proof working-file names (per-run token)
//! - 1.1.0: PDF artifact with Latin-1 substitution fallback
//! - 1.0.0: Initial release with Whisper API integration

pub mod classifier;
pub mod pipeline;
pub mod renderer;
pub mod transcriber;

pub use classifier::{classify, Classification, MediaKind};
pub use pipeline::Pipeline;
pub use renderer::RenderOutcome;
pub use transcriber::{Transcriber, WhisperClient};
