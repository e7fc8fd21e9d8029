//! # Features Layer
//!
//! Feature modules for the bot. Transcription is currently the only one.

pub mod transcription;

pub use transcription::{
    classify, Classification, MediaKind, Pipeline, RenderOutcome, Transcriber, WhisperClient,
};
