//! # Core Module
//!
//! Core domain types, configuration, and error handling for the transcription bot.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add response module with preview truncation utilities
//! - 1.0.0: Initial creation with config and error modules

pub mod config;
pub mod error;
pub mod response;

// Re-export commonly used items
pub use config::Config;
pub use error::PipelineError;
pub use response::{transcript_preview, PREVIEW_LIMIT, PREVIEW_MARKER};
