// Core layer - shared types, configuration, error taxonomy
pub mod core;

// Connector layer - chat platform boundary (trait + Discord adapter)
pub mod connector;

// Features layer - the transcription pipeline
pub mod features;

// Application layer
pub mod commands;
pub mod dispatcher;

// Re-export core config for convenience
pub use core::{Config, PipelineError};

// Re-export the main moving parts
pub use commands::CommandRouter;
pub use connector::{
    AttachmentMeta, ChatConnector, ChatId, DiscordConnector, InboundMessage, StatusHandle,
};
pub use dispatcher::Dispatcher;
pub use features::transcription::{
    classify, Classification, MediaKind, Pipeline, Transcriber, WhisperClient,
};
