//! Inbound event dispatch
//!
//! Binds the command router, the attachment classifier, and the pipeline
//! to the connector's inbound message stream. Commands are checked first;
//! every eligible audio message starts exactly one independent pipeline
//! task; everything else is ignored.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial creation with command-before-audio ordering

use log::{debug, error};
use std::sync::Arc;

use crate::commands::CommandRouter;
use crate::connector::{ChatConnector, InboundMessage};
use crate::features::transcription::classifier::{classify, Classification};
use crate::features::transcription::Pipeline;

/// Routes each inbound message to a static command response, one pipeline
/// run, or nothing
///
/// All collaborators are explicit constructor arguments; the dispatcher
/// holds no ambient state and can be driven directly in tests.
pub struct Dispatcher {
    connector: Arc<dyn ChatConnector>,
    router: CommandRouter,
    pipeline: Pipeline,
}

impl Dispatcher {
    pub fn new(connector: Arc<dyn ChatConnector>, router: CommandRouter, pipeline: Pipeline) -> Self {
        Dispatcher {
            connector,
            router,
            pipeline,
        }
    }

    /// Handle one inbound message
    ///
    /// Commands are answered inline. Eligible audio spawns a detached task
    /// so a slow transcription never blocks dispatch of the next message.
    /// Returns the run's join handle when a pipeline was started; the
    /// production caller drops it, tests await it.
    pub async fn dispatch(&self, message: InboundMessage) -> Option<tokio::task::JoinHandle<()>> {
        if let Some(response) = self.router.route(&message.text) {
            if let Err(e) = self.connector.send_text(message.chat, response).await {
                error!("failed to send command response: {e}");
            }
            return None;
        }

        match classify(&message) {
            Classification::Eligible { kind, mime_type } => {
                let pipeline = self.pipeline.clone();
                Some(tokio::spawn(async move {
                    pipeline.run(message, kind, mime_type).await;
                }))
            }
            Classification::NotEligible => {
                debug!("ignoring non-eligible message from user {}", message.user_id);
                None
            }
        }
    }
}
