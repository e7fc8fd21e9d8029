//! # Command Router
//!
//! Explicit mapping from command word to a fixed response block. Commands
//! are matched on the first whitespace-delimited word of the message, so
//! `/help extra text` still routes to `/help`. Evaluated by the dispatcher
//! before the audio classifier: a command never reaches the pipeline.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Initial creation with the five static commands

use std::collections::HashMap;

const START_TEXT: &str = "\
**Audio Transcription Bot**

Welcome! Send me any audio file and I'll transcribe it for you.

**Supported formats:**
- Voice messages
- Audio files (MP3, OGG, WAV, M4A, etc.)

**You'll receive:**
- Text file (.txt)
- PDF document (.pdf)

Just send an audio file to get started!";

const HELP_TEXT: &str = "\
**How to use:**

1. Send me a voice message or audio file
2. Wait while I transcribe it (this may take a moment)
3. Receive your transcription in both TXT and PDF formats

**Tips:**
- Clear audio works best
- Supported languages: 90+ languages via Whisper AI
- Max file size: ~25 MB

Need help? Contact the developer.";

const FORMATS_TEXT: &str = "\
**Supported input formats:**
- Voice messages (OGG/Opus)
- MP3, WAV, M4A, FLAC, OGG and other audio files

**Output formats:**
- Plain text (.txt) with the verbatim transcript
- PDF (.pdf) with a paginated, formatted document";

const LANGUAGES_TEXT: &str = "\
**Languages:**

Transcription supports 90+ languages via Whisper AI.
The language is detected automatically; there is nothing to configure.";

const ABOUT_TEXT: &str = "\
**About this bot:**

Transcribes audio messages with the OpenAI Whisper API and returns the
result as a text file and a PDF document. Files are processed per message
and deleted immediately after delivery; nothing is stored.";

/// Static command router
///
/// A lookup table from command word to pre-authored response. Lookup
/// order relative to the audio handler is the dispatcher's concern; the
/// router itself only answers "is this a known command".
#[derive(Clone)]
pub struct CommandRouter {
    routes: HashMap<&'static str, &'static str>,
}

impl CommandRouter {
    pub fn new() -> Self {
        let mut routes = HashMap::new();
        routes.insert("/start", START_TEXT);
        routes.insert("/help", HELP_TEXT);
        routes.insert("/formats", FORMATS_TEXT);
        routes.insert("/languages", LANGUAGES_TEXT);
        routes.insert("/about", ABOUT_TEXT);
        CommandRouter { routes }
    }

    /// Response text for a message, if its first word is a known command
    pub fn route(&self, message_text: &str) -> Option<&'static str> {
        let word = message_text.split_whitespace().next()?;
        self.routes.get(word).copied()
    }

    /// Number of registered commands
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for CommandRouter {
    fn default() -> Self {
        Self::new()
    }
}
