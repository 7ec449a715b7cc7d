//! Error types for the transcription pipeline.

use thiserror::Error;

/// Fatal pipeline errors. Anything that ends a run with `Failed`.
///
/// Per-segment conditions (no speech, service error, a segment that could not
/// be written) are deliberately not here: they are recovered locally inside
/// the loop and can never abort a run. Cancellation is not an error either;
/// it is a normal `PipelineReport` outcome.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Unsupported input format: {extension}. Use .mp4, .ogg, .mp3 or .wav")]
    UnsupportedFormat { extension: String },

    #[error("Conversion to WAV failed: {message}")]
    ConversionFailed { message: String },

    #[error("Failed to open audio source {path}: {message}")]
    SourceOpen { path: String, message: String },

    #[error("Audio produced no segments")]
    NoSegments,

    #[error("Failed to write transcript to {path}: {message}")]
    TranscriptWrite { path: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the remote text-completion collaborator.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Chat API is not configured. Set an API key first")]
    NotConfigured,

    #[error("Input too long to summarize: the service rejected the request for exceeding its context limit")]
    InputTooLong,

    #[error("Chat service error: {message}")]
    Service { message: String },
}

impl ChatError {
    /// Classify a service rejection. Context-length refusals get their own
    /// variant so the user sees an actionable message instead of a generic
    /// API error.
    pub fn from_service_message(message: String) -> Self {
        let lower = message.to_lowercase();
        let too_long = ["maximum context length", "context length", "context_length", "token limit", "too many tokens", "request too large"]
            .iter()
            .any(|needle| lower.contains(needle));
        if too_long {
            ChatError::InputTooLong
        } else {
            ChatError::Service { message }
        }
    }
}
