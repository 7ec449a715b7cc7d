//! Convert audio/video files to text transcripts and chat with an AI about them.
//!
//! The core is the segmentation and sequential transcription pipeline: a WAV
//! source is cut into fixed-length segments, each segment goes to a remote
//! speech-recognition service one request at a time, per-segment failures are
//! tolerated, and progress/cancellation flow through `PipelineObserver` and
//! `CancelFlag`. Front ends attach at those seams; the library never depends
//! on a rendering technology.

pub mod audio;
pub mod chat;
pub mod config;
pub mod error;
pub mod media;
pub mod paths;
pub mod pipeline;
pub mod transcription;

pub use chat::{ChatClient, ChatConfig, ConversationMemory, Summarizer};
pub use config::AppConfig;
pub use error::{ChatError, PipelineError};
pub use pipeline::{
    run_pipeline, CancelFlag, LogObserver, Phase, PipelineObserver, PipelineOptions,
    PipelineOutcome, PipelineReport, ProgressUpdate,
};
pub use transcription::{RemoteSttBackend, RemoteSttConfig, SpeechBackend};
