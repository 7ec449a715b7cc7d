//! Remote speech-to-text backends and the sequential transcription loop.

mod backend;
mod remote_api;
mod worker;

pub use backend::SpeechBackend;
pub use remote_api::{RemoteSttBackend, RemoteSttConfig};
pub use worker::{transcribe_all, transcribe_segment, TranscriptionOutcome, WorkerSummary};
