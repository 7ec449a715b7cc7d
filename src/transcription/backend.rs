//! Speech-to-text backend seam.

use async_trait::async_trait;
use std::path::Path;

/// A speech-recognition service that accepts one audio segment per request.
///
/// `Ok` carries the recognized text, which may be empty or whitespace when
/// the service understood the audio but found no speech in it. `Err` carries
/// the service/network failure message.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<String, String>;
}
