//! Sequential per-segment transcription loop.

use crate::audio::Segment;
use crate::pipeline::{CancelFlag, Phase, PipelineObserver, PipelineState};
use crate::transcription::SpeechBackend;
use log::warn;

/// Outcome of one segment's single transcription attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionOutcome {
    /// Recognized text.
    Text(String),
    /// The service understood the audio but found no speech in it.
    NoSpeechDetected,
    /// Service or network failure, including timeouts.
    ServiceError(String),
}

/// What the loop produced. `lines` holds one entry per successful segment,
/// in segment order; failed or skipped segments contribute nothing.
#[derive(Debug, Clone)]
pub struct WorkerSummary {
    pub lines: Vec<String>,
    pub cancelled: bool,
}

impl WorkerSummary {
    /// The transcript: newline-joined successful lines.
    pub fn transcript(&self) -> String {
        self.lines.join("\n")
    }
}

/// Submit one segment to the backend. Never fails: every failure mode maps to
/// an outcome the loop can count and move past.
pub async fn transcribe_segment(
    backend: &dyn SpeechBackend,
    segment: &Segment,
    language: &str,
) -> TranscriptionOutcome {
    match backend.transcribe(&segment.path, language).await {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                TranscriptionOutcome::NoSpeechDetected
            } else {
                TranscriptionOutcome::Text(text.to_string())
            }
        }
        Err(message) => TranscriptionOutcome::ServiceError(message),
    }
}

/// Drive the loop over all segments, strictly in order, one at a time.
///
/// Per segment: poll the cancellation flag, transcribe, count the outcome,
/// delete the segment file (best-effort), report progress. Per-segment
/// failures are logged and counted but never abort the loop; segments are
/// never retried. On cancellation the loop stops before the next segment and
/// reports a cancelled terminal progress state.
pub async fn transcribe_all(
    backend: &dyn SpeechBackend,
    segments: &[Segment],
    language: &str,
    state: &mut PipelineState,
    cancel: &CancelFlag,
    observer: &dyn PipelineObserver,
) -> WorkerSummary {
    let mut lines = Vec::new();

    for segment in segments {
        if cancel.is_cancelled() {
            observer.on_log(&format!(
                "Transcription cancelled at segment {}/{}",
                state.current(),
                state.total()
            ));
            observer.on_progress(&state.snapshot(Phase::Cancelled));
            return WorkerSummary { lines, cancelled: true };
        }

        state.begin_segment();
        let segment_name = segment
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("segment {}", segment.index));

        match transcribe_segment(backend, segment, language).await {
            TranscriptionOutcome::Text(text) => {
                state.record_ok();
                observer.on_log(&format!("{}: {}", segment_name, text));
                lines.push(text);
            }
            TranscriptionOutcome::NoSpeechDetected => {
                state.record_failed();
                observer.on_log(&format!("No speech detected in {}", segment_name));
            }
            TranscriptionOutcome::ServiceError(message) => {
                state.record_failed();
                observer.on_log(&format!(
                    "Transcription request failed for {}: {}",
                    segment_name, message
                ));
            }
        }

        // The segment had its one attempt; its backing file goes regardless
        // of the outcome. Deletion failures must not abort the run.
        if let Err(e) = std::fs::remove_file(&segment.path) {
            warn!("Failed to delete {}: {}", segment.path.display(), e);
        }

        observer.on_progress(&state.snapshot(Phase::Transcribing));
    }

    WorkerSummary { lines, cancelled: false }
}
