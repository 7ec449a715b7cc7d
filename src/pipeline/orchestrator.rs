//! The pipeline run: probe, convert, segment, transcribe, persist, summarize.

use crate::audio::{total_segments, AudioSource, Segment, SegmentCutter};
use crate::chat::Summarizer;
use crate::error::PipelineError;
use crate::media::{probe, transcode_to_wav};
use crate::paths;
use crate::pipeline::{CancelFlag, Phase, PipelineObserver, PipelineState};
use crate::transcription::{transcribe_all, SpeechBackend};
use std::path::{Path, PathBuf};

/// Name of the transcript artifact, overwritten in the output dir each run.
pub const TRANSCRIPT_FILE: &str = "transcript.txt";

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub input: PathBuf,
    /// Where the transcript artifact is written.
    pub output_dir: PathBuf,
    pub segment_length_secs: f64,
    /// Target language code for recognition.
    pub language: String,
}

/// How a run ended, for runs that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    Done,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub outcome: PipelineOutcome,
    /// Set only when a transcript was persisted; a cancelled run persists none.
    pub transcript_path: Option<PathBuf>,
    pub transcript: String,
    pub summary: Option<String>,
    pub total: usize,
    pub ok_count: usize,
    pub fail_count: usize,
    pub elapsed_secs: f64,
}

/// Removes the run-scoped temp dir on every exit path.
struct RunDir(PathBuf);

impl Drop for RunDir {
    fn drop(&mut self) {
        paths::remove_run_dir(&self.0);
    }
}

fn enter(phase: Phase, state: &PipelineState, observer: &dyn PipelineObserver) {
    observer.on_progress(&state.snapshot(phase));
}

fn fail(
    error: PipelineError,
    state: &PipelineState,
    observer: &dyn PipelineObserver,
) -> PipelineError {
    observer.on_log(&error.to_string());
    enter(Phase::Failed, state, observer);
    error
}

fn cancelled_report(state: &PipelineState, observer: &dyn PipelineObserver) -> PipelineReport {
    enter(Phase::Cancelled, state, observer);
    PipelineReport {
        outcome: PipelineOutcome::Cancelled,
        transcript_path: None,
        transcript: String::new(),
        summary: None,
        total: state.total(),
        ok_count: state.ok_count(),
        fail_count: state.fail_count(),
        elapsed_secs: state.elapsed_secs(),
    }
}

/// Run the whole pipeline for one input file.
///
/// State machine: Idle → Converting → Segmenting → Transcribing →
/// Summarizing → Done, with Cancelled reachable from any non-terminal state
/// and Failed from Converting (conversion failure) or Segmenting (zero
/// segments). The transcript is persisted exactly once, on entering
/// Summarizing; a cancelled run discards it. A failed summary is reported
/// but the run still reaches Done.
///
/// Only one pipeline run should be in flight at a time; segments are
/// processed sequentially because the remote calls dominate and the
/// transcript must aggregate in deterministic order.
pub async fn run_pipeline(
    options: &PipelineOptions,
    backend: &dyn SpeechBackend,
    chat: Option<&dyn Summarizer>,
    cancel: &CancelFlag,
    observer: &dyn PipelineObserver,
) -> Result<PipelineReport, PipelineError> {
    let mut state = PipelineState::start();
    enter(Phase::Idle, &state, observer);

    // Probe before any side effect so a bad extension leaves nothing behind.
    let kind = match probe(&options.input) {
        Ok(kind) => kind,
        Err(e) => return Err(fail(e, &state, observer)),
    };
    observer.on_log(&format!(
        "Input {} classified as {:?}",
        options.input.display(),
        kind
    ));

    let run_dir = RunDir(paths::create_run_dir()?);

    enter(Phase::Converting, &state, observer);
    let wav_path = match transcode_to_wav(&options.input, kind, &run_dir.0.join("normalized.wav")) {
        Ok(path) => path,
        Err(e) => return Err(fail(e, &state, observer)),
    };
    observer.on_log("Conversion to WAV complete");
    if cancel.is_cancelled() {
        return Ok(cancelled_report(&state, observer));
    }

    enter(Phase::Segmenting, &state, observer);
    let segments = cut_segments(&wav_path, &run_dir.0, options, cancel, &state, observer)?;
    if cancel.is_cancelled() {
        return Ok(cancelled_report(&state, observer));
    }
    if segments.is_empty() {
        return Err(fail(PipelineError::NoSegments, &state, observer));
    }

    state.set_total(segments.len());
    enter(Phase::Transcribing, &state, observer);
    let summary = transcribe_all(
        backend,
        &segments,
        &options.language,
        &mut state,
        cancel,
        observer,
    )
    .await;
    if summary.cancelled {
        return Ok(cancelled_report(&state, observer));
    }

    enter(Phase::Summarizing, &state, observer);
    let transcript = summary.transcript();
    let transcript_path = options.output_dir.join(TRANSCRIPT_FILE);
    let contents = if transcript.is_empty() {
        String::new()
    } else {
        format!("{}\n", transcript)
    };
    std::fs::write(&transcript_path, contents).map_err(|e| {
        fail(
            PipelineError::TranscriptWrite {
                path: transcript_path.display().to_string(),
                message: e.to_string(),
            },
            &state,
            observer,
        )
    })?;
    observer.on_log(&format!("Transcript saved to {}", transcript_path.display()));

    let chat_summary = match chat {
        Some(client) if !transcript.is_empty() => {
            observer.on_log("Requesting transcript summary");
            match client.summarize(&transcript).await {
                Ok(text) => Some(text),
                Err(e) => {
                    // Non-fatal: the run still finishes with its transcript.
                    observer.on_log(&format!("Summary failed: {}", e));
                    None
                }
            }
        }
        Some(_) => {
            observer.on_log("Transcript is empty; skipping summary");
            None
        }
        None => {
            observer.on_log("Chat API not configured; skipping summary");
            None
        }
    };

    enter(Phase::Done, &state, observer);
    Ok(PipelineReport {
        outcome: PipelineOutcome::Done,
        transcript_path: Some(transcript_path),
        transcript,
        summary: chat_summary,
        total: state.total(),
        ok_count: state.ok_count(),
        fail_count: state.fail_count(),
        elapsed_secs: state.elapsed_secs(),
    })
}

fn cut_segments(
    wav_path: &Path,
    run_dir: &Path,
    options: &PipelineOptions,
    cancel: &CancelFlag,
    state: &PipelineState,
    observer: &dyn PipelineObserver,
) -> Result<Vec<Segment>, PipelineError> {
    let source = match AudioSource::open(wav_path) {
        Ok(source) => source,
        Err(e) => return Err(fail(e, state, observer)),
    };
    let duration = source.duration_secs();
    observer.on_log(&format!(
        "Audio duration {:.1}s; cutting up to {} segments of {}s",
        duration,
        total_segments(duration, options.segment_length_secs),
        options.segment_length_secs
    ));
    let cutter = SegmentCutter::new(
        source,
        run_dir,
        options.segment_length_secs,
        cancel.clone(),
    );
    let segments: Vec<Segment> = cutter.collect();
    observer.on_log(&format!("{} segments ready", segments.len()));
    Ok(segments)
}
