//! Pipeline orchestration: state machine, progress reporting, cancellation.

mod orchestrator;
mod progress;

pub use orchestrator::{run_pipeline, PipelineOptions, PipelineOutcome, PipelineReport, TRANSCRIPT_FILE};
pub use progress::{CancelFlag, LogObserver, Phase, PipelineObserver, PipelineState, ProgressUpdate};
