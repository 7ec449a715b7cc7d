//! Shared progress/cancellation state between the pipeline task and the UI side.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Pipeline phase, also the state of the orchestrator state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    Converting,
    Segmenting,
    Transcribing,
    Summarizing,
    Done,
    Cancelled,
    Failed,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Converting => "converting",
            Phase::Segmenting => "segmenting",
            Phase::Transcribing => "transcribing",
            Phase::Summarizing => "summarizing",
            Phase::Done => "done",
            Phase::Cancelled => "cancelled",
            Phase::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Cooperative cancellation flag. Set by the controlling side, polled by the
/// pipeline before each unit of work (window production, segment
/// transcription). Writes are idempotent; the flag never clears within a run.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Immutable progress snapshot delivered to observers after each unit of work.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressUpdate {
    pub phase: Phase,
    /// Index of the most recently handled segment, 1-based. 0 before work starts.
    pub current: usize,
    pub total: usize,
    pub elapsed_secs: f64,
    pub ok_count: usize,
    pub fail_count: usize,
    /// Estimated seconds remaining, `elapsed / current * (total - current)`.
    /// None until at least one segment has been handled.
    pub eta_secs: Option<f64>,
}

/// Notification interface for whatever front end is attached. Implementations
/// must be cheap and non-blocking; both calls are fire-and-forget from the
/// pipeline task.
pub trait PipelineObserver: Send + Sync {
    fn on_progress(&self, update: &ProgressUpdate);
    fn on_log(&self, message: &str);
}

/// Default observer that forwards everything to the `log` facade.
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn on_progress(&self, update: &ProgressUpdate) {
        if update.total > 0 {
            log::info!(
                "[{}] {}/{} (ok {}, failed {}){}",
                update.phase,
                update.current,
                update.total,
                update.ok_count,
                update.fail_count,
                update
                    .eta_secs
                    .map(|eta| format!(", eta {:.0}s", eta))
                    .unwrap_or_default()
            );
        } else {
            log::info!("[{}]", update.phase);
        }
    }

    fn on_log(&self, message: &str) {
        log::info!("{}", message);
    }
}

/// Counters for one pipeline run. Owned and mutated exclusively by the
/// pipeline task; the reporting side only ever sees `ProgressUpdate`
/// snapshots. Invariant: `ok + failed <= current <= total`, all monotonically
/// non-decreasing within a run.
pub struct PipelineState {
    started_at: Instant,
    total: usize,
    current: usize,
    ok: usize,
    failed: usize,
}

impl PipelineState {
    /// Fresh counters; called once at the start of a run.
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
            total: 0,
            current: 0,
            ok: 0,
            failed: 0,
        }
    }

    pub fn set_total(&mut self, total: usize) {
        self.total = total;
    }

    /// Advance to the next segment. Returns the new 1-based index.
    pub fn begin_segment(&mut self) -> usize {
        debug_assert!(self.current < self.total);
        self.current += 1;
        self.current
    }

    pub fn record_ok(&mut self) {
        self.ok += 1;
        debug_assert!(self.ok + self.failed <= self.current);
    }

    pub fn record_failed(&mut self) {
        self.failed += 1;
        debug_assert!(self.ok + self.failed <= self.current);
    }

    pub fn ok_count(&self) -> usize {
        self.ok
    }

    pub fn fail_count(&self) -> usize {
        self.failed
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }

    pub fn snapshot(&self, phase: Phase) -> ProgressUpdate {
        let elapsed = self.elapsed_secs();
        let eta = if self.current > 0 && self.total >= self.current {
            Some(elapsed / self.current as f64 * (self.total - self.current) as f64)
        } else {
            None
        };
        ProgressUpdate {
            phase,
            current: self.current,
            total: self.total,
            elapsed_secs: elapsed,
            ok_count: self.ok,
            fail_count: self.failed,
            eta_secs: eta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_flag_is_sticky_and_shared() {
        let flag = CancelFlag::new();
        let clone = flag.clone();
        assert!(!flag.is_cancelled());
        clone.cancel();
        assert!(flag.is_cancelled());
        clone.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn counters_hold_invariant() {
        let mut state = PipelineState::start();
        state.set_total(3);
        for _ in 0..2 {
            let i = state.begin_segment();
            assert!(state.ok_count() + state.fail_count() <= i);
            state.record_ok();
        }
        state.begin_segment();
        state.record_failed();
        assert_eq!(state.ok_count(), 2);
        assert_eq!(state.fail_count(), 1);
        assert_eq!(state.current(), 3);
    }

    #[test]
    fn eta_follows_elapsed_over_current() {
        let mut state = PipelineState::start();
        state.set_total(4);
        assert!(state.snapshot(Phase::Transcribing).eta_secs.is_none());
        state.begin_segment();
        let snap = state.snapshot(Phase::Transcribing);
        let eta = snap.eta_secs.unwrap();
        // one of four done: remaining ≈ 3 × elapsed
        assert!((eta - snap.elapsed_secs * 3.0).abs() < 1e-6);
    }
}
