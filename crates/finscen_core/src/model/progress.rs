use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use crate::error::RunError;

/// Progress and cancellation shared between a running analysis and its caller.
///
/// Clones share the same counters, so a UI thread can hold one copy while the
/// analysis runs with another.
#[derive(Debug, Clone)]
pub struct AnalysisProgress {
    /// Completed draws across all scenarios
    completed: Arc<AtomicUsize>,
    /// Total draws expected
    total: Arc<AtomicUsize>,
    /// Cancellation requested by the caller
    cancelled: Arc<AtomicBool>,
    /// Set internally when a sibling scenario failed
    aborted: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl AnalysisProgress {
    #[must_use]
    pub fn new() -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(0)),
            cancelled: Arc::new(AtomicBool::new(false)),
            aborted: Arc::new(AtomicBool::new(false)),
            deadline: None,
        }
    }

    /// Stop at the first batch boundary after `deadline`
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Fraction of draws completed, in `[0, 1]`
    #[must_use]
    pub fn fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.completed() as f64 / total as f64).min(1.0)
    }

    pub fn add_completed(&self, draws: usize) {
        self.completed.fetch_add(draws, Ordering::Relaxed);
    }

    pub fn reset(&self, total: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Why a run should stop now, if it should
    #[must_use]
    pub fn interruption(&self) -> Option<RunError> {
        if self.is_cancelled() || self.aborted.load(Ordering::Relaxed) {
            return Some(RunError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(RunError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Stop sibling runs sharing this tracker without flagging a user cancel.
    pub(crate) fn abort(&self) {
        self.aborted.store(true, Ordering::Relaxed);
    }

    /// Same counters and cancel flag, but a private abort flag, so aborting
    /// one analysis never leaks into the caller's tracker.
    pub(crate) fn scoped(&self) -> Self {
        Self {
            aborted: Arc::new(AtomicBool::new(false)),
            ..self.clone()
        }
    }
}

impl Default for AnalysisProgress {
    fn default() -> Self {
        Self::new()
    }
}
