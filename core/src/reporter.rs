//! Progress reporting seam between the sweep and whatever renders it.

use std::time::{Duration, Instant};

use glizzy_common::attempt::{Attempt, Outcome};
use glizzy_common::error::FuzzError;
use glizzy_common::gatt::{Handle, ServiceRange};

use crate::results::{Summary, SweepStatus};

/// Which top-level mode the sweep runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepKind {
    ReadOnly,
    Fuzz,
}

/// Running counters owned by the sweep.
#[derive(Debug, Clone)]
pub struct SweepStats {
    pub successes: usize,
    pub failures: usize,
    pub ambiguous: usize,
    started: Instant,
}

impl SweepStats {
    pub fn start() -> Self {
        Self {
            successes: 0,
            failures: 0,
            ambiguous: 0,
            started: Instant::now(),
        }
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Success => self.successes += 1,
            Outcome::Failure => self.failures += 1,
            Outcome::Ambiguous => self.ambiguous += 1,
        }
    }

    /// Everything that was not confirmed, ambiguous included.
    pub fn unsuccessful(&self) -> usize {
        self.failures + self.ambiguous
    }

    pub fn total(&self) -> usize {
        self.successes + self.unsuccessful()
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Receives the live event stream of a sweep.
///
/// Implementations decide how to render it; the sweep only needs these calls
/// and a way to ask whether the user wants to stop.
pub trait Reporter {
    fn sweep_started(&mut self, _kind: SweepKind, _ranges: &[ServiceRange]) {}

    fn range_started(&mut self, _range: &ServiceRange) {}

    /// Raw text the device answered a write with. Arrives before the
    /// attempt it belongs to is recorded.
    fn write_response(&mut self, _handle: Handle, _text: &str) {}

    fn attempt_recorded(&mut self, attempt: &Attempt, stats: &SweepStats);

    /// A transport call could not be made. The attempt is still recorded.
    fn transport_failed(&mut self, _handle: Handle, _error: &FuzzError) {}

    fn notification(&mut self, handle: Handle, value: &str);

    fn sweep_finished(&mut self, status: SweepStatus, summary: &Summary, stats: &SweepStats);

    /// Checked once per attempt. Must not block.
    fn poll_cancel(&mut self) -> bool {
        false
    }
}
