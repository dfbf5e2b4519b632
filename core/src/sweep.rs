//! # Sweep Orchestrator
//!
//! The driving loop: ranges × handles × payloads, strictly sequential.
//!
//! The mode (read-only or fuzz) is fixed when the sweep starts. Cancellation is
//! cooperative and only observed after an attempt has been recorded, so every
//! call that reached the device ends up in the result set.

use glizzy_common::attempt::Attempt;
use glizzy_common::config::FuzzConfig;
use glizzy_common::gatt::{Handle, ServiceRange};
use tokio::time::sleep;

use crate::cancel::CancelToken;
use crate::executor::AttemptExecutor;
use crate::payload::PayloadGenerator;
use crate::reporter::{Reporter, SweepKind, SweepStats};
use crate::results::{ResultSet, SweepStatus};
use crate::transport::Transport;

/// Everything a finished (or stopped) sweep hands back for aggregation.
#[derive(Debug)]
pub struct SweepReport {
    pub status: SweepStatus,
    pub results: ResultSet,
    pub stats: SweepStats,
}

pub struct Sweep<'a> {
    transport: &'a dyn Transport,
    config: &'a FuzzConfig,
    cancel: CancelToken,
    seed: Option<u64>,
}

impl<'a> Sweep<'a> {
    pub fn new(transport: &'a dyn Transport, config: &'a FuzzConfig, cancel: CancelToken) -> Self {
        Self {
            transport,
            config,
            cancel,
            seed: None,
        }
    }

    /// Makes random payloads reproducible. Each handle gets `seed + index`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn kind(&self) -> SweepKind {
        if self.config.read_only {
            SweepKind::ReadOnly
        } else {
            SweepKind::Fuzz
        }
    }

    pub async fn run(&self, ranges: &[ServiceRange], reporter: &mut dyn Reporter) -> SweepReport {
        let kind = self.kind();
        reporter.sweep_started(kind, ranges);

        let mut results = ResultSet::new();
        let mut stats = SweepStats::start();

        let status = match kind {
            SweepKind::ReadOnly => self.read_all(ranges, reporter, &mut results, &mut stats).await,
            SweepKind::Fuzz => self.fuzz_all(ranges, reporter, &mut results, &mut stats).await,
        };

        SweepReport {
            status,
            results,
            stats,
        }
    }

    async fn read_all(
        &self,
        ranges: &[ServiceRange],
        reporter: &mut dyn Reporter,
        results: &mut ResultSet,
        stats: &mut SweepStats,
    ) -> SweepStatus {
        for range in ranges {
            reporter.range_started(range);
            for handle in range.handles() {
                let attempt = match self.transport.read(handle).await {
                    Ok(value) => Attempt::read(handle, value),
                    Err(e) => {
                        reporter.transport_failed(handle, &e);
                        Attempt::failed_read(handle)
                    }
                };

                if self.record(attempt, reporter, results, stats) {
                    return SweepStatus::Interrupted;
                }
            }
        }
        SweepStatus::Completed
    }

    async fn fuzz_all(
        &self,
        ranges: &[ServiceRange],
        reporter: &mut dyn Reporter,
        results: &mut ResultSet,
        stats: &mut SweepStats,
    ) -> SweepStatus {
        let executor = AttemptExecutor::new(self.transport, self.config);
        let mut handle_index: u64 = 0;

        for range in ranges {
            reporter.range_started(range);
            for handle in range.handles() {
                for (length, payload) in self.payloads(handle_index) {
                    let attempt = self
                        .execute(&executor, handle, length, payload, reporter)
                        .await;

                    if self.record(attempt, reporter, results, stats) {
                        return SweepStatus::Interrupted;
                    }

                    if !self.config.delay.is_zero() {
                        sleep(self.config.delay).await;
                    }
                }
                handle_index += 1;
            }
        }
        SweepStatus::Completed
    }

    fn payloads(&self, handle_index: u64) -> PayloadGenerator {
        match self.seed {
            Some(seed) => PayloadGenerator::seeded(self.config, seed.wrapping_add(handle_index)),
            None => PayloadGenerator::new(self.config),
        }
    }

    async fn execute(
        &self,
        executor: &AttemptExecutor<'_>,
        handle: Handle,
        length: usize,
        payload: String,
        reporter: &mut dyn Reporter,
    ) -> Attempt {
        match executor.execute(handle, length, &payload).await {
            Ok(execution) => {
                reporter.write_response(handle, &execution.response);
                if let Some(note) = &execution.notification {
                    reporter.notification(handle, note);
                }
                execution.attempt
            }
            Err(e) => {
                reporter.transport_failed(handle, &e);
                Attempt::unreachable(handle, length, payload)
            }
        }
    }

    /// Appends the attempt and reports it. Returns `true` when the sweep
    /// has to stop.
    fn record(
        &self,
        attempt: Attempt,
        reporter: &mut dyn Reporter,
        results: &mut ResultSet,
        stats: &mut SweepStats,
    ) -> bool {
        stats.record(attempt.outcome);
        reporter.attempt_recorded(&attempt, stats);
        results.push(attempt);

        let quit_requested = reporter.poll_cancel();
        if quit_requested {
            self.cancel.cancel();
        }
        self.cancel.is_cancelled()
    }
}
