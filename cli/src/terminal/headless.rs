//! Line-oriented reporter: one coloured line per attempt, then a summary.

use colored::*;
use glizzy_common::attempt::{Attempt, Outcome};
use glizzy_common::error::FuzzError;
use glizzy_common::gatt::{Handle, ServiceRange};
use glizzy_common::{plain, success, warn};
use glizzy_core::reporter::{Reporter, SweepKind, SweepStats};
use glizzy_core::results::{Summary, SweepStatus};

use super::print;
use super::theme::Theme;

pub struct HeadlessReporter {
    theme: Theme,
    kind: SweepKind,
    /// Device answer to the write about to be recorded.
    response: Option<String>,
}

impl HeadlessReporter {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            kind: SweepKind::Fuzz,
            response: None,
        }
    }

    /// The line printed for a recorded attempt. Non-success writes end with
    /// the device's own answer when it gave one.
    pub fn format_attempt(&self, attempt: &Attempt, response: Option<&str>) -> String {
        let handle = attempt.handle.to_string().color(self.theme.handle);
        let readback = attempt.readback.as_deref().unwrap_or_default();

        let Some(length) = attempt.length else {
            let (mark, color) = match attempt.outcome {
                Outcome::Success => ("✔", self.theme.success),
                _ => ("✖", self.theme.failure),
            };
            return format!("{} {handle} -> {}", mark.color(color), readback.color(self.theme.handle));
        };

        let payload = attempt.payload.as_deref().unwrap_or_default();
        let detail = match attempt.outcome {
            Outcome::Success => format!(
                "{} readback={}",
                "OK".color(self.theme.success),
                readback.color(self.theme.handle)
            ),
            Outcome::Ambiguous => "length rejected".color(self.theme.ambiguous).to_string(),
            Outcome::Failure => match attempt.exit_status {
                Some(code) => format!("failed (exit {code})").color(self.theme.failure).to_string(),
                None => "not sent".color(self.theme.failure).to_string(),
            },
        };

        let mut line = format!(
            "{} {handle} len={length:<3} input=0x{payload} -> {detail}",
            self.mark(attempt.outcome)
        );
        if let Some(text) = response.filter(|t| !attempt.outcome.is_success() && !t.is_empty()) {
            line.push_str(&format!(": {}", text.replace('\n', " | ")));
        }
        line
    }

    fn mark(&self, outcome: Outcome) -> ColoredString {
        match outcome {
            Outcome::Success => "✔".color(self.theme.success),
            Outcome::Ambiguous => "?".color(self.theme.ambiguous),
            Outcome::Failure => "✖".color(self.theme.failure),
        }
    }

    fn print_summary(&self, summary: &Summary) {
        for (idx, (handle, entry)) in summary.iter().enumerate() {
            let max_ok = match entry.max_success_length {
                Some(len) => len.to_string().color(self.theme.success),
                None => "none".color(self.theme.failure),
            };
            let first_fail = match entry.first_fail_length {
                Some(len) => len.to_string().color(self.theme.failure),
                None => "none".color(self.theme.success),
            };
            print::tree_head(idx, &handle.to_string(), &self.theme);
            print::as_tree_one_level(
                vec![
                    ("Max OK".to_string(), max_ok),
                    ("First fail".to_string(), first_fail),
                ],
                &self.theme,
            );
        }
    }
}

impl Reporter for HeadlessReporter {
    fn sweep_started(&mut self, kind: SweepKind, _ranges: &[ServiceRange]) {
        self.kind = kind;
        match kind {
            SweepKind::ReadOnly => print::header("read-only mode", &self.theme),
            SweepKind::Fuzz => print::header("fuzzing handles", &self.theme),
        }
    }

    fn range_started(&mut self, range: &ServiceRange) {
        let verb = match self.kind {
            SweepKind::ReadOnly => "Reading",
            SweepKind::Fuzz => "Service",
        };
        plain!("{}", format!("{verb} {range}").color(self.theme.handle));
    }

    fn write_response(&mut self, _handle: Handle, text: &str) {
        self.response = Some(text.to_string());
    }

    fn attempt_recorded(&mut self, attempt: &Attempt, _stats: &SweepStats) {
        let response = self.response.take();
        plain!("{}", self.format_attempt(attempt, response.as_deref()));
    }

    fn transport_failed(&mut self, handle: Handle, error: &FuzzError) {
        warn!("{handle}: {error}");
    }

    fn notification(&mut self, handle: Handle, value: &str) {
        plain!("{}", format!("🔔 Notify after {handle}: {value}").color(self.theme.ambiguous));
    }

    fn sweep_finished(&mut self, status: SweepStatus, summary: &Summary, stats: &SweepStats) {
        if status == SweepStatus::Interrupted {
            print::header("interrupted", &self.theme);
        }

        if !summary.is_empty() {
            print::header("summary", &self.theme);
            self.print_summary(summary);
        }

        print::fat_separator(&self.theme);
        let counts = format!(
            "{} ok / {} rejected / {} failed in {:.2}s",
            stats.successes.to_string().color(self.theme.success).bold(),
            stats.ambiguous.to_string().color(self.theme.ambiguous).bold(),
            stats.failures.to_string().color(self.theme.failure).bold(),
            stats.elapsed().as_secs_f64()
        );
        match status {
            SweepStatus::Completed => success!("Sweep complete: {counts}"),
            SweepStatus::Interrupted => warn!("Sweep stopped early: {counts}"),
        }
    }
}
