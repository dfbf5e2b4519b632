//! Interactive reporter: attempt lines scroll above a live status line, and
//! `q` (or Ctrl-C) stops the sweep after the current attempt.
//!
//! Keys are polled without blocking once per attempt; no input thread is
//! spawned.

use std::time::Duration;

use colored::*;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use glizzy_common::attempt::Attempt;
use glizzy_common::error::FuzzError;
use glizzy_common::gatt::{Handle, ServiceRange};
use glizzy_common::{info, warn};
use glizzy_core::reporter::{Reporter, SweepKind, SweepStats};
use glizzy_core::results::{Summary, SweepStatus};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::headless::HeadlessReporter;
use super::theme::Theme;

const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

pub struct InteractiveReporter {
    lines: HeadlessReporter,
    bar: ProgressBar,
    raw_mode: bool,
}

impl InteractiveReporter {
    /// `bar` should be the same bar the log writer prints around.
    pub fn new(theme: Theme, bar: ProgressBar) -> Self {
        Self {
            lines: HeadlessReporter::new(theme),
            bar,
            raw_mode: false,
        }
    }

    fn start_status_line(&mut self) {
        let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICK_STRINGS);
        self.bar.set_style(style);
        self.bar.set_draw_target(ProgressDrawTarget::stdout());
        self.bar.enable_steady_tick(Duration::from_millis(100));

        match enable_raw_mode() {
            Ok(()) => {
                self.raw_mode = true;
                info!("{}", "Press 'q' to stop early".italic());
            }
            Err(e) => warn!("Keyboard input unavailable, 'q' will not stop the sweep: {e}"),
        }
    }

    fn stop_status_line(&mut self) {
        self.bar.finish_and_clear();
        if self.raw_mode {
            let _ = disable_raw_mode();
            self.raw_mode = false;
        }
    }
}

impl Reporter for InteractiveReporter {
    fn sweep_started(&mut self, kind: SweepKind, ranges: &[ServiceRange]) {
        self.lines.sweep_started(kind, ranges);
        self.start_status_line();
    }

    fn range_started(&mut self, range: &ServiceRange) {
        self.lines.range_started(range);
    }

    fn write_response(&mut self, handle: Handle, text: &str) {
        self.lines.write_response(handle, text);
    }

    fn attempt_recorded(&mut self, attempt: &Attempt, stats: &SweepStats) {
        self.lines.attempt_recorded(attempt, stats);
        let line = status_line(attempt, stats);
        let line = if attempt.outcome.is_success() {
            line
        } else {
            line.reversed().to_string()
        };
        self.bar.set_message(line);
    }

    fn transport_failed(&mut self, handle: Handle, error: &FuzzError) {
        self.lines.transport_failed(handle, error);
    }

    fn notification(&mut self, handle: Handle, value: &str) {
        self.lines.notification(handle, value);
    }

    fn sweep_finished(&mut self, status: SweepStatus, summary: &Summary, stats: &SweepStats) {
        self.stop_status_line();
        self.lines.sweep_finished(status, summary, stats);
    }

    fn poll_cancel(&mut self) -> bool {
        if !self.raw_mode {
            return false;
        }

        let mut quit = false;
        while let Ok(true) = event::poll(Duration::ZERO) {
            match event::read() {
                Ok(Event::Key(key)) if is_quit_key(&key) => quit = true,
                Ok(_) => {}
                Err(_) => break,
            }
        }
        quit
    }
}

impl Drop for InteractiveReporter {
    fn drop(&mut self) {
        self.stop_status_line();
    }
}

/// `H:<handle> L:<len> S:<ok> F:<not ok> E:<elapsed>s`
pub fn status_line(attempt: &Attempt, stats: &SweepStats) -> String {
    let length = attempt
        .length
        .map(|len| len.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "H:{} L:{:<3} S:{:<4} F:{:<4} E:{}s",
        attempt.handle,
        length,
        stats.successes,
        stats.unsuccessful(),
        stats.elapsed().as_secs()
    )
}

fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    let is_q = matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'));
    let is_ctrl_c =
        key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
    is_q || is_ctrl_c
}
