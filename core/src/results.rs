//! # Result Store
//!
//! Append-only record of every attempt in a run, the per-handle summary folded
//! from it, and the JSON file both end up in.
//!
//! The summary is never maintained incrementally: it is recomputed from the
//! ordered attempts, so "first failing length" always reflects sequence order.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use glizzy_common::attempt::Attempt;
use glizzy_common::config::Target;
use glizzy_common::error::{FuzzError, Result};
use glizzy_common::gatt::Handle;
use serde::{Deserialize, Serialize};

/// How a sweep ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepStatus {
    Completed,
    Interrupted,
}

impl SweepStatus {
    pub fn is_complete(self) -> bool {
        matches!(self, SweepStatus::Completed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleSummary {
    /// Longest confirmed write, `None` when nothing succeeded.
    pub max_success_length: Option<usize>,
    /// Length of the earliest write that was not confirmed.
    pub first_fail_length: Option<usize>,
}

pub type Summary = BTreeMap<Handle, HandleSummary>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    attempts: Vec<Attempt>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, attempt: Attempt) {
        self.attempts.push(attempt);
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn for_handle(&self, handle: Handle) -> impl Iterator<Item = &Attempt> {
        self.attempts.iter().filter(move |a| a.handle == handle)
    }

    pub fn summarize(&self) -> Summary {
        summarize(&self.attempts)
    }

    pub fn into_attempts(self) -> Vec<Attempt> {
        self.attempts
    }
}

impl From<Vec<Attempt>> for ResultSet {
    fn from(attempts: Vec<Attempt>) -> Self {
        Self { attempts }
    }
}

/// Folds ordered attempts into a per-handle summary.
///
/// Read-only records carry no length and are skipped.
pub fn summarize(attempts: &[Attempt]) -> Summary {
    attempts
        .iter()
        .filter_map(|a| a.length.map(|len| (a, len)))
        .fold(Summary::new(), |mut summary, (attempt, length)| {
            let entry = summary.entry(attempt.handle).or_default();
            if attempt.outcome.is_success() {
                entry.max_success_length = entry.max_success_length.max(Some(length));
            } else if entry.first_fail_length.is_none() {
                entry.first_fail_length = Some(length);
            }
            summary
        })
}

/// What ends up on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub status: SweepStatus,
    pub target: Target,
    pub attempts: Vec<Attempt>,
    pub summary: Summary,
}

impl RunRecord {
    pub fn new(status: SweepStatus, target: Target, results: &ResultSet) -> Self {
        Self {
            status,
            target,
            attempts: results.attempts().to_vec(),
            summary: results.summarize(),
        }
    }
}

/// A JSON results file.
#[derive(Debug, Clone)]
pub struct ResultStore {
    path: PathBuf,
}

impl ResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the record, replacing any previous file at the same path.
    pub fn persist(&self, record: &RunRecord) -> Result<()> {
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, json).map_err(|e| {
            FuzzError::Persist(format!("{}: {e}", self.path.display()))
        })
    }

    pub fn load(&self) -> Result<RunRecord> {
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
