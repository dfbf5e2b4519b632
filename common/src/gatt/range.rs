//! # Handle Ranges
//!
//! Parsing and iteration of inclusive handle ranges.
//!
//! Supported input formats:
//! * **Single handle**: `"0x3"` expands to `0x0003-0x0003`.
//! * **Range**: `"0x7-0xa"`, both endpoints parsed independently.
//!
//! Endpoints are never reordered. A range whose start is above its end is kept
//! as written and simply yields no handles when iterated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::handle::{Handle, parse_hex_u16};
use crate::error::FuzzError;

/// Tag given to ranges that were supplied on the command line instead of
/// being discovered on the device.
pub const MANUAL_TAG: &str = "manual";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleRange {
    pub start: Handle,
    pub end: Handle,
}

impl HandleRange {
    pub fn new(start: Handle, end: Handle) -> Self {
        Self { start, end }
    }

    pub fn single(handle: Handle) -> Self {
        Self::new(handle, handle)
    }

    pub fn is_reversed(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.start <= handle && handle <= self.end
    }

    /// Number of handles the range yields when iterated.
    pub fn len(&self) -> usize {
        if self.is_reversed() {
            0
        } else {
            usize::from(self.end.0 - self.start.0) + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn handles(&self) -> impl Iterator<Item = Handle> + use<> {
        (self.start.0..=self.end.0).map(Handle)
    }
}

impl fmt::Display for HandleRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl FromStr for HandleRange {
    type Err = FuzzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex_range(s)
    }
}

/// Parses `"<hex>"` or `"<hex>-<hex>"` into an inclusive range.
pub fn parse_hex_range(s: &str) -> Result<HandleRange, FuzzError> {
    let Some((start_str, end_str)) = s.split_once('-') else {
        let handle = Handle(parse_hex_u16(s)?);
        return Ok(HandleRange::single(handle));
    };

    if end_str.contains('-') {
        return Err(FuzzError::InvalidRange(format!(
            "too many '-' separators in '{s}'"
        )));
    }

    let start = Handle(parse_hex_u16(start_str)?);
    let end = Handle(parse_hex_u16(end_str)?);
    Ok(HandleRange::new(start, end))
}

/// A resolved group of handles to target, tagged with the UUID of the
/// primary service it came from (or [`MANUAL_TAG`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRange {
    pub start: Handle,
    pub end: Handle,
    pub uuid: String,
}

impl ServiceRange {
    pub fn new(start: Handle, end: Handle, uuid: impl Into<String>) -> Self {
        Self {
            start,
            end,
            uuid: uuid.into(),
        }
    }

    pub fn manual(range: HandleRange) -> Self {
        Self::new(range.start, range.end, MANUAL_TAG)
    }

    pub fn is_manual(&self) -> bool {
        self.uuid == MANUAL_TAG
    }

    pub fn range(&self) -> HandleRange {
        HandleRange::new(self.start, self.end)
    }

    pub fn handles(&self) -> impl Iterator<Item = Handle> + use<> {
        self.range().handles()
    }

    /// Case-insensitive prefix match on the service UUID.
    pub fn matches_uuid_prefix(&self, prefix: &str) -> bool {
        self.uuid
            .to_ascii_lowercase()
            .starts_with(&prefix.to_ascii_lowercase())
    }
}

impl fmt::Display for ServiceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} (UUID:{})", self.start, self.end, self.uuid)
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
