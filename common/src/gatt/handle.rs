use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::FuzzError;

/// A 16-bit attribute handle inside a GATT server's attribute table.
///
/// Rendered and serialized as `0x%04x` (e.g. `0x000b`), which is also the form
/// the BlueZ tooling accepts on its command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(pub u16);

impl Handle {
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u16 {
        self.0
    }
}

impl From<u16> for Handle {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}

impl FromStr for Handle {
    type Err = FuzzError;

    /// Parses a hexadecimal handle, with or without the `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex_u16(s).map(Handle)
    }
}

impl Serialize for Handle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Handle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses a hex string into a `u16`, accepting an optional `0x`/`0X` prefix
/// and surrounding whitespace.
pub fn parse_hex_u16(s: &str) -> Result<u16, FuzzError> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(FuzzError::InvalidRange(format!("empty handle in '{s}'")));
    }

    u16::from_str_radix(digits, 16)
        .map_err(|e| FuzzError::InvalidRange(format!("invalid handle '{s}': {e}")))
}
