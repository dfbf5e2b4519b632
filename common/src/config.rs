use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CHARS: usize = 10;
pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_RESULTS_FILE: &str = "glizzy_results.json";

/// LE address type of the target device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressType {
    #[default]
    Public,
    Random,
}

impl AddressType {
    pub fn as_str(self) -> &'static str {
        match self {
            AddressType::Public => "public",
            AddressType::Random => "random",
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(AddressType::Public),
            "random" => Ok(AddressType::Random),
            _ => Err(format!("invalid address type '{s}', expected 'public' or 'random'")),
        }
    }
}

/// The device under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub address: String,
    pub address_type: AddressType,
}

impl Target {
    pub fn new(address: impl Into<String>, address_type: AddressType) -> Self {
        Self {
            address: address.into(),
            address_type,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.address, self.address_type)
    }
}

/// Shape of the payload sweep sent to every handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    /// Lengths `1..=max_len`, one payload each.
    Incremental { max_len: usize },
    /// A single length, `runs` times.
    FixedRepeat { len: usize, runs: usize },
}

impl SweepMode {
    /// A run count of zero (or none) selects the incremental sweep.
    pub fn from_args(chars: usize, runs: Option<usize>) -> Self {
        match runs {
            Some(runs) if runs > 0 => SweepMode::FixedRepeat { len: chars, runs },
            _ => SweepMode::Incremental { max_len: chars },
        }
    }

    /// Number of attempts each handle receives.
    pub fn attempts_per_handle(&self) -> usize {
        match *self {
            SweepMode::Incremental { max_len } => max_len,
            SweepMode::FixedRepeat { runs, .. } => runs,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadFill {
    #[default]
    Zero,
    Random,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportMode {
    #[default]
    Headless,
    Interactive,
}

/// Run configuration, captured once at start and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzConfig {
    pub sweep: SweepMode,
    pub fill: PayloadFill,
    /// Hex characters prepended to every payload.
    pub prefix: String,
    /// Pause after every write.
    pub delay: Duration,
    /// Read every handle once instead of writing to it.
    pub read_only: bool,
    /// Listen for a notification after every write.
    pub notify: bool,
    pub notify_timeout: Duration,
    pub report: ReportMode,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            sweep: SweepMode::Incremental {
                max_len: DEFAULT_CHARS,
            },
            fill: PayloadFill::Zero,
            prefix: String::new(),
            delay: Duration::ZERO,
            read_only: false,
            notify: false,
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
            report: ReportMode::Headless,
        }
    }
}
