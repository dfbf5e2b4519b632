//! Payload sweep generation.
//!
//! A payload is `prefix + suffix`, where the suffix fills the gap up to the
//! nominal length with random lowercase hex digits or zeros. When the prefix
//! is already longer than the nominal length the suffix is empty and the
//! payload is left longer than `length`; it is never truncated.

use glizzy_common::config::{FuzzConfig, PayloadFill, SweepMode};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Lazy sequence of `(length, payload)` pairs for a single handle.
pub struct PayloadGenerator {
    mode: SweepMode,
    fill: PayloadFill,
    prefix: String,
    position: usize,
    rng: StdRng,
}

impl PayloadGenerator {
    pub fn new(config: &FuzzConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Reproducible sequence for a given seed.
    pub fn seeded(config: &FuzzConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &FuzzConfig, rng: StdRng) -> Self {
        Self {
            mode: config.sweep,
            fill: config.fill,
            prefix: config.prefix.clone(),
            position: 0,
            rng,
        }
    }

    fn build(&mut self, length: usize) -> String {
        let suffix_len = length.saturating_sub(self.prefix.len());
        let mut payload = String::with_capacity(self.prefix.len() + suffix_len);
        payload.push_str(&self.prefix);

        match self.fill {
            PayloadFill::Zero => payload.extend(std::iter::repeat_n('0', suffix_len)),
            PayloadFill::Random => {
                for _ in 0..suffix_len {
                    let nibble = self.rng.random_range(0..HEX_DIGITS.len());
                    payload.push(char::from(HEX_DIGITS[nibble]));
                }
            }
        }
        payload
    }
}

impl Iterator for PayloadGenerator {
    type Item = (usize, String);

    fn next(&mut self) -> Option<Self::Item> {
        let length = match self.mode {
            SweepMode::Incremental { max_len } if self.position < max_len => self.position + 1,
            SweepMode::FixedRepeat { len, runs } if self.position < runs => len,
            _ => return None,
        };
        self.position += 1;
        Some((length, self.build(length)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.mode.attempts_per_handle().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}
