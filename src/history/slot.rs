//! One historical duration slot

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Token written for a slot with no measurement
pub const SENTINEL: &str = "na";

/// Field that is neither a non-negative integer nor the sentinel
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected a millisecond count or \"na\", got {0:?}")]
pub struct InvalidSlot(pub String);

/// A duration in milliseconds, or no measurement for that run
///
/// `Missing` is distinct from `Measured(0)`: a zero-duration run still counts
/// as data and keeps its row alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum DurationSlot {
    Measured(u64),
    Missing,
}

impl DurationSlot {
    pub fn is_missing(&self) -> bool {
        matches!(self, DurationSlot::Missing)
    }

    pub fn millis(&self) -> Option<u64> {
        match self {
            DurationSlot::Measured(ms) => Some(*ms),
            DurationSlot::Missing => None,
        }
    }
}

impl From<Option<u64>> for DurationSlot {
    fn from(value: Option<u64>) -> Self {
        value.map_or(DurationSlot::Missing, DurationSlot::Measured)
    }
}

impl From<DurationSlot> for Option<u64> {
    fn from(slot: DurationSlot) -> Self {
        slot.millis()
    }
}

impl fmt::Display for DurationSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationSlot::Measured(ms) => write!(f, "{}", ms),
            DurationSlot::Missing => f.write_str(SENTINEL),
        }
    }
}

impl FromStr for DurationSlot {
    type Err = InvalidSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == SENTINEL {
            return Ok(DurationSlot::Missing);
        }
        // u64::from_str tolerates a leading '+', the table format does not
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidSlot(s.to_string()));
        }
        s.parse()
            .map(DurationSlot::Measured)
            .map_err(|_| InvalidSlot(s.to_string()))
    }
}
