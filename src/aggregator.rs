//! Per-file duration accumulation for the current run
//!
//! Host test frameworks report "unit started" / "unit finished" for every
//! example group. Only top-level groups are timed; their elapsed wall time is
//! summed per file, so a file with several top-level groups gets one total.

use std::cell::Cell;
use std::time::{Duration, Instant};

use crate::history::{FileKey, RunMeasurements};

/// Source of monotonic timestamps
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to
///
/// # Example
/// ```
/// use runtime_log::aggregator::{Aggregator, ManualClock};
/// use runtime_log::history::FileKey;
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let mut aggregator = Aggregator::with_clock(&clock);
/// let key = FileKey::new("a_spec.rb").unwrap();
///
/// aggregator.unit_started(&key, true);
/// clock.advance(Duration::from_secs(60));
/// aggregator.unit_finished(&key, true);
///
/// assert_eq!(aggregator.measurements()[&key], 60_000);
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Accumulates top-level unit durations per file
#[derive(Debug)]
pub struct Aggregator<C = SystemClock> {
    clock: C,
    started_at: Option<Instant>,
    totals: RunMeasurements,
}

impl Aggregator<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for Aggregator<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Aggregator<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            started_at: None,
            totals: RunMeasurements::new(),
        }
    }

    /// Mark the start of a unit
    ///
    /// A second top-level start without a finish replaces the pending one.
    pub fn unit_started(&mut self, file_key: &FileKey, is_top_level: bool) {
        if !is_top_level {
            return;
        }
        if self.started_at.is_some() {
            tracing::debug!(file = %file_key, "restarting unfinished top-level unit");
        }
        self.started_at = Some(self.clock.now());
    }

    /// Mark the end of a unit and add its elapsed milliseconds to `file_key`
    ///
    /// Ignored when no top-level start is pending.
    pub fn unit_finished(&mut self, file_key: &FileKey, is_top_level: bool) {
        if !is_top_level {
            return;
        }
        let Some(started_at) = self.started_at.take() else {
            tracing::trace!(file = %file_key, "finish without matching start");
            return;
        };

        let elapsed = self.clock.now().saturating_duration_since(started_at);
        self.record(file_key, elapsed);
    }

    /// Add an externally measured duration to `file_key`
    pub fn record(&mut self, file_key: &FileKey, elapsed: Duration) {
        let ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let total = self.totals.entry(file_key.clone()).or_insert(0);
        *total = total.saturating_add(ms);
        tracing::trace!(file = %file_key, elapsed_ms = ms, total_ms = *total, "recorded unit");
    }

    /// Totals so far; reflects every finished unit
    pub fn measurements(&self) -> &RunMeasurements {
        &self.totals
    }

    pub fn into_measurements(self) -> RunMeasurements {
        self.totals
    }
}
