//! Test-framework adapter tying the aggregator to the history file
//!
//! Lifecycle of one run: [`RuntimeLogger::start`] loads the existing history,
//! the host reports units through [`RuntimeLogger::unit_started`] and
//! [`RuntimeLogger::unit_finished`], and [`RuntimeLogger::dump`] merges the
//! run into the history and writes it back. `dump` consumes the logger, so
//! no unit can be reported after the history has been written.

use std::num::NonZeroUsize;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::aggregator::{Aggregator, Clock, SystemClock};
use crate::config::{ConfigError, LoggerConfig};
use crate::history::{FileKey, HistoryError, HistoryStore, HistoryTable, RunMeasurements};

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Records one run's per-file durations into the rolling history
#[derive(Debug)]
pub struct RuntimeLogger<C = SystemClock> {
    store: HistoryStore,
    aggregator: Aggregator<C>,
    max_record_count: NonZeroUsize,
}

impl RuntimeLogger<SystemClock> {
    /// Open the configured history file and start timing with the wall clock
    pub fn start(config: &LoggerConfig) -> Result<Self, LoggerError> {
        Self::start_with_clock(config, SystemClock)
    }
}

impl<C: Clock> RuntimeLogger<C> {
    pub fn start_with_clock(config: &LoggerConfig, clock: C) -> Result<Self, LoggerError> {
        config.validate()?;
        let path = config.resolve_output();
        let store = HistoryStore::open(path, config.on_corrupt)?;
        tracing::debug!(
            path = %store.path().display(),
            known_files = store.table().len(),
            max_record_count = config.max_record_count.get(),
            "runtime logger started"
        );

        Ok(Self {
            store,
            aggregator: Aggregator::with_clock(clock),
            max_record_count: config.max_record_count,
        })
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// History as loaded when the run started
    pub fn history(&self) -> &HistoryTable {
        self.store.table()
    }

    pub fn unit_started(&mut self, file_key: &FileKey, is_top_level: bool) {
        self.aggregator.unit_started(file_key, is_top_level);
    }

    pub fn unit_finished(&mut self, file_key: &FileKey, is_top_level: bool) {
        self.aggregator.unit_finished(file_key, is_top_level);
    }

    /// Add a duration measured outside the unit callbacks
    pub fn record(&mut self, file_key: &FileKey, elapsed: Duration) {
        self.aggregator.record(file_key, elapsed);
    }

    /// Durations measured so far in this run
    pub fn measurements(&self) -> &RunMeasurements {
        self.aggregator.measurements()
    }

    /// Merge this run into the history and write it out
    pub fn dump(self) -> Result<HistoryTable, LoggerError> {
        let measurements = self.aggregator.into_measurements();
        tracing::debug!(files = measurements.len(), "dumping runtime history");
        Ok(self.store.commit(&measurements, self.max_record_count)?)
    }
}
