//! File-backed history: read once at run start, written once at run end

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use super::error::HistoryError;
use super::table::{load, merge, serialize, HistoryTable, RunMeasurements};

/// What to do when the existing history file cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptHistoryPolicy {
    /// Fail the run; the file is left untouched
    #[default]
    Abort,
    /// Start from an empty table; the file is overwritten at commit
    Reset,
}

/// Owns the load → merge → write lifecycle of one history file
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    table: HistoryTable,
}

impl HistoryStore {
    /// Read and parse the history at `path`
    ///
    /// A missing file is an empty table. Other read errors always propagate;
    /// parse errors propagate unless `policy` is [`CorruptHistoryPolicy::Reset`].
    pub fn open(
        path: impl Into<PathBuf>,
        policy: CorruptHistoryPolicy,
    ) -> Result<Self, HistoryError> {
        let path = path.into();

        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no runtime history yet");
                Vec::new()
            }
            Err(source) => {
                return Err(HistoryError::Io {
                    operation: "read",
                    path,
                    source,
                })
            }
        };

        let table = match load(&raw) {
            Ok(table) => table,
            Err(e) if policy == CorruptHistoryPolicy::Reset && e.is_corrupt() => {
                tracing::warn!(
                    "Discarding unreadable runtime history {}: {}",
                    path.display(),
                    e
                );
                HistoryTable::new()
            }
            Err(e) => return Err(e),
        };

        Ok(Self { path, table })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The table as loaded at run start
    pub fn table(&self) -> &HistoryTable {
        &self.table
    }

    /// Merge this run's measurements and overwrite the file with the result
    ///
    /// An empty merged table still truncates the file to zero bytes.
    pub fn commit(
        self,
        measurements: &RunMeasurements,
        max_record_count: NonZeroUsize,
    ) -> Result<HistoryTable, HistoryError> {
        let merged = merge(&self.table, measurements, max_record_count);
        let bytes = serialize(&merged);

        fs::write(&self.path, &bytes).map_err(|source| HistoryError::Io {
            operation: "write",
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(
            path = %self.path.display(),
            rows = merged.len(),
            width = merged.width(),
            bytes = bytes.len(),
            "wrote runtime history"
        );
        Ok(merged)
    }
}
