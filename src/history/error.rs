use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::key::InvalidFileKey;
use super::slot::InvalidSlot;

/// Errors raised while loading or persisting a history table
///
/// Parse errors carry the 1-based line number of the offending row; any one
/// of them rejects the whole table.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("history is not valid UTF-8 (line {line})")]
    Encoding { line: usize },

    #[error("line {line}: {source}")]
    InvalidKey {
        line: usize,
        #[source]
        source: InvalidFileKey,
    },

    #[error("line {line}: {source}")]
    InvalidSlot {
        line: usize,
        #[source]
        source: InvalidSlot,
    },

    #[error("line {line}: {found} slots, expected {expected} like the first row")]
    WidthMismatch {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: duplicate file key {key:?}")]
    DuplicateKey { line: usize, key: String },

    #[error("failed to {operation} {}: {source}", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl HistoryError {
    /// Whether the error came from the table contents rather than the filesystem
    pub fn is_corrupt(&self) -> bool {
        !matches!(self, HistoryError::Io { .. })
    }
}
