// Load, merge and serialize the tab-separated history table

use std::collections::{HashMap, HashSet};
use std::iter;
use std::num::NonZeroUsize;

use super::error::HistoryError;
use super::key::FileKey;
use super::slot::DurationSlot;

/// Duration slots for one file, most recent first
pub type HistoryRow = Vec<DurationSlot>;

/// Cumulative milliseconds per file measured in the current run
pub type RunMeasurements = HashMap<FileKey, u64>;

/// Persisted per-file duration history
///
/// Rows are stored unordered; [`serialize`] and [`HistoryTable::sorted_rows`]
/// always re-derive key order. `width` is the common slot count of every row,
/// validated on load and recomputed on merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryTable {
    rows: HashMap<FileKey, HistoryRow>,
    width: usize,
}

impl HistoryTable {
    /// Create an empty table (zero width)
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots in every row; 0 for an empty table
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Slots recorded for `key`, most recent first
    pub fn get(&self, key: &str) -> Option<&[DurationSlot]> {
        self.rows.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.rows.contains_key(key)
    }

    /// Rows in ascending key order
    pub fn sorted_rows(&self) -> Vec<(&FileKey, &[DurationSlot])> {
        let mut rows: Vec<_> = self
            .rows
            .iter()
            .map(|(key, row)| (key, row.as_slice()))
            .collect();
        rows.sort_unstable_by(|a, b| a.0.cmp(b.0));
        rows
    }
}

/// Parse a history table from its raw bytes
///
/// Empty input yields an empty table. Blank lines are skipped and `\r\n`
/// terminators are accepted. Any malformed row rejects the whole table: the
/// window width is taken from the first row and every other row must match it.
pub fn load(raw: &[u8]) -> Result<HistoryTable, HistoryError> {
    let mut rows = HashMap::new();
    let mut width = None;

    for (index, line) in raw.split(|&b| b == b'\n').enumerate() {
        let line_no = index + 1;
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            continue;
        }
        let line =
            std::str::from_utf8(line).map_err(|_| HistoryError::Encoding { line: line_no })?;

        let mut fields = line.split('\t');
        let key = fields.next().unwrap_or_default();
        let key = FileKey::new(key).map_err(|source| HistoryError::InvalidKey {
            line: line_no,
            source,
        })?;
        let row = fields
            .map(str::parse::<DurationSlot>)
            .collect::<Result<HistoryRow, _>>()
            .map_err(|source| HistoryError::InvalidSlot {
                line: line_no,
                source,
            })?;

        match width {
            None => width = Some(row.len()),
            Some(expected) if expected != row.len() => {
                return Err(HistoryError::WidthMismatch {
                    line: line_no,
                    expected,
                    found: row.len(),
                });
            }
            Some(_) => {}
        }

        if rows.contains_key(&key) {
            return Err(HistoryError::DuplicateKey {
                line: line_no,
                key: key.into(),
            });
        }
        rows.insert(key, row);
    }

    let table = HistoryTable {
        rows,
        width: width.unwrap_or(0),
    };
    tracing::debug!(rows = table.len(), width = table.width, "loaded runtime history");
    Ok(table)
}

/// Combine a loaded table with this run's measurements
///
/// Every key in either input gets one new leading slot (its measurement, or
/// the sentinel when it was not exercised). Keys new to the history start
/// from a row of `table.width()` sentinels. Rows are then cut to
/// `max_record_count` slots, dropping the oldest, and rows left with only
/// sentinels are pruned. Neither input is modified.
pub fn merge(
    table: &HistoryTable,
    measurements: &RunMeasurements,
    max_record_count: NonZeroUsize,
) -> HistoryTable {
    let max = max_record_count.get();
    let keys: HashSet<&FileKey> = table.rows.keys().chain(measurements.keys()).collect();

    let mut rows = HashMap::with_capacity(keys.len());
    for key in keys {
        let leading = DurationSlot::from(measurements.get(key).copied());
        let row: HistoryRow = match table.rows.get(key) {
            Some(previous) => iter::once(leading)
                .chain(previous.iter().copied())
                .take(max)
                .collect(),
            None => iter::once(leading)
                .chain(iter::repeat(DurationSlot::Missing).take(table.width))
                .take(max)
                .collect(),
        };

        if row.iter().all(DurationSlot::is_missing) {
            tracing::trace!(file = %key, "pruning row with no measurements");
            continue;
        }
        rows.insert(key.clone(), row);
    }

    let width = if rows.is_empty() {
        0
    } else {
        (table.width + 1).min(max)
    };
    HistoryTable { rows, width }
}

/// Render a table as tab-separated lines in ascending key order
pub fn serialize(table: &HistoryTable) -> Vec<u8> {
    let mut output = String::new();

    for (key, row) in table.sorted_rows() {
        output.push_str(key.as_str());
        for slot in row {
            output.push('\t');
            output.push_str(&slot.to_string());
        }
        output.push('\n');
    }

    output.into_bytes()
}
