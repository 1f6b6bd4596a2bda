// Rolling per-file duration history
//
// A history table maps each tracked file to a bounded, most-recent-first
// window of duration slots. Each run contributes exactly one new slot per
// file: the measured duration, or `na` when the file was not exercised.
// Rows that carry no real measurement are pruned, and the table is always
// written sorted by file key.

mod error;
mod key;
mod slot;
mod store;
mod table;

pub use error::HistoryError;
pub use key::{FileKey, InvalidFileKey};
pub use slot::{DurationSlot, InvalidSlot, SENTINEL};
pub use store::{CorruptHistoryPolicy, HistoryStore};
pub use table::{load, merge, serialize, HistoryRow, HistoryTable, RunMeasurements};
