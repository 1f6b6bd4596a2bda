//! Read-only renderings of a history table for `runtime-log show`

use serde::{Deserialize, Serialize};

use crate::history::{serialize, DurationSlot, FileKey, HistoryTable};

/// One file's history in JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonHistoryRow {
    pub file: FileKey,
    /// Milliseconds per run, most recent first; `null` where not measured
    pub slots: Vec<DurationSlot>,
}

/// Table exactly as it is stored on disk
pub fn to_text(table: &HistoryTable) -> String {
    String::from_utf8_lossy(&serialize(table)).into_owned()
}

/// Rows in key order as a JSON array
pub fn to_json(table: &HistoryTable) -> serde_json::Result<String> {
    let rows: Vec<JsonHistoryRow> = table
        .sorted_rows()
        .into_iter()
        .map(|(file, slots)| JsonHistoryRow {
            file: file.clone(),
            slots: slots.to_vec(),
        })
        .collect();
    serde_json::to_string_pretty(&rows)
}
