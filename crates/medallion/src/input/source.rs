//! Bronze table representation and ingestion report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured record describing one ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    /// File name without path.
    pub file: String,
    /// SHA-256 hash of the raw file contents.
    pub sha256: String,
    /// Data lines encountered in the file (excluding header).
    pub rows_seen: usize,
    /// Rows that parsed with the expected field count.
    pub rows_loaded: usize,
    /// Malformed lines skipped (wrong field count or unparsable record).
    pub rows_rejected: usize,
    /// Number of columns in the header.
    pub column_count: usize,
    /// Header names in file order.
    pub column_names: Vec<String>,
    /// When ingestion was performed.
    pub ingested_at: DateTime<Utc>,
}

/// Minimally-processed snapshot of a raw input file.
///
/// Every cell is text-or-null; recognized missing-value tokens have been
/// normalized to `None` at ingest. Bronze tables are produced once per run
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct BronzeTable {
    /// Column headers in file order.
    pub headers: Vec<String>,
    /// Row data (row-major order).
    pub rows: Vec<Vec<Option<String>>>,
}

impl BronzeTable {
    /// Create a new bronze table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { headers, rows }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Find the index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Iterate all values of a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = Option<&str>> {
        self.rows
            .iter()
            .map(move |row| row.get(index).and_then(|c| c.as_deref()))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).and_then(|c| c.as_deref())
    }
}
