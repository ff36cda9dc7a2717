//! Ingestion reader: raw encounter file → bronze table.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::Utc;
use sha2::{Digest, Sha256};

use super::source::{BronzeTable, IngestReport};
use crate::error::{MedallionError, Result};

/// Tokens normalized to null at ingest.
const MISSING_TOKENS: &[&str] = &["?", "NA", "NaN", "null"];

/// Ingestion configuration.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Field delimiter.
    pub delimiter: u8,
    /// Additional tokens treated as missing, on top of the defaults.
    pub extra_missing_tokens: Vec<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            extra_missing_tokens: Vec::new(),
        }
    }
}

/// Reads a raw delimited file into a bronze table.
///
/// Malformed lines are skipped and counted, never fatal. Only an
/// unreadable file or a zero-column header aborts ingestion.
pub struct Ingestor {
    config: IngestConfig,
}

impl Ingestor {
    /// Create an ingestor with default configuration.
    pub fn new() -> Self {
        Self {
            config: IngestConfig::default(),
        }
    }

    /// Create an ingestor with custom configuration.
    pub fn with_config(config: IngestConfig) -> Self {
        Self { config }
    }

    /// Read a file and return the bronze table plus the ingestion report.
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<(BronzeTable, IngestReport)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| MedallionError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| MedallionError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let sha256 = format!("sha256:{:x}", hasher.finalize());

        let (table, rows_rejected) = self.read_bytes(&contents)?;

        let report = IngestReport {
            file: path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            sha256,
            rows_seen: table.row_count() + rows_rejected,
            rows_loaded: table.row_count(),
            rows_rejected,
            column_count: table.column_count(),
            column_names: table.headers.clone(),
            ingested_at: Utc::now(),
        };

        Ok((table, report))
    }

    /// Parse raw bytes into a bronze table, returning the rejected-line count.
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<(BronzeTable, usize)> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(MedallionError::EmptyData(
                "Input has no columns".to_string(),
            ));
        }

        let expected = headers.len();
        let mut rows = Vec::new();
        let mut rejected = 0usize;

        for result in reader.records() {
            let record = match result {
                Ok(r) => r,
                Err(_) => {
                    rejected += 1;
                    continue;
                }
            };

            if record.len() != expected {
                rejected += 1;
                continue;
            }

            let row: Vec<Option<String>> =
                record.iter().map(|field| self.normalize(field)).collect();
            rows.push(row);
        }

        Ok((BronzeTable::new(headers, rows), rejected))
    }

    /// Normalize one raw field: missing tokens become null.
    fn normalize(&self, field: &str) -> Option<String> {
        let trimmed = field.trim();
        if trimmed.is_empty()
            || MISSING_TOKENS.contains(&trimmed)
            || self.config.extra_missing_tokens.iter().any(|t| t == trimmed)
        {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new()
    }
}
