//! Block parser for the heterogeneous lookup file.
//!
//! The source file holds three `id,description` blocks, each introduced by
//! a header line naming its id column and terminated by a blank line (or a
//! lone-delimiter line, which some exports emit) or EOF. Parsing is an
//! explicit two-state machine rather than a positional cursor.

use std::fs;
use std::path::Path;

use crate::error::{MedallionError, Result};

use super::tables::{LookupKind, LookupTables};

/// Parser state: either looking for the next block header, or filling the
/// mapping the last header named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    SeekingHeader,
    ReadingRows(LookupKind),
}

/// Parses the three-block lookup source.
pub struct LookupParser {
    delimiter: char,
}

impl LookupParser {
    /// Create a parser for comma-delimited lookup files.
    pub fn new() -> Self {
        Self { delimiter: ',' }
    }

    /// Parse a lookup file from disk.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<LookupTables> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| MedallionError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.parse_str(&text)
    }

    /// Parse lookup text.
    ///
    /// Duplicate keys within a block are first-write-wins and counted.
    /// Fails only when no recognizable block header exists at all.
    pub fn parse_str(&self, text: &str) -> Result<LookupTables> {
        let mut tables = LookupTables::new();
        let mut state = BlockState::SeekingHeader;
        let mut headers_seen = 0usize;

        for line in text.lines() {
            if self.is_block_separator(line) {
                state = BlockState::SeekingHeader;
                continue;
            }

            let (first, rest) = self.split_line(line);

            if let Some(kind) = LookupKind::from_id_column(first) {
                state = BlockState::ReadingRows(kind);
                headers_seen += 1;
                continue;
            }

            match state {
                BlockState::SeekingHeader => {
                    // Stray content between blocks is ignored.
                }
                BlockState::ReadingRows(kind) => {
                    let key = first.trim();
                    if key.is_empty() {
                        continue;
                    }
                    let description = rest.unwrap_or_default();
                    let table = tables.table_mut(kind);
                    if table.contains_key(key) {
                        tables.duplicate_keys += 1;
                    } else {
                        table.insert(key.to_string(), description);
                    }
                }
            }
        }

        if headers_seen == 0 {
            return Err(MedallionError::LookupFormat(
                "no block header matched a known id column".to_string(),
            ));
        }

        Ok(tables)
    }

    /// A blank line or a line of nothing but delimiters ends a block.
    fn is_block_separator(&self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.is_empty() || trimmed.chars().all(|c| c == self.delimiter)
    }

    /// Split a line into its key field and the remaining description.
    ///
    /// Only the first delimiter splits; descriptions may themselves contain
    /// the delimiter, in which case exports quote them.
    fn split_line<'a>(&self, line: &'a str) -> (&'a str, Option<String>) {
        match line.split_once(self.delimiter) {
            Some((first, rest)) => (first, Some(unquote(rest.trim()).to_string())),
            None => (line, None),
        }
    }
}

impl Default for LookupParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip one layer of surrounding double quotes, if present.
fn unquote(field: &str) -> &str {
    let stripped = field
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'));
    stripped.unwrap_or(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "admission_type_id,description\n\
                          1,Emergency\n\
                          2,Urgent\n\
                          \n\
                          discharge_disposition_id,description\n\
                          1,Discharged to home\n\
                          ,\n\
                          admission_source_id,description\n\
                          7,Emergency Room\n";

    #[test]
    fn test_parses_three_blocks() {
        let tables = LookupParser::new().parse_str(SAMPLE).unwrap();

        assert_eq!(tables.describe(LookupKind::AdmissionType, "1"), Some("Emergency"));
        assert_eq!(tables.describe(LookupKind::AdmissionType, "2"), Some("Urgent"));
        assert_eq!(
            tables.describe(LookupKind::DischargeDisposition, "1"),
            Some("Discharged to home")
        );
        assert_eq!(
            tables.describe(LookupKind::AdmissionSource, "7"),
            Some("Emergency Room")
        );
    }

    #[test]
    fn test_duplicate_key_first_write_wins() {
        let text = "admission_type_id,description\n1,Emergency\n1,Duplicate\n";
        let tables = LookupParser::new().parse_str(text).unwrap();

        assert_eq!(tables.describe(LookupKind::AdmissionType, "1"), Some("Emergency"));
        assert_eq!(tables.duplicate_keys, 1);
    }

    #[test]
    fn test_no_header_is_fatal() {
        let text = "some_id,description\n1,whatever\n";
        let result = LookupParser::new().parse_str(text);
        assert!(matches!(result, Err(MedallionError::LookupFormat(_))));
    }

    #[test]
    fn test_quoted_description_with_delimiter() {
        let text = "admission_source_id,description\n4,\"Transfer from hospital, acute\"\n";
        let tables = LookupParser::new().parse_str(text).unwrap();
        assert_eq!(
            tables.describe(LookupKind::AdmissionSource, "4"),
            Some("Transfer from hospital, acute")
        );
    }

    #[test]
    fn test_blank_line_returns_to_seeking() {
        // Rows after a separator but before a new header are ignored.
        let text = "admission_type_id,description\n1,Emergency\n\n9,Orphan row\n";
        let tables = LookupParser::new().parse_str(text).unwrap();
        assert_eq!(tables.admission_type.len(), 1);
    }
}
