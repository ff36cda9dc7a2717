//! Silver table representation.

use serde::{Deserialize, Serialize};

/// One typed silver cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Int(i64),
    Text(String),
}

impl Cell {
    /// Build a text cell from an optional string.
    pub fn text(value: Option<&str>) -> Self {
        match value {
            Some(v) => Cell::Text(v.to_string()),
            None => Cell::Null,
        }
    }

    /// Build an integer cell from an optional value.
    pub fn int(value: Option<i64>) -> Self {
        match value {
            Some(v) => Cell::Int(v),
            None => Cell::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Cell::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Render the cell as a flat-text field. Nulls render empty.
    pub fn render(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Int(v) => v.to_string(),
            Cell::Text(v) => v.clone(),
        }
    }
}

/// Cleaned, typed, encoded analytical table derived from bronze.
///
/// Exactly one silver row per bronze row; the transform never drops or
/// adds rows. Column order is fixed by the transform plan.
#[derive(Debug, Clone, PartialEq)]
pub struct SilverTable {
    /// Output column names, already snake-cased.
    pub columns: Vec<String>,
    /// Row data (row-major order).
    pub rows: Vec<Vec<Cell>>,
}

impl SilverTable {
    /// Create a new silver table.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { columns, rows }
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Find the index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate all cells of a column by index.
    pub fn column_cells(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().map(move |row| row.get(index).unwrap_or(&Cell::Null))
    }

    /// Get a specific cell.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Get a cell by row index and column name.
    pub fn get_by_name(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.get(row, idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_render() {
        assert_eq!(Cell::Null.render(), "");
        assert_eq!(Cell::Int(14).render(), "14");
        assert_eq!(Cell::Text("<30".into()).render(), "<30");
    }

    #[test]
    fn test_get_by_name() {
        let table = SilverTable::new(
            vec!["a".into(), "b".into()],
            vec![vec![Cell::Int(1), Cell::Null]],
        );
        assert_eq!(table.get_by_name(0, "a"), Some(&Cell::Int(1)));
        assert_eq!(table.get_by_name(0, "b"), Some(&Cell::Null));
        assert_eq!(table.get_by_name(0, "c"), None);
    }
}
