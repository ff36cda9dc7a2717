//! Data-quality report types.
//!
//! The report is a pure value: a point-in-time snapshot of what the bronze
//! table looks like. Nothing downstream reads it to decide anything.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Missing-value stats for one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing_count: usize,
    /// Fraction of rows missing, exact (0.0 when the table is empty).
    pub missing_pct: f64,
}

/// Duplicate counts over the bronze table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DuplicateStats {
    /// Rows identical to an earlier row across every column.
    pub duplicate_rows: usize,
    /// Extra occurrences of an already-seen `encounter_id`.
    pub duplicate_encounter_ids: usize,
}

/// Age-bracket rule findings.
///
/// A valid bracket has the exact form `[a-b)` with `0 <= a < b <= 120`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgeCheck {
    /// Non-null values not of the `[a-b)` form.
    pub invalid_format: usize,
    /// Well-formed brackets violating the 0..=120 ordering bounds.
    pub out_of_bounds: usize,
    /// Lowest valid lower bound observed.
    pub min_observed: Option<u32>,
    /// Highest valid upper bound observed.
    pub max_observed: Option<u32>,
}

/// `time_in_hospital` rule findings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeInHospitalCheck {
    /// Non-null values that are not numeric.
    pub non_numeric: usize,
    /// Numeric values outside `[1, 14]`.
    pub out_of_range: usize,
}

/// Gender domain findings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenderCheck {
    /// Non-null values outside the expected domain.
    pub invalid_count: usize,
    /// Distinct unexpected values, sorted.
    pub invalid_values: Vec<String>,
}

/// Structured data-quality report over one bronze table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub row_count: usize,
    pub column_count: usize,
    /// Per-column missing stats, in bronze column order.
    pub missing_by_column: Vec<ColumnMissing>,
    pub duplicates: DuplicateStats,
    pub age: AgeCheck,
    pub time_in_hospital: TimeInHospitalCheck,
    pub gender: GenderCheck,
    /// When the check was performed.
    pub generated_at: DateTime<Utc>,
}

impl QualityReport {
    /// Total logical-rule violations, across all named checks.
    pub fn total_violations(&self) -> usize {
        self.age.invalid_format
            + self.age.out_of_bounds
            + self.time_in_hospital.non_numeric
            + self.time_in_hospital.out_of_range
            + self.gender.invalid_count
    }
}
