//! Quality checks over the bronze table.
//!
//! All checks are read-only and advisory: they characterize the raw data
//! without filtering or blocking it. The transform proceeds regardless of
//! what is found here.

use std::collections::{BTreeSet, HashSet};

use chrono::Utc;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::input::BronzeTable;

use super::report::{
    AgeCheck, ColumnMissing, DuplicateStats, GenderCheck, QualityReport, TimeInHospitalCheck,
};

static AGE_BRACKET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(\d+)-(\d+)\)$").expect("valid regex"));

const VALID_GENDERS: &[&str] = &["Male", "Female", "Unknown/Invalid"];

/// Parse an age bracket of the exact form `[a-b)`.
///
/// Returns the bounds without judging them; bound checks are the caller's
/// rule. Anything not matching the form is `None`.
pub fn parse_age_bracket(value: &str) -> Option<(u32, u32)> {
    let caps = AGE_BRACKET.captures(value.trim())?;
    let low = caps[1].parse().ok()?;
    let high = caps[2].parse().ok()?;
    Some((low, high))
}

/// Computes a quality report over a bronze table.
pub struct QualityChecker;

impl QualityChecker {
    pub fn new() -> Self {
        Self
    }

    /// Run all checks. Never fails, regardless of what the data contains.
    pub fn check(&self, table: &BronzeTable) -> QualityReport {
        QualityReport {
            row_count: table.row_count(),
            column_count: table.column_count(),
            missing_by_column: self.missing_by_column(table),
            duplicates: self.duplicates(table),
            age: self.check_age(table),
            time_in_hospital: self.check_time_in_hospital(table),
            gender: self.check_gender(table),
            generated_at: Utc::now(),
        }
    }

    fn missing_by_column(&self, table: &BronzeTable) -> Vec<ColumnMissing> {
        let rows = table.row_count();
        table
            .headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let missing = table.column_values(idx).filter(|v| v.is_none()).count();
                ColumnMissing {
                    column: name.clone(),
                    missing_count: missing,
                    missing_pct: if rows == 0 {
                        0.0
                    } else {
                        missing as f64 / rows as f64
                    },
                }
            })
            .collect()
    }

    fn duplicates(&self, table: &BronzeTable) -> DuplicateStats {
        let mut seen_rows = HashSet::new();
        let mut duplicate_rows = 0;
        for row in &table.rows {
            if !seen_rows.insert(row) {
                duplicate_rows += 1;
            }
        }

        let duplicate_encounter_ids = match table.column_index("encounter_id") {
            Some(idx) => {
                let mut by_id: IndexMap<&str, usize> = IndexMap::new();
                for value in table.column_values(idx).flatten() {
                    *by_id.entry(value).or_default() += 1;
                }
                by_id.values().map(|&n| n.saturating_sub(1)).sum()
            }
            None => 0,
        };

        DuplicateStats {
            duplicate_rows,
            duplicate_encounter_ids,
        }
    }

    fn check_age(&self, table: &BronzeTable) -> AgeCheck {
        let mut check = AgeCheck::default();
        let Some(idx) = table.column_index("age") else {
            return check;
        };

        for value in table.column_values(idx).flatten() {
            match parse_age_bracket(value) {
                None => check.invalid_format += 1,
                Some((low, high)) => {
                    if low < high && high <= 120 {
                        check.min_observed =
                            Some(check.min_observed.map_or(low, |m| m.min(low)));
                        check.max_observed =
                            Some(check.max_observed.map_or(high, |m| m.max(high)));
                    } else {
                        check.out_of_bounds += 1;
                    }
                }
            }
        }
        check
    }

    fn check_time_in_hospital(&self, table: &BronzeTable) -> TimeInHospitalCheck {
        let mut check = TimeInHospitalCheck::default();
        let Some(idx) = table.column_index("time_in_hospital") else {
            return check;
        };

        for value in table.column_values(idx).flatten() {
            match value.trim().parse::<f64>() {
                Ok(n) if (1.0..=14.0).contains(&n) => {}
                Ok(_) => check.out_of_range += 1,
                Err(_) => check.non_numeric += 1,
            }
        }
        check
    }

    fn check_gender(&self, table: &BronzeTable) -> GenderCheck {
        let mut check = GenderCheck::default();
        let Some(idx) = table.column_index("gender") else {
            return check;
        };

        let mut invalid = BTreeSet::new();
        for value in table.column_values(idx).flatten() {
            if !VALID_GENDERS.contains(&value) {
                check.invalid_count += 1;
                invalid.insert(value.to_string());
            }
        }
        check.invalid_values = invalid.into_iter().collect();
        check
    }
}

impl Default for QualityChecker {
    fn default() -> Self {
        Self::new()
    }
}
