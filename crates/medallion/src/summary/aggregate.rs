//! Aggregation over the silver table.
//!
//! Each of the four summaries is an independent pure fold over the silver
//! rows. Groups materialize only for keys that occur, so a rate is never a
//! division by zero. Rates and means are exact, unrounded.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use crate::transform::SilverTable;

use super::tables::{GroupSummary, OverallSummary, RaceGenderSummary, SummaryBundle};

/// Computes the four fixed-shape summary tables.
pub struct Summarizer;

impl Summarizer {
    pub fn new() -> Self {
        Self
    }

    /// Summarize a silver table. Missing columns yield empty groupings or
    /// null metrics, never errors.
    pub fn summarize(&self, silver: &SilverTable) -> SummaryBundle {
        SummaryBundle {
            overall: self.overall(silver),
            by_age: self.grouped(silver, "age"),
            by_insulin: self.grouped(silver, "insulin"),
            by_race_gender: self.race_gender(silver),
        }
    }

    fn overall(&self, silver: &SilverTable) -> OverallSummary {
        let stay = int_column(silver, "time_in_hospital");
        let meds = int_column(silver, "num_medications");

        let n_unique_patients = match silver.column_index("patient_nbr") {
            Some(idx) => silver
                .column_cells(idx)
                .filter_map(|c| c.as_text())
                .collect::<HashSet<_>>()
                .len(),
            None => 0,
        };

        OverallSummary {
            n_encounters: silver.row_count(),
            n_unique_patients,
            mean_length_of_stay_days: mean(&stay),
            median_length_of_stay_days: median(&stay),
            mean_num_medications: mean(&meds),
            readmission_rate_any: rate(&int_column(silver, "readmitted_any_flag")),
            readmission_rate_30d: rate(&int_column(silver, "readmitted_30d_flag")),
        }
    }

    /// Group by a raw column and fold encounter count plus readmission rate.
    fn grouped(&self, silver: &SilverTable, key_column: &str) -> Vec<GroupSummary> {
        let Some(key_idx) = silver.column_index(key_column) else {
            return Vec::new();
        };
        let flags = int_column(silver, "readmitted_any_flag");

        let mut groups: BTreeMap<Option<String>, Vec<Option<i64>>> = BTreeMap::new();
        for (row, cell) in silver.column_cells(key_idx).enumerate() {
            let key = cell.as_text().map(|s| s.to_string());
            let flag = flags.get(row).copied().flatten();
            groups.entry(key).or_default().push(flag);
        }

        let mut out: Vec<GroupSummary> = groups
            .into_iter()
            .map(|(key, flags)| GroupSummary {
                key,
                n_encounters: flags.len(),
                readmission_rate: rate(&flags),
            })
            .collect();
        out.sort_by(|a, b| cmp_null_last(&a.key, &b.key));
        out
    }

    fn race_gender(&self, silver: &SilverTable) -> Vec<RaceGenderSummary> {
        let race_idx = silver.column_index("race_clean");
        let gender_idx = silver.column_index("gender_clean");
        if race_idx.is_none() && gender_idx.is_none() {
            return Vec::new();
        }

        let flags = int_column(silver, "readmitted_any_flag");
        let stay = int_column(silver, "time_in_hospital");

        type Key = (Option<String>, Option<String>);
        let mut groups: BTreeMap<Key, (Vec<Option<i64>>, Vec<Option<i64>>)> = BTreeMap::new();
        for row in 0..silver.row_count() {
            let race = race_idx
                .and_then(|i| silver.get(row, i))
                .and_then(|c| c.as_text())
                .map(|s| s.to_string());
            let gender = gender_idx
                .and_then(|i| silver.get(row, i))
                .and_then(|c| c.as_text())
                .map(|s| s.to_string());

            let entry = groups.entry((race, gender)).or_default();
            entry.0.push(flags.get(row).copied().flatten());
            entry.1.push(stay.get(row).copied().flatten());
        }

        let mut out: Vec<RaceGenderSummary> = groups
            .into_iter()
            .map(|((race, gender), (flags, stay))| RaceGenderSummary {
                race,
                gender,
                n_encounters: flags.len(),
                mean_los_days: mean(&stay),
                readmission_rate: rate(&flags),
            })
            .collect();
        out.sort_by(|a, b| {
            cmp_null_last(&a.race, &b.race).then_with(|| cmp_null_last(&a.gender, &b.gender))
        });
        out
    }
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Read an integer column as nullable values; missing column → all null.
fn int_column(silver: &SilverTable, name: &str) -> Vec<Option<i64>> {
    match silver.column_index(name) {
        Some(idx) => silver.column_cells(idx).map(|c| c.as_int()).collect(),
        None => vec![None; silver.row_count()],
    }
}

/// Mean over the non-null values; None when every value is null.
///
/// Accumulates in f64 so extreme integer input cannot overflow the fold.
fn mean(values: &[Option<i64>]) -> Option<f64> {
    let mut sum = 0.0f64;
    let mut count = 0usize;
    for value in values.iter().copied().flatten() {
        sum += value as f64;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    Some(sum / count as f64)
}

/// Median over the non-null values; even counts average the middle pair.
fn median(values: &[Option<i64>]) -> Option<f64> {
    let mut present: Vec<i64> = values.iter().copied().flatten().collect();
    if present.is_empty() {
        return None;
    }
    present.sort_unstable();
    let mid = present.len() / 2;
    if present.len() % 2 == 1 {
        Some(present[mid] as f64)
    } else {
        Some((present[mid - 1] as f64 + present[mid] as f64) / 2.0)
    }
}

/// `count(flag == 1) / count(non-null)`; None when no non-null member exists.
fn rate(flags: &[Option<i64>]) -> Option<f64> {
    let present: Vec<i64> = flags.iter().copied().flatten().collect();
    if present.is_empty() {
        return None;
    }
    let ones = present.iter().filter(|&&f| f == 1).count();
    Some(ones as f64 / present.len() as f64)
}

/// Sort Some keys ascending with the null group last.
fn cmp_null_last(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Cell;

    fn silver(columns: &[&str], rows: Vec<Vec<Cell>>) -> SilverTable {
        SilverTable::new(columns.iter().map(|s| s.to_string()).collect(), rows)
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn test_mean_median_handle_extreme_magnitudes() {
        let extremes = [Some(i64::MAX), Some(i64::MAX)];
        assert_eq!(mean(&extremes), Some(i64::MAX as f64));
        assert_eq!(median(&extremes), Some(i64::MAX as f64));

        let spread = [Some(i64::MIN), Some(i64::MAX)];
        assert_eq!(mean(&spread), Some((i64::MIN as f64 + i64::MAX as f64) / 2.0));
        assert_eq!(median(&spread), Some((i64::MIN as f64 + i64::MAX as f64) / 2.0));
    }

    #[test]
    fn test_summarize_tolerates_extreme_stay_values() {
        let table = silver(
            &["patient_nbr", "time_in_hospital", "readmitted_any_flag"],
            vec![
                vec![text("p1"), Cell::Int(i64::MAX), Cell::Int(0)],
                vec![text("p2"), Cell::Int(i64::MAX), Cell::Int(1)],
            ],
        );
        let bundle = Summarizer::new().summarize(&table);

        assert_eq!(bundle.overall.n_encounters, 2);
        assert_eq!(bundle.overall.mean_length_of_stay_days, Some(i64::MAX as f64));
        assert_eq!(bundle.overall.median_length_of_stay_days, Some(i64::MAX as f64));
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&[Some(1), Some(3), Some(2)]), Some(2.0));
        assert_eq!(median(&[Some(1), Some(2), Some(3), Some(4)]), Some(2.5));
        assert_eq!(median(&[None, None]), None);
    }

    #[test]
    fn test_overall_excludes_nulls_from_means() {
        let table = silver(
            &["patient_nbr", "time_in_hospital", "readmitted_any_flag", "readmitted_30d_flag"],
            vec![
                vec![text("p1"), Cell::Int(2), Cell::Int(1), Cell::Int(1)],
                vec![text("p1"), Cell::Int(4), Cell::Int(0), Cell::Int(0)],
                vec![text("p2"), Cell::Null, Cell::Int(1), Cell::Int(0)],
            ],
        );
        let overall = Summarizer::new().overall(&table);

        assert_eq!(overall.n_encounters, 3);
        assert_eq!(overall.n_unique_patients, 2);
        assert_eq!(overall.mean_length_of_stay_days, Some(3.0));
        assert_eq!(overall.median_length_of_stay_days, Some(3.0));
        assert_eq!(overall.readmission_rate_any, Some(2.0 / 3.0));
        assert_eq!(overall.readmission_rate_30d, Some(1.0 / 3.0));
    }

    #[test]
    fn test_group_counts_sum_to_total() {
        let table = silver(
            &["insulin", "readmitted_any_flag"],
            vec![
                vec![text("Up"), Cell::Int(1)],
                vec![text("No"), Cell::Int(0)],
                vec![text("Up"), Cell::Int(0)],
                vec![Cell::Null, Cell::Int(1)],
            ],
        );
        let bundle = Summarizer::new().summarize(&table);

        let total: usize = bundle.by_insulin.iter().map(|g| g.n_encounters).sum();
        assert_eq!(total, bundle.overall.n_encounters);
    }

    #[test]
    fn test_null_group_sorts_last() {
        let table = silver(
            &["age", "readmitted_any_flag"],
            vec![
                vec![Cell::Null, Cell::Int(0)],
                vec![text("[60-70)"), Cell::Int(1)],
                vec![text("[50-60)"), Cell::Int(0)],
            ],
        );
        let by_age = Summarizer::new().grouped(&table, "age");

        let keys: Vec<_> = by_age.iter().map(|g| g.key.clone()).collect();
        assert_eq!(
            keys,
            vec![Some("[50-60)".to_string()), Some("[60-70)".to_string()), None]
        );
    }

    #[test]
    fn test_race_gender_grouping() {
        let table = silver(
            &["race_clean", "gender_clean", "time_in_hospital", "readmitted_any_flag"],
            vec![
                vec![text("Asian"), text("F"), Cell::Int(2), Cell::Int(1)],
                vec![text("Asian"), text("F"), Cell::Int(4), Cell::Int(1)],
                vec![text("Asian"), text("M"), Cell::Int(6), Cell::Int(0)],
                vec![Cell::Null, text("U"), Cell::Null, Cell::Int(0)],
            ],
        );
        let groups = Summarizer::new().race_gender(&table);

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].race.as_deref(), Some("Asian"));
        assert_eq!(groups[0].gender.as_deref(), Some("F"));
        assert_eq!(groups[0].n_encounters, 2);
        assert_eq!(groups[0].mean_los_days, Some(3.0));
        assert_eq!(groups[0].readmission_rate, Some(1.0));
        // Null race group last, with a null mean (no stay values).
        assert_eq!(groups[2].race, None);
        assert_eq!(groups[2].mean_los_days, None);
    }
}
