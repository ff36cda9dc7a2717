//! The bronze → silver transform engine.
//!
//! Transformation is a pure per-row mapping: no dependency on row order or
//! on other rows. Rows are fanned out across rayon workers and reassembled
//! in original order, which keeps output byte-identical across runs.

use rayon::prelude::*;

use crate::input::BronzeTable;
use crate::lookup::{LookupKind, LookupTables};

use super::rules::{
    self, CANONICAL_COLUMNS, DIAG_COLUMNS, ID_COLUMNS, LAB_COLUMNS, MED_COLUMNS, NUMERIC_COLUMNS,
};
use super::silver::{Cell, SilverTable};

/// Precomputed output plan for one bronze header set.
///
/// The plan fixes the silver column order: canonical raw columns first (in
/// canonical order, restricted to those present), then unrecognized raw
/// columns alphabetically, then derived columns in rule order. The order
/// is therefore independent of the input column order.
#[derive(Debug, Clone)]
struct TransformPlan {
    /// Full silver header.
    columns: Vec<String>,
    /// Raw output part: (bronze index, parse as integer).
    raw: Vec<(usize, bool)>,
    /// Present diagnosis columns: (diag slot 1-based, bronze index).
    diags: Vec<(usize, usize)>,
    /// Bronze index of `diag_1`, when present.
    diag_1: Option<usize>,
    /// Present medication columns, in canonical medication order.
    meds: Vec<usize>,
    gender: Option<usize>,
    race: Option<usize>,
    readmitted: Option<usize>,
    /// Present lab columns.
    labs: Vec<usize>,
    /// Present lookup id columns.
    lookup_ids: Vec<(LookupKind, usize)>,
}

impl TransformPlan {
    fn build(headers: &[String]) -> Self {
        let index_of = |name: &str| headers.iter().position(|h| h == name);

        // Raw part: canonical columns in canonical order, then extras.
        let mut raw = Vec::new();
        let mut columns = Vec::new();
        for name in CANONICAL_COLUMNS {
            if let Some(idx) = index_of(name) {
                // Identifier columns always stay text, never integer-coerced.
                let numeric = NUMERIC_COLUMNS.contains(name) && !ID_COLUMNS.contains(name);
                raw.push((idx, numeric));
                columns.push(rules::snake_case(name));
            }
        }
        let mut extras: Vec<(String, usize)> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !CANONICAL_COLUMNS.contains(&h.as_str()))
            .map(|(i, h)| (h.clone(), i))
            .collect();
        extras.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, idx) in extras {
            raw.push((idx, false));
            columns.push(rules::snake_case(&name));
        }

        // Derived part, in fixed rule order.
        let mut diags = Vec::new();
        for (slot, name) in DIAG_COLUMNS.iter().enumerate() {
            if let Some(idx) = index_of(name) {
                diags.push((slot + 1, idx));
                columns.push(format!("{}_clean", name));
            }
        }
        let diag_1 = index_of("diag_1");
        if diag_1.is_some() {
            columns.push("diag_1_group".to_string());
        }

        let mut meds = Vec::new();
        for name in MED_COLUMNS {
            if let Some(idx) = index_of(name) {
                let base = rules::snake_case(name);
                columns.push(format!("{}_clean", base));
                columns.push(format!("{}_active_flag", base));
                meds.push(idx);
            }
        }
        if !meds.is_empty() {
            columns.push("num_active_diabetes_meds".to_string());
        }

        let gender = index_of("gender");
        if gender.is_some() {
            columns.push("gender_clean".to_string());
            columns.push("gender_female_flag".to_string());
        }

        let race = index_of("race");
        if race.is_some() {
            columns.push("race_clean".to_string());
        }

        let readmitted = index_of("readmitted");
        if readmitted.is_some() {
            columns.push("readmitted_raw_clean".to_string());
            columns.push("readmitted_any_flag".to_string());
            columns.push("readmitted_30d_flag".to_string());
        }

        let mut labs = Vec::new();
        for name in LAB_COLUMNS {
            if let Some(idx) = index_of(name) {
                columns.push(format!("{}_clean", rules::snake_case(name)));
                labs.push(idx);
            }
        }

        let mut lookup_ids = Vec::new();
        for kind in LookupKind::all() {
            if let Some(idx) = index_of(kind.id_column()) {
                let desc = match kind {
                    LookupKind::AdmissionType => "admission_type_desc",
                    LookupKind::DischargeDisposition => "discharge_disposition_desc",
                    LookupKind::AdmissionSource => "admission_source_desc",
                };
                columns.push(desc.to_string());
                lookup_ids.push((kind, idx));
            }
        }

        Self {
            columns,
            raw,
            diags,
            diag_1,
            meds,
            gender,
            race,
            readmitted,
            labs,
            lookup_ids,
        }
    }
}

/// Applies the silver transformation to a bronze table.
pub struct Transformer<'a> {
    lookups: &'a LookupTables,
}

impl<'a> Transformer<'a> {
    /// Create a transformer over the given lookup tables.
    pub fn new(lookups: &'a LookupTables) -> Self {
        Self { lookups }
    }

    /// Transform a bronze table into silver.
    ///
    /// Row-preserving: `silver.row_count() == bronze.row_count()` always.
    /// Never fails for data-content reasons.
    pub fn transform(&self, bronze: &BronzeTable) -> SilverTable {
        let plan = TransformPlan::build(&bronze.headers);

        let rows: Vec<Vec<Cell>> = bronze
            .rows
            .par_iter()
            .map(|row| self.transform_row(&plan, row))
            .collect();

        SilverTable::new(plan.columns.clone(), rows)
    }

    /// Pure mapping from one bronze row to one silver row.
    fn transform_row(&self, plan: &TransformPlan, row: &[Option<String>]) -> Vec<Cell> {
        let val = |idx: usize| row.get(idx).and_then(|c| c.as_deref());
        let mut out = Vec::with_capacity(plan.columns.len());

        for &(idx, numeric) in &plan.raw {
            if numeric {
                out.push(Cell::int(rules::parse_int(val(idx))));
            } else {
                out.push(Cell::text(val(idx)));
            }
        }

        let mut diag_1_clean = None;
        for &(slot, idx) in &plan.diags {
            let clean = rules::clean_diag_code(val(idx));
            if slot == 1 {
                diag_1_clean = clean.clone();
            }
            out.push(Cell::text(clean.as_deref()));
        }
        if plan.diag_1.is_some() {
            out.push(Cell::Text(
                rules::diag_group(diag_1_clean.as_deref()).to_string(),
            ));
        }

        let mut active_sum = 0i64;
        for &idx in &plan.meds {
            let status = rules::med_status(val(idx));
            let flag = rules::med_active_flag(status);
            active_sum += flag.unwrap_or(0);
            out.push(Cell::text(status));
            out.push(Cell::int(flag));
        }
        if !plan.meds.is_empty() {
            out.push(Cell::Int(active_sum));
        }

        if let Some(idx) = plan.gender {
            let clean = rules::gender_clean(val(idx));
            out.push(Cell::Text(clean.to_string()));
            out.push(Cell::int(rules::gender_female_flag(clean)));
        }

        if let Some(idx) = plan.race {
            out.push(Cell::text(rules::race_clean(val(idx))));
        }

        if let Some(idx) = plan.readmitted {
            let raw_clean = rules::readmitted_raw_clean(val(idx));
            out.push(Cell::text(raw_clean.as_deref()));
            out.push(Cell::Int(rules::readmitted_any_flag(raw_clean.as_deref())));
            out.push(Cell::Int(rules::readmitted_30d_flag(raw_clean.as_deref())));
        }

        for &idx in &plan.labs {
            out.push(Cell::text(rules::lab_clean(val(idx)).as_deref()));
        }

        for &(kind, idx) in &plan.lookup_ids {
            let desc = val(idx).and_then(|id| self.lookups.describe(kind, id.trim()));
            out.push(Cell::text(desc));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::BronzeTable;

    fn bronze(headers: &[&str], rows: &[&[Option<&str>]]) -> BronzeTable {
        BronzeTable::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.map(|s| s.to_string())).collect())
                .collect(),
        )
    }

    #[test]
    fn test_row_preserving() {
        let table = bronze(
            &["encounter_id", "gender"],
            &[
                &[Some("1"), Some("Male")],
                &[Some("2"), Some("Female")],
                &[Some("3"), None],
            ],
        );
        let lookups = LookupTables::new();
        let silver = Transformer::new(&lookups).transform(&table);
        assert_eq!(silver.row_count(), table.row_count());
    }

    #[test]
    fn test_column_order_independent_of_input_order() {
        let lookups = LookupTables::new();
        let a = bronze(&["gender", "encounter_id", "insulin"], &[]);
        let b = bronze(&["insulin", "gender", "encounter_id"], &[]);

        let silver_a = Transformer::new(&lookups).transform(&a);
        let silver_b = Transformer::new(&lookups).transform(&b);
        assert_eq!(silver_a.columns, silver_b.columns);
        assert_eq!(
            silver_a.columns,
            vec![
                "encounter_id",
                "gender",
                "insulin",
                "insulin_clean",
                "insulin_active_flag",
                "num_active_diabetes_meds",
                "gender_clean",
                "gender_female_flag",
            ]
        );
    }

    #[test]
    fn test_unrecognized_columns_sorted_after_canonical() {
        let lookups = LookupTables::new();
        let table = bronze(&["zeta", "encounter_id", "alpha"], &[]);
        let silver = Transformer::new(&lookups).transform(&table);
        assert_eq!(silver.columns, vec!["encounter_id", "alpha", "zeta"]);
    }

    #[test]
    fn test_lookup_join_unmatched_is_null() {
        let mut lookups = LookupTables::new();
        lookups
            .table_mut(LookupKind::AdmissionType)
            .insert("1".to_string(), "Emergency".to_string());

        let table = bronze(
            &["encounter_id", "admission_type_id"],
            &[&[Some("10"), Some("1")], &[Some("11"), Some("9")]],
        );
        let silver = Transformer::new(&lookups).transform(&table);

        assert_eq!(
            silver.get_by_name(0, "admission_type_desc"),
            Some(&Cell::Text("Emergency".into()))
        );
        assert_eq!(silver.get_by_name(1, "admission_type_desc"), Some(&Cell::Null));
    }

    #[test]
    fn test_numeric_coercion_and_id_passthrough() {
        let lookups = LookupTables::new();
        let table = bronze(
            &["encounter_id", "time_in_hospital"],
            &[&[Some("007"), Some("5")], &[Some("8"), Some("bad")]],
        );
        let silver = Transformer::new(&lookups).transform(&table);

        // Leading zeros survive: ids stay text.
        assert_eq!(
            silver.get_by_name(0, "encounter_id"),
            Some(&Cell::Text("007".into()))
        );
        assert_eq!(silver.get_by_name(0, "time_in_hospital"), Some(&Cell::Int(5)));
        assert_eq!(silver.get_by_name(1, "time_in_hospital"), Some(&Cell::Null));
    }

    #[test]
    fn test_active_med_sum_treats_null_as_zero() {
        let lookups = LookupTables::new();
        let table = bronze(
            &["metformin", "insulin", "glipizide"],
            &[&[Some("Up"), Some("None"), Some("No")]],
        );
        let silver = Transformer::new(&lookups).transform(&table);

        assert_eq!(
            silver.get_by_name(0, "num_active_diabetes_meds"),
            Some(&Cell::Int(1))
        );
        assert_eq!(silver.get_by_name(0, "insulin_active_flag"), Some(&Cell::Null));
    }
}
