//! Field-level transformation rules.
//!
//! Every function here is total: unrecognized input degrades to null or a
//! catch-all label, never an error. The medication rule is table-driven so
//! the same normalization applies to the whole open-ended drug column set.

use once_cell::sync::Lazy;
use regex::Regex;

/// Columns parsed as nullable integers in the silver layer.
pub const NUMERIC_COLUMNS: &[&str] = &[
    "time_in_hospital",
    "num_lab_procedures",
    "num_procedures",
    "num_medications",
    "number_outpatient",
    "number_emergency",
    "number_inpatient",
    "number_diagnoses",
];

/// Identifier columns kept as text (numeric coercion would drop leading content).
pub const ID_COLUMNS: &[&str] = &[
    "encounter_id",
    "patient_nbr",
    "admission_type_id",
    "discharge_disposition_id",
    "admission_source_id",
];

/// Diagnosis code columns.
pub const DIAG_COLUMNS: &[&str] = &["diag_1", "diag_2", "diag_3"];

/// Diabetes medication columns, all normalized by the same status rule.
pub const MED_COLUMNS: &[&str] = &[
    "metformin",
    "repaglinide",
    "nateglinide",
    "chlorpropamide",
    "glimepiride",
    "acetohexamide",
    "glipizide",
    "glyburide",
    "tolbutamide",
    "pioglitazone",
    "rosiglitazone",
    "acarbose",
    "miglitol",
    "troglitazone",
    "tolazamide",
    "examide",
    "citoglipton",
    "insulin",
    "glyburide-metformin",
    "glipizide-metformin",
    "glimepiride-pioglitazone",
    "metformin-rosiglitazone",
    "metformin-pioglitazone",
];

/// Lab result columns with placeholder tokens.
pub const LAB_COLUMNS: &[&str] = &["max_glu_serum", "A1Cresult"];

/// The canonical raw encounter schema, in canonical order. Silver output
/// emits raw columns in this order regardless of input column order.
pub const CANONICAL_COLUMNS: &[&str] = &[
    "encounter_id",
    "patient_nbr",
    "race",
    "gender",
    "age",
    "weight",
    "admission_type_id",
    "discharge_disposition_id",
    "admission_source_id",
    "time_in_hospital",
    "payer_code",
    "medical_specialty",
    "num_lab_procedures",
    "num_procedures",
    "num_medications",
    "number_outpatient",
    "number_emergency",
    "number_inpatient",
    "diag_1",
    "diag_2",
    "diag_3",
    "number_diagnoses",
    "max_glu_serum",
    "A1Cresult",
    "metformin",
    "repaglinide",
    "nateglinide",
    "chlorpropamide",
    "glimepiride",
    "acetohexamide",
    "glipizide",
    "glyburide",
    "tolbutamide",
    "pioglitazone",
    "rosiglitazone",
    "acarbose",
    "miglitol",
    "troglitazone",
    "tolazamide",
    "examide",
    "citoglipton",
    "insulin",
    "glyburide-metformin",
    "glipizide-metformin",
    "glimepiride-pioglitazone",
    "metformin-rosiglitazone",
    "metformin-pioglitazone",
    "change",
    "diabetesMed",
    "readmitted",
];

static LEADING_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)?)").expect("valid regex"));

/// Snake-case an output column name: lowercase, with spaces, slashes and
/// hyphens replaced by underscores.
pub fn snake_case(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Parse a nullable integer. Non-numeric text degrades to null; integral
/// floats (for example `"3.0"`) are accepted.
pub fn parse_int(value: Option<&str>) -> Option<i64> {
    let trimmed = value?.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
        _ => None,
    }
}

/// Standardize a diagnosis code: trim, uppercase, placeholder → null.
pub fn clean_diag_code(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() || trimmed == "?" {
        return None;
    }
    Some(trimmed.to_ascii_uppercase())
}

/// Bucket a cleaned primary diagnosis into a broad clinical category.
///
/// The leading numeric value of the code decides the bucket; codes with no
/// leading numeric (V/E codes) and nulls fall into `other`.
pub fn diag_group(clean_code: Option<&str>) -> &'static str {
    let Some(code) = clean_code else {
        return "other";
    };
    let Some(m) = LEADING_NUMERIC.captures(code) else {
        return "other";
    };
    let Ok(num) = m[1].parse::<f64>() else {
        return "other";
    };

    if (250.0..251.0).contains(&num) {
        "diabetes"
    } else if (390.0..460.0).contains(&num) {
        "circulatory"
    } else if (460.0..520.0).contains(&num) {
        "respiratory"
    } else if (520.0..580.0).contains(&num) {
        "digestive"
    } else {
        "other"
    }
}

/// Normalize a raw medication dosage status.
pub fn med_status(value: Option<&str>) -> Option<&'static str> {
    match value?.trim() {
        "No" => Some("no"),
        "Steady" => Some("steady"),
        "Up" => Some("increased"),
        "Down" => Some("decreased"),
        _ => None,
    }
}

/// 1 when the medication was prescribed (steady or adjusted), 0 when not
/// prescribed, null when the status itself is unknown.
pub fn med_active_flag(status: Option<&str>) -> Option<i64> {
    match status? {
        "steady" | "increased" | "decreased" => Some(1),
        "no" => Some(0),
        _ => None,
    }
}

/// Encode gender as M/F/U. Anything unrecognized, including
/// `Unknown/Invalid` and null, collapses to U.
pub fn gender_clean(value: Option<&str>) -> &'static str {
    match value.map(str::trim) {
        Some("Male") => "M",
        Some("Female") => "F",
        _ => "U",
    }
}

/// 1 for female, 0 for male, null when gender is unknown.
pub fn gender_female_flag(clean: &str) -> Option<i64> {
    match clean {
        "F" => Some(1),
        "M" => Some(0),
        _ => None,
    }
}

/// Normalize known race labels; unrecognized values degrade to null.
pub fn race_clean(value: Option<&str>) -> Option<&'static str> {
    match value?.trim() {
        "Caucasian" => Some("Caucasian"),
        "AfricanAmerican" | "African American" => Some("African American"),
        "Asian" => Some("Asian"),
        "Hispanic" => Some("Hispanic"),
        "Other" => Some("Other"),
        _ => None,
    }
}

/// Trimmed, upper-cased raw readmission value.
pub fn readmitted_raw_clean(value: Option<&str>) -> Option<String> {
    Some(value?.trim().to_ascii_uppercase())
}

/// 1 when the patient was readmitted at all (`<30` or `>30`), else 0.
pub fn readmitted_any_flag(raw_clean: Option<&str>) -> i64 {
    matches!(raw_clean, Some("<30") | Some(">30")) as i64
}

/// 1 only for readmission within 30 days, else 0.
pub fn readmitted_30d_flag(raw_clean: Option<&str>) -> i64 {
    matches!(raw_clean, Some("<30")) as i64
}

/// Clean a lab result column: placeholder tokens become null.
pub fn lab_clean(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() || trimmed == "?" || trimmed == "None" {
        return None;
    }
    Some(trimmed.to_string())
}
