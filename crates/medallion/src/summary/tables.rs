//! Fixed-shape summary table types.

use serde::{Deserialize, Serialize};

/// Whole-table metrics over the silver layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallSummary {
    pub n_encounters: usize,
    pub n_unique_patients: usize,
    /// Mean `time_in_hospital`, nulls excluded. None when no value exists.
    pub mean_length_of_stay_days: Option<f64>,
    pub median_length_of_stay_days: Option<f64>,
    pub mean_num_medications: Option<f64>,
    pub readmission_rate_any: Option<f64>,
    pub readmission_rate_30d: Option<f64>,
}

/// One group of a single-key summary (by age bracket, by insulin status).
///
/// The key is the raw grouping value; rows where it is null form their own
/// group with `key: None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub key: Option<String>,
    pub n_encounters: usize,
    pub readmission_rate: Option<f64>,
}

/// One (race, gender) group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceGenderSummary {
    pub race: Option<String>,
    pub gender: Option<String>,
    pub n_encounters: usize,
    pub mean_los_days: Option<f64>,
    pub readmission_rate: Option<f64>,
}

/// The four summary tables, recomputed fully on each run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryBundle {
    pub overall: OverallSummary,
    pub by_age: Vec<GroupSummary>,
    pub by_insulin: Vec<GroupSummary>,
    pub by_race_gender: Vec<RaceGenderSummary>,
}
