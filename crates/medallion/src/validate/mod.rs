//! Advisory data-quality validation over the bronze layer.

mod checks;
mod report;

pub use checks::{parse_age_bracket, QualityChecker};
pub use report::{
    AgeCheck, ColumnMissing, DuplicateStats, GenderCheck, QualityReport, TimeInHospitalCheck,
};
