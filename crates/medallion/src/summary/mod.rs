//! Aggregate summaries derived from the silver layer.

mod aggregate;
mod tables;

pub use aggregate::Summarizer;
pub use tables::{GroupSummary, OverallSummary, RaceGenderSummary, SummaryBundle};
