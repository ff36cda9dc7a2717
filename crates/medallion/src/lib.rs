//! Medallion: bronze → silver curation engine for hospital encounter data.
//!
//! Medallion ingests raw encounter records as text, characterizes their
//! quality, and deterministically transforms them into a typed analytical
//! table plus four fixed-shape summaries.
//!
//! # Core Principles
//!
//! - **Ingest as text, cast later**: bronze keeps every field text-or-null;
//!   casting happens in the transform as a total, never-failing function
//! - **Advisory validation**: the quality report describes the data and
//!   never filters or blocks it
//! - **Deterministic**: the same bronze snapshot and lookup tables always
//!   produce byte-identical silver output
//!
//! # Example
//!
//! ```no_run
//! use medallion::{Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig {
//!     encounters_path: "data/raw/diabetic_data.csv".into(),
//!     lookups_path: "data/raw/ids_mapping.csv".into(),
//!     ingest: Default::default(),
//! };
//! let run = Pipeline::new(config).run().unwrap();
//!
//! assert_eq!(run.silver.row_count(), run.bronze.row_count());
//! println!("Violations: {}", run.quality_report.total_violations());
//! ```

pub mod error;
pub mod input;
pub mod lookup;
pub mod output;
pub mod pipeline;
pub mod summary;
pub mod transform;
pub mod validate;

pub use error::{MedallionError, Result};
pub use input::{BronzeTable, IngestConfig, IngestReport, Ingestor};
pub use lookup::{LookupKind, LookupParser, LookupTables};
pub use output::{ArtifactPaths, ArtifactWriter, SilverExportReport};
pub use pipeline::{Pipeline, PipelineConfig, PipelineRun};
pub use summary::{GroupSummary, OverallSummary, RaceGenderSummary, Summarizer, SummaryBundle};
pub use transform::{Cell, SilverTable, Transformer};
pub use validate::{QualityChecker, QualityReport};
