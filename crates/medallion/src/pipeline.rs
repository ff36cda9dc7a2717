//! Pipeline orchestration: raw files → bronze → {report, silver} → summaries.

use std::path::PathBuf;

use crate::error::Result;
use crate::input::{BronzeTable, IngestConfig, IngestReport, Ingestor};
use crate::lookup::{LookupParser, LookupTables};
use crate::summary::{Summarizer, SummaryBundle};
use crate::transform::{SilverTable, Transformer};
use crate::validate::{QualityChecker, QualityReport};

/// Configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Raw encounter file.
    pub encounters_path: PathBuf,
    /// Heterogeneous lookup file.
    pub lookups_path: PathBuf,
    /// Ingestion settings.
    pub ingest: IngestConfig,
}

/// Everything one run produces. Each artifact is created once and never
/// mutated; nothing here gates anything else.
#[derive(Debug)]
pub struct PipelineRun {
    pub bronze: BronzeTable,
    pub lookups: LookupTables,
    pub ingest_report: IngestReport,
    pub quality_report: QualityReport,
    pub silver: SilverTable,
    pub summaries: SummaryBundle,
}

/// Runs all stages in dependency order.
///
/// The validator is advisory: its report never filters rows or blocks the
/// transform. A run either completes every stage or aborts on a fatal
/// structural error (unreadable input, zero columns, headerless lookup).
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline with the given configuration.
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Execute ingest → {validate, transform} → summarize.
    pub fn run(&self) -> Result<PipelineRun> {
        let ingestor = Ingestor::with_config(self.config.ingest.clone());
        let (bronze, ingest_report) = ingestor.read_file(&self.config.encounters_path)?;

        let lookups = LookupParser::new().parse_file(&self.config.lookups_path)?;

        // Validator and transformer both read bronze independently.
        let quality_report = QualityChecker::new().check(&bronze);
        let silver = Transformer::new(&lookups).transform(&bronze);

        let summaries = Summarizer::new().summarize(&silver);

        Ok(PipelineRun {
            bronze,
            lookups,
            ingest_report,
            quality_report,
            silver,
            summaries,
        })
    }
}
