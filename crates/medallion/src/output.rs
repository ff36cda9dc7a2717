//! Artifact persistence.
//!
//! The engine produces pure values; this module is the swappable boundary
//! that writes them to disk as flat CSV snapshots and JSON reports.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MedallionError, Result};
use crate::input::BronzeTable;
use crate::pipeline::PipelineRun;
use crate::summary::SummaryBundle;
use crate::transform::SilverTable;

/// Structured record describing the silver export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SilverExportReport {
    pub rows: usize,
    pub columns: usize,
    pub csv_path: PathBuf,
}

/// Paths written by one persistence pass.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub bronze_csv: PathBuf,
    pub silver_csv: PathBuf,
    pub ingestion_report: PathBuf,
    pub quality_report: PathBuf,
    pub silver_export_report: PathBuf,
    pub summary_files: Vec<PathBuf>,
}

/// Writes pipeline artifacts under a data directory and a report directory.
pub struct ArtifactWriter {
    data_dir: PathBuf,
    report_dir: PathBuf,
}

impl ArtifactWriter {
    /// Create a writer rooted at the given directories.
    pub fn new(data_dir: impl Into<PathBuf>, report_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            report_dir: report_dir.into(),
        }
    }

    /// Persist every artifact of a run.
    pub fn persist(&self, run: &PipelineRun) -> Result<ArtifactPaths> {
        let bronze_dir = self.data_dir.join("bronze");
        let silver_dir = self.data_dir.join("silver");
        let dq_dir = self.report_dir.join("data_quality");
        for dir in [&bronze_dir, &silver_dir, &self.report_dir, &dq_dir] {
            ensure_dir(dir)?;
        }

        let bronze_csv = bronze_dir.join("encounters_bronze.csv");
        write_bronze_csv(&run.bronze, &bronze_csv)?;

        let silver_csv = silver_dir.join("encounters_silver.csv");
        write_silver_csv(&run.silver, &silver_csv)?;

        let ingestion_report = dq_dir.join("ingestion_report.json");
        write_json(&run.ingest_report, &ingestion_report)?;

        let quality_report = dq_dir.join("data_quality_report.json");
        write_json(&run.quality_report, &quality_report)?;

        let silver_export_report = self.report_dir.join("silver_export_report.json");
        write_json(
            &SilverExportReport {
                rows: run.silver.row_count(),
                columns: run.silver.column_count(),
                csv_path: silver_csv.clone(),
            },
            &silver_export_report,
        )?;

        let summary_files = write_summaries(&run.summaries, &self.report_dir)?;

        Ok(ArtifactPaths {
            bronze_csv,
            silver_csv,
            ingestion_report,
            quality_report,
            silver_export_report,
            summary_files,
        })
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        MedallionError::Persistence(format!("Failed to create directory '{}': {}", dir.display(), e))
    })
}

/// Write a bronze snapshot as flat CSV; nulls render empty.
pub fn write_bronze_csv(table: &BronzeTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|c| c.as_deref().unwrap_or_default()))?;
    }
    writer.flush().map_err(|e| MedallionError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write the silver table as flat CSV; nulls render empty.
pub fn write_silver_csv(table: &SilverTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|c| c.render()))?;
    }
    writer.flush().map_err(|e| MedallionError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write any serializable report as pretty-printed JSON.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        MedallionError::Persistence(format!("Failed to create file '{}': {}", path.display(), e))
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)?;
    Ok(())
}

/// Write the four summary tables with their fixed column schemas.
pub fn write_summaries(bundle: &SummaryBundle, dir: &Path) -> Result<Vec<PathBuf>> {
    let overall_path = dir.join("summary_overall_metrics.csv");
    let mut writer = csv::Writer::from_path(&overall_path)?;
    writer.write_record([
        "n_encounters",
        "n_unique_patients",
        "mean_length_of_stay_days",
        "median_length_of_stay_days",
        "mean_num_medications",
        "readmission_rate_any",
        "readmission_rate_30d",
    ])?;
    let o = &bundle.overall;
    writer.write_record([
        o.n_encounters.to_string(),
        o.n_unique_patients.to_string(),
        render_float(o.mean_length_of_stay_days),
        render_float(o.median_length_of_stay_days),
        render_float(o.mean_num_medications),
        render_float(o.readmission_rate_any),
        render_float(o.readmission_rate_30d),
    ])?;
    writer.flush().map_err(|e| MedallionError::Io {
        path: overall_path.clone(),
        source: e,
    })?;

    let age_path = dir.join("readmission_by_age.csv");
    write_group_csv(&age_path, "age", &bundle.by_age)?;

    let insulin_path = dir.join("readmission_by_insulin.csv");
    write_group_csv(&insulin_path, "insulin", &bundle.by_insulin)?;

    let rg_path = dir.join("race_gender_summary.csv");
    let mut writer = csv::Writer::from_path(&rg_path)?;
    writer.write_record(["race", "gender", "n_encounters", "mean_los_days", "readmission_rate"])?;
    for group in &bundle.by_race_gender {
        writer.write_record([
            group.race.clone().unwrap_or_default(),
            group.gender.clone().unwrap_or_default(),
            group.n_encounters.to_string(),
            render_float(group.mean_los_days),
            render_float(group.readmission_rate),
        ])?;
    }
    writer.flush().map_err(|e| MedallionError::Io {
        path: rg_path.clone(),
        source: e,
    })?;

    Ok(vec![overall_path, age_path, insulin_path, rg_path])
}

fn write_group_csv(
    path: &Path,
    key_name: &str,
    groups: &[crate::summary::GroupSummary],
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([key_name, "n_encounters", "readmission_rate"])?;
    for group in groups {
        writer.write_record([
            group.key.clone().unwrap_or_default(),
            group.n_encounters.to_string(),
            render_float(group.readmission_rate),
        ])?;
    }
    writer.flush().map_err(|e| MedallionError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn render_float(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
