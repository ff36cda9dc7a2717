//! Run command - execute the full pipeline and persist every artifact.

use std::path::PathBuf;

use colored::Colorize;
use medallion::{ArtifactWriter, Pipeline, PipelineConfig};

pub fn run(
    data_dir: PathBuf,
    report_dir: PathBuf,
    encounters: Option<PathBuf>,
    lookups: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let encounters_path = encounters.unwrap_or_else(|| data_dir.join("raw/diabetic_data.csv"));
    let lookups_path = lookups.unwrap_or_else(|| data_dir.join("raw/ids_mapping.csv"));

    if !encounters_path.exists() {
        return Err(format!("Encounter file not found: {}", encounters_path.display()).into());
    }
    if !lookups_path.exists() {
        return Err(format!("Lookup file not found: {}", lookups_path.display()).into());
    }

    println!(
        "{} {}",
        "Ingesting".cyan().bold(),
        encounters_path.display().to_string().white()
    );

    let config = PipelineConfig {
        encounters_path,
        lookups_path,
        ingest: Default::default(),
    };
    let run = Pipeline::new(config).run()?;

    let ingest = &run.ingest_report;
    println!(
        "Loaded {} rows, {} columns ({} rejected)",
        ingest.rows_loaded.to_string().white().bold(),
        ingest.column_count.to_string().white().bold(),
        ingest.rows_rejected.to_string().yellow()
    );
    println!(
        "Resolved {} lookup entries ({} duplicate keys ignored)",
        run.lookups.len().to_string().white().bold(),
        run.lookups.duplicate_keys.to_string().yellow()
    );

    let quality = &run.quality_report;
    println!(
        "Quality: {} logical violations, {} duplicate rows, {} duplicate encounter ids",
        quality.total_violations().to_string().yellow().bold(),
        quality.duplicates.duplicate_rows.to_string().yellow(),
        quality.duplicates.duplicate_encounter_ids.to_string().yellow()
    );

    if verbose {
        println!();
        println!("{}", "Missing values by column:".yellow().bold());
        for col in &quality.missing_by_column {
            if col.missing_count > 0 {
                println!(
                    "  {:30} {:8} ({:.2}%)",
                    col.column,
                    col.missing_count,
                    col.missing_pct * 100.0
                );
            }
        }
        println!();
    }

    println!(
        "Transformed {} rows into {} silver columns",
        run.silver.row_count().to_string().white().bold(),
        run.silver.column_count().to_string().white().bold()
    );

    let writer = ArtifactWriter::new(&data_dir, &report_dir);
    let paths = writer.persist(&run)?;

    println!();
    println!("{}", "Artifacts written:".green().bold());
    println!("  {}", paths.bronze_csv.display());
    println!("  {}", paths.silver_csv.display());
    println!("  {}", paths.ingestion_report.display());
    println!("  {}", paths.quality_report.display());
    println!("  {}", paths.silver_export_report.display());
    for path in &paths.summary_files {
        println!("  {}", path.display());
    }

    Ok(())
}
