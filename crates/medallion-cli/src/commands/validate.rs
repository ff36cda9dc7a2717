//! Validate command - ingest a raw file and print its quality report.

use std::path::PathBuf;

use colored::Colorize;
use medallion::{Ingestor, QualityChecker};

pub fn run(file: PathBuf, json: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let (bronze, ingest) = Ingestor::new().read_file(&file)?;
    let report = QualityChecker::new().check(&bronze);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Validated".cyan().bold(),
        file.display().to_string().white()
    );
    println!(
        "{} rows, {} columns, {} rejected lines",
        ingest.rows_loaded.to_string().white().bold(),
        ingest.column_count.to_string().white().bold(),
        ingest.rows_rejected.to_string().yellow()
    );
    println!(
        "Duplicates: {} full rows, {} encounter ids",
        report.duplicates.duplicate_rows.to_string().yellow(),
        report.duplicates.duplicate_encounter_ids.to_string().yellow()
    );
    println!(
        "Violations: {} age, {} time_in_hospital, {} gender",
        (report.age.invalid_format + report.age.out_of_bounds)
            .to_string()
            .yellow(),
        (report.time_in_hospital.non_numeric + report.time_in_hospital.out_of_range)
            .to_string()
            .yellow(),
        report.gender.invalid_count.to_string().yellow()
    );

    if verbose {
        println!();
        println!("{}", "Missing values by column:".yellow().bold());
        for col in &report.missing_by_column {
            println!(
                "  {:30} {:8} ({:.2}%)",
                col.column,
                col.missing_count,
                col.missing_pct * 100.0
            );
        }
    }

    Ok(())
}
