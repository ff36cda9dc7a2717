//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Medallion: bronze → silver curation pipeline for hospital encounters
#[derive(Parser)]
#[command(name = "medallion")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline and write every artifact
    Run {
        /// Data directory holding raw/ and receiving bronze/ and silver/
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Directory receiving reports and summary tables
        #[arg(long, default_value = "reports")]
        report_dir: PathBuf,

        /// Raw encounter file (default: <data-dir>/raw/diabetic_data.csv)
        #[arg(long)]
        encounters: Option<PathBuf>,

        /// Raw lookup file (default: <data-dir>/raw/ids_mapping.csv)
        #[arg(long)]
        lookups: Option<PathBuf>,
    },

    /// Ingest a raw encounter file and print its quality report only
    Validate {
        /// Path to the raw encounter file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },
}
