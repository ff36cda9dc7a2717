//! Medallion CLI - bronze → silver curation pipeline.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            data_dir,
            report_dir,
            encounters,
            lookups,
        } => commands::run::run(data_dir, report_dir, encounters, lookups, cli.verbose),

        Commands::Validate { file, json } => commands::validate::run(file, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
