mod commands;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::preset::PresetArgs;
use commands::simulate::SimulateArgs;

/// Drug treatment cost simulation under stacked benefit programs
#[derive(Parser)]
#[command(
    name = "dcsim",
    version,
    about = "Drug treatment cost simulation under stacked benefit programs",
    long_about = "Computes the total cost of a drug regimen and the patient's out-of-pocket \
                  cost after a deductible-and-rate coinsurance program and a flat-rate \
                  assistance program, stacked independently or sequentially. Prints the \
                  current figure alongside no-coverage, first-program and all-program \
                  comparison scenarios."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter used when RUST_LOG is unset (e.g. "debug", "drug_cost_core=debug")
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a regimen against the benefit programs
    Simulate(SimulateArgs),
    /// Print the reference regimen as a JSON input document
    Preset(PresetArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(&cli.log_level) {
        eprintln!("{}: {}", "warning".yellow().bold(), e);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Simulate(args) => commands::simulate::run_simulate(args),
        Commands::Preset(args) => commands::preset::run_preset(args),
        Commands::Version => {
            println!("dcsim {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
