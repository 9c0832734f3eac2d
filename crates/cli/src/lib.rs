pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "artisan",
    about = "Artisan marketplace operator CLI",
    long_about = "Run the recommendation and search engines over the sample catalog, inspect configuration, and validate runtime readiness.",
    after_help = "Examples:\n  artisan recommend --strategy trending\n  artisan search ceramic --limit 5 --json\n  artisan doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Generate recommendations over the sample catalog")]
    Recommend {
        #[arg(long, default_value = "hybrid", help = "collaborative|content|trending|location|hybrid")]
        strategy: String,
        #[arg(long, default_value = "USA", help = "Location substring for the location strategy")]
        location: String,
        #[arg(long, help = "Seed for the randomized fields (confidence, location fallback)")]
        seed: Option<u64>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Run the multi-strategy search engine against the sample catalog")]
    Search {
        #[arg(help = "Free-text query")]
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long, help = "Restrict to one category before scoring")]
        category: Option<String>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution"
    )]
    Config,
    #[command(about = "Validate config and catalog integrity checks")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Recommend { strategy, location, seed, json } => {
            commands::recommend::run(&strategy, &location, seed, json)
        }
        Command::Search { query, limit, category, json } => {
            commands::search::run(&query, limit, category.as_deref(), json)
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
