//! simstudy CLI - build balanced, duplicate-free question sets for
//! similarity user studies.
//!
//! # Usage
//!
//! ```bash
//! # Draw a stratified sample from the candidate pool
//! simstudy sample --input pool.csv --output sample.csv --seed 42
//!
//! # Replace semantic duplicates in the sample
//! simstudy dedup --input sample.csv --verb-sim verb_sim.csv \
//!     --object-sim object_sim.csv --output sample_unique.csv
//!
//! # Render the annotation questions
//! simstudy questions --input sample_unique.csv --output questions.json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// simstudy - stratified sampling and duplicate resolution for similarity user studies.
#[derive(Parser, Debug)]
#[command(name = "simstudy")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file (defaults to the per-user config location)
    #[arg(long, global = true, env = "SIMSTUDY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Draw a stratified, duplicate-free sample from a candidate pool
    Sample(cli::sample::SampleArgs),

    /// Replace rows whose signature repeats an earlier row
    Dedup(cli::dedup::DedupArgs),

    /// List rows that share a signature
    Check(cli::check::CheckArgs),

    /// Show the category × similarity-level distribution
    Stats(cli::stats::StatsArgs),

    /// Render annotation questions as JSON
    Questions(cli::questions::QuestionsArgs),

    /// Attach verb and object synsets to a ground-truth table
    MapSynsets(cli::map_synsets::MapSynsetsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = cli::load_config(cli.config.as_deref())?;
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("simstudy v{}", simstudy_core::VERSION);

    match cli.command {
        Commands::Sample(args) => cli::sample::execute(args, config),
        Commands::Dedup(args) => cli::dedup::execute(args, config),
        Commands::Check(args) => cli::check::execute(args),
        Commands::Stats(args) => cli::stats::execute(args),
        Commands::Questions(args) => cli::questions::execute(args, &config),
        Commands::MapSynsets(args) => cli::map_synsets::execute(args),
        Commands::Config(args) => cli::config::execute(args, cli.config.as_deref(), &config),
    }
}
