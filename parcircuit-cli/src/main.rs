//! parcircuit CLI - Command-line interface
//!
//! Evaluates boolean circuits with the parallel solver, runs randomized
//! stress tests against the sequential reference solver, and manages the
//! configuration file.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::common::GlobalOptions;
use commands::config::ConfigCommands;
use commands::eval::EvalArgs;
use commands::stress::StressArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "parcircuit")]
#[command(version = parcircuit::VERSION)]
#[command(about = "Evaluate boolean circuits concurrently with short-circuiting", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.parcircuit/config.ini)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Worker threads, overriding the configuration file
    #[arg(long, global = true, value_name = "N")]
    workers: Option<usize>,

    /// Log solver decisions at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single circuit expression
    Eval(EvalArgs),

    /// Solve many random circuits and cross-check the results
    Stress(StressArgs),

    /// Manage the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        e.exit();
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let options = GlobalOptions {
        config_path: cli
            .config
            .unwrap_or_else(parcircuit::config::config_file_path),
        workers: cli.workers,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Eval(args) => commands::eval::run(args, &options),
        Commands::Stress(args) => commands::stress::run(args, &options),
        Commands::Config(command) => commands::config::run(command, &options),
    }
}
