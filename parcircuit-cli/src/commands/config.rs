//! Configuration management CLI commands.
//!
//! Provides `config init`, `config show` and `config path`.

use clap::Subcommand;
use parcircuit::config::ConfigFile;

use super::common::GlobalOptions;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Write a configuration file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration as INI
    Show,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, options: &GlobalOptions) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init { force } => run_init(force, options),
        ConfigCommands::Show => run_show(options),
        ConfigCommands::Path => run_path(options),
    }
}

fn run_init(force: bool, options: &GlobalOptions) -> Result<(), CliError> {
    let path = &options.config_path;
    if path.exists() && !force {
        return Err(CliError::ConfigExists(path.clone()));
    }

    ConfigFile::default().save_to(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn run_show(options: &GlobalOptions) -> Result<(), CliError> {
    let config = options.load_config()?;
    print!("{}", config.to_ini_string());
    Ok(())
}

fn run_path(options: &GlobalOptions) -> Result<(), CliError> {
    println!("{}", options.config_path.display());
    Ok(())
}
