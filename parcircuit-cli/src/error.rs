//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::path::PathBuf;
use std::process;

use parcircuit::circuit::CircuitError;
use parcircuit::config::ConfigFileError;
use parcircuit::solver::SolverError;
use thiserror::Error;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug, Error)]
pub enum CliError {
    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(#[source] std::io::Error),

    /// Configuration file could not be read or written
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigFileError),

    /// `config init` found an existing file
    #[error("Config file already exists: {}", .0.display())]
    ConfigExists(PathBuf),

    /// The circuit expression could not be read
    #[error("Failed to read input: {0}")]
    Input(String),

    /// The circuit expression is invalid
    #[error("Invalid circuit: {0}")]
    Circuit(#[from] CircuitError),

    /// The solver runtime could not be started
    #[error("Failed to start solver: {0}")]
    Solver(#[from] SolverError),

    /// A local runtime for waiting could not be built
    #[error("Failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// The evaluation ended without a value
    #[error("Evaluation was cancelled")]
    Cancelled,

    /// Parallel and sequential solvers disagree
    #[error("Parallel result {parallel} disagrees with sequential result {sequential}")]
    Mismatch { parallel: bool, sequential: bool },

    /// A stress run found problems
    #[error("Stress run failed: {0}")]
    Stress(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::ConfigExists(_) => {
                eprintln!();
                eprintln!("Use 'parcircuit config init --force' to overwrite it.");
            }
            CliError::Circuit(_) => {
                eprintln!();
                eprintln!("Expressions look like: IF(GT(1, true, false@200ms), AND(true, true), false)");
                eprintln!("Gates: NOT, AND, OR, IF, GT(threshold, ...), LT(threshold, ...)");
            }
            _ => {}
        }

        process::exit(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(CliError::Cancelled.to_string(), "Evaluation was cancelled");
        assert_eq!(
            CliError::ConfigExists(PathBuf::from("/tmp/config.ini")).to_string(),
            "Config file already exists: /tmp/config.ini"
        );
        assert_eq!(
            CliError::Mismatch {
                parallel: true,
                sequential: false
            }
            .to_string(),
            "Parallel result true disagrees with sequential result false"
        );
    }

    #[test]
    fn test_circuit_error_conversion() {
        let err: CliError = "AND(".parse::<parcircuit::circuit::Circuit>().unwrap_err().into();
        assert!(err.to_string().starts_with("Invalid circuit: parse error"));
    }
}
