//! Setup shared by the solving commands.

use std::path::PathBuf;
use std::sync::Arc;

use parcircuit::config::ConfigFile;
use parcircuit::logging::{init_logging_with_filter, LoggingGuard};
use parcircuit::solver::{ParallelSolver, TracingTelemetrySink};

use crate::error::CliError;

/// Options accepted by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub config_path: PathBuf,
    pub workers: Option<usize>,
    pub verbose: bool,
}

impl GlobalOptions {
    /// Loads the configuration file and applies command-line overrides.
    pub fn load_config(&self) -> Result<ConfigFile, CliError> {
        let mut config = ConfigFile::load_from(&self.config_path)?;
        if let Some(workers) = self.workers {
            config.solver.worker_threads = parcircuit::config::clamp_worker_threads(workers);
        }
        Ok(config)
    }
}

/// Everything a solving command needs, kept alive for the command's duration.
pub struct SolverSession {
    pub solver: ParallelSolver,
    _logging: LoggingGuard,
}

impl SolverSession {
    /// Loads configuration, starts logging and builds the solver.
    pub fn start(options: &GlobalOptions) -> Result<Self, CliError> {
        let config = options.load_config()?;

        let filter = if options.verbose { "parcircuit=debug" } else { "warn" };
        let logging =
            init_logging_with_filter(&config.logging.directory, &config.logging.file, filter)
                .map_err(CliError::LoggingInit)?;

        let solver = ParallelSolver::new(config.to_solver_config())?
            .with_telemetry(Arc::new(TracingTelemetrySink));

        Ok(Self {
            solver,
            _logging: logging,
        })
    }
}
