//! User configuration file.
//!
//! `~/.parcircuit/config.ini` holds the solver and logging settings used by
//! the command-line tool. A missing file means defaults; unknown sections
//! and keys are ignored.
//!
//! # Example
//!
//! ```
//! use parcircuit::config::ConfigFile;
//!
//! let dir = tempfile::TempDir::new().unwrap();
//! let path = dir.path().join("config.ini");
//!
//! let mut config = ConfigFile::default();
//! config.solver.worker_threads = 2;
//! config.save_to(&path).unwrap();
//!
//! let loaded = ConfigFile::load_from(&path).unwrap();
//! assert_eq!(loaded.to_solver_config().worker_threads, 2);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    clamp_worker_threads, num_cpus, DEFAULT_LOG_DIRECTORY, DEFAULT_LOG_FILE,
    DEFAULT_SHUTDOWN_TIMEOUT_MS, MAX_WORKER_THREADS, MIN_WORKER_THREADS,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ConfigFile, LoggingSettings, SolverSettings};
