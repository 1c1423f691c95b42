//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    /// Solver settings
    pub solver: SolverSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Parallel solver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverSettings {
    /// Number of worker threads
    pub worker_threads: usize,
    /// Worker thread name
    pub thread_name: String,
    /// How long `stop()` waits for worker threads, in milliseconds
    pub shutdown_timeout_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Directory that holds the log file
    pub directory: PathBuf,
    /// Log file name
    pub file: String,
}
