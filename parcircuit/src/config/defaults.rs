//! Default values and constants for all configuration settings.
//!
//! Contains the `DEFAULT_*` constants, the CPU-aware worker default, clamp
//! helpers and the `ConfigFile::default()` implementation.

use super::file::config_directory;
use super::settings::*;
use crate::solver::{DEFAULT_SHUTDOWN_TIMEOUT, DEFAULT_THREAD_NAME};

// =============================================================================
// CPU helpers
// =============================================================================

/// Get the number of available CPU cores.
pub fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Clamps a worker thread count to the supported range, logging if clamped.
pub fn clamp_worker_threads(value: usize) -> usize {
    if value < MIN_WORKER_THREADS {
        tracing::warn!(
            requested = value,
            min = MIN_WORKER_THREADS,
            "worker_threads below minimum, clamping to {}",
            MIN_WORKER_THREADS
        );
        MIN_WORKER_THREADS
    } else if value > MAX_WORKER_THREADS {
        tracing::warn!(
            requested = value,
            max = MAX_WORKER_THREADS,
            "worker_threads above maximum, clamping to {}",
            MAX_WORKER_THREADS
        );
        MAX_WORKER_THREADS
    } else {
        value
    }
}

// =============================================================================
// Solver limits
// =============================================================================

/// Minimum number of solver worker threads.
pub const MIN_WORKER_THREADS: usize = 1;

/// Maximum number of solver worker threads.
pub const MAX_WORKER_THREADS: usize = 512;

/// Default solver shutdown timeout in milliseconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_MS: u64 = DEFAULT_SHUTDOWN_TIMEOUT.as_millis() as u64;

// =============================================================================
// Logging
// =============================================================================

/// Default log directory name, relative to the config directory.
pub const DEFAULT_LOG_DIRECTORY: &str = "logs";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "parcircuit.log";

// =============================================================================
// ConfigFile defaults
// =============================================================================

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            solver: SolverSettings {
                worker_threads: num_cpus(),
                thread_name: DEFAULT_THREAD_NAME.to_string(),
                shutdown_timeout_ms: DEFAULT_SHUTDOWN_TIMEOUT_MS,
            },
            logging: LoggingSettings {
                directory: config_directory().join(DEFAULT_LOG_DIRECTORY),
                file: DEFAULT_LOG_FILE.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_cpus_positive() {
        assert!(num_cpus() >= 1);
    }

    #[test]
    fn test_clamp_worker_threads() {
        assert_eq!(clamp_worker_threads(0), MIN_WORKER_THREADS);
        assert_eq!(clamp_worker_threads(8), 8);
        assert_eq!(clamp_worker_threads(100_000), MAX_WORKER_THREADS);
    }

    #[test]
    fn test_default_shutdown_timeout_ms() {
        assert_eq!(DEFAULT_SHUTDOWN_TIMEOUT_MS, 5_000);
    }
}
