//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[solver]
; Worker threads used by the parallel solver (default: number of CPU cores)
; Leave empty to use every core.
worker_threads = {}
; Name given to the worker threads (visible in top, ps and debuggers)
thread_name = {}
; How long stop() waits for worker threads to exit, in milliseconds
shutdown_timeout_ms = {}

[logging]
; Directory for the log file (~ is expanded)
directory = {}
; Log file name, cleared at the start of every session
file = {}
"#,
        config.solver.worker_threads,
        config.solver.thread_name,
        config.solver.shutdown_timeout_ms,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Convert a path to a string, replacing the home directory with `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
