//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::defaults::clamp_worker_threads;
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [solver] section
    if let Some(section) = ini.section(Some("solver")) {
        if let Some(v) = section.get("worker_threads") {
            let v = v.trim();
            // Empty means "use every core".
            if !v.is_empty() {
                let threads: usize = v.parse().map_err(|_| {
                    invalid("solver", "worker_threads", v, "expected a positive integer")
                })?;
                config.solver.worker_threads = clamp_worker_threads(threads);
            }
        }
        if let Some(v) = section.get("thread_name") {
            let v = v.trim();
            if v.is_empty() {
                return Err(invalid("solver", "thread_name", v, "must not be empty"));
            }
            config.solver.thread_name = v.to_string();
        }
        if let Some(v) = section.get("shutdown_timeout_ms") {
            let v = v.trim();
            config.solver.shutdown_timeout_ms = v.parse().map_err(|_| {
                invalid("solver", "shutdown_timeout_ms", v, "expected milliseconds as an integer")
            })?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if v.is_empty() || v.contains(['/', '\\']) {
                return Err(invalid("logging", "file", v, "expected a plain file name"));
            }
            config.logging.file = v.to_string();
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a leading `~/` to the user's home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
