//! Configuration file handling for ~/.parcircuit/config.ini.
//!
//! Loads and saves user configuration with sensible defaults.
//! Settings structs live in [`super::settings`], constants in [`super::defaults`],
//! parsing in [`super::parser`], and serialization in [`super::writer`].

use ini::Ini;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use super::settings::ConfigFile;
use crate::solver::SolverConfig;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.parcircuit/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to the default path (~/.parcircuit/config.ini).
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        std::fs::write(path, self.to_ini_string())
            .map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Renders the configuration as the commented INI text `save_to` writes.
    pub fn to_ini_string(&self) -> String {
        super::writer::to_config_string(self)
    }

    /// Builds the solver configuration described by the `[solver]` section.
    pub fn to_solver_config(&self) -> SolverConfig {
        SolverConfig::default()
            .with_worker_threads(self.solver.worker_threads)
            .with_thread_name(self.solver.thread_name.clone())
            .with_shutdown_timeout(Duration::from_millis(self.solver.shutdown_timeout_ms))
    }
}

/// Get the path to the config directory (~/.parcircuit).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".parcircuit")
}

/// Get the path to the config file (~/.parcircuit/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();
        assert_eq!(config.solver.worker_threads, num_cpus());
        assert_eq!(config.solver.thread_name, "parcircuit-worker");
        assert_eq!(config.solver.shutdown_timeout_ms, DEFAULT_SHUTDOWN_TIMEOUT_MS);
        assert_eq!(config.logging.file, DEFAULT_LOG_FILE);
        assert!(config.logging.directory.ends_with(".parcircuit/logs"));
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_creates_parent_and_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.solver.worker_threads = 2;
        config.solver.shutdown_timeout_ms = 100;
        config.save_to(&config_path).unwrap();

        assert!(config_path.exists());
        assert_eq!(ConfigFile::load_from(&config_path).unwrap(), config);
    }

    #[test]
    fn test_load_invalid_value() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, "[solver]\nworker_threads = lots\n").unwrap();

        let err = ConfigFile::load_from(&config_path).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: solver.worker_threads = 'lots' - expected a positive integer"
        );
    }

    #[test]
    fn test_to_solver_config() {
        let mut config = ConfigFile::default();
        config.solver.worker_threads = 3;
        config.solver.thread_name = "pc".to_string();
        config.solver.shutdown_timeout_ms = 1_500;

        let solver = config.to_solver_config();
        assert_eq!(solver.worker_threads, 3);
        assert_eq!(solver.thread_name, "pc");
        assert_eq!(solver.shutdown_timeout, Duration::from_millis(1_500));
    }

    #[test]
    fn test_config_file_path() {
        assert!(config_file_path().ends_with(".parcircuit/config.ini"));
    }
}
