//! CLI command implementations.
//!
//! # Command Modules
//!
//! - [`common`] - Shared setup (configuration, logging, solver)
//! - [`config`] - Configuration management (init, show, path)
//! - [`eval`] - Evaluate one circuit expression
//! - [`stress`] - Randomized load and cross-check runs

pub mod common;
pub mod config;
pub mod eval;
pub mod stress;
