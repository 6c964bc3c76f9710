//! Error types for CLI operations.

use std::path::Path;

use contracts::ContractError;
use sensor::SensorError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Export target format could not be determined
    #[error("Cannot determine export format for '{target}', pass --format")]
    UnknownExportFormat { target: String },

    /// Loading or converting the configuration failed
    #[error(transparent)]
    Config(#[from] ContractError),

    /// Spawning the rig failed
    #[error("Failed to spawn sensor rig: {0}")]
    Spawn(#[from] SensorError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: &Path) -> Self {
        Self::ConfigNotFound {
            path: path.display().to_string(),
        }
    }

    pub fn unknown_export_format(target: impl Into<String>) -> Self {
        Self::UnknownExportFormat {
            target: target.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
