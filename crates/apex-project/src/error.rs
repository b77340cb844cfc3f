//! Error types for configuration and input validation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors loading the project configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A merge request that does not satisfy the input/output policy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Fewer manifests than a merge needs.
    #[error("inform at least {min} xml files (got {actual})")]
    TooFewInputs { min: usize, actual: usize },

    /// An input path does not name a readable file.
    #[error("{} isn't a valid path or was not found", .path.display())]
    InputNotFound { path: PathBuf },

    /// The output exists and overwriting was not requested.
    #[error("output {} already exists (use --force to replace it)", .path.display())]
    OutputExists { path: PathBuf },
}
