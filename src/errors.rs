// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PycifyError {
    /// The requested Python version could not be found locally or downloaded.
    #[error("Python {version} is not available for download")]
    RuntimeNotAvailable { version: String },

    /// `python -m compileall` exited with a non-zero status.
    #[error(
        "compileall failed with exit code {}",
        .status.map_or_else(|| "<signal>".to_string(), |c| c.to_string())
    )]
    CompileFailed {
        status: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error(
        "cache folder {} holds {} unexpected entries; use --force-remove-cache to delete them",
        .path.display(),
        .leftovers.len()
    )]
    CacheNotEmpty {
        path: PathBuf,
        leftovers: Vec<PathBuf>,
    },

    #[error("invalid ignore pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid Python version: {0}")]
    InvalidVersion(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PycifyError>;
