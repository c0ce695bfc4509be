//! Structured error types.
//!
//! Messages are shown as-is in both the CLI and the TUI status bar.

use std::path::PathBuf;

use thiserror::Error;

use crate::feed::DataSet;

/// Errors raised while reading or parsing one of the engine's CSV files.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{dataset}: unreadable header row: {message}")]
    BadHeader { dataset: DataSet, message: String },

    #[error("{dataset}: missing required column '{column}'")]
    MissingColumn {
        dataset: DataSet,
        column: &'static str,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv encoding error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised while loading the dashboard configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
