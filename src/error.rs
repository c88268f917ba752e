// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors raised while loading the market table.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The source had no header row at all (empty file or blank lines only).
    #[error("source has no header row")]
    MissingHeader,

    /// A required column is not named in the header.
    #[error("required column '{column}' missing from header")]
    MissingColumn { column: &'static str },

    /// The source file could not be opened.
    #[error("cannot open source {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while reading the header or a row.
    #[error("reading source: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised while reading a YAML config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("delimiter must be a single ASCII character, got {0:?}")]
    Delimiter(char),
}
