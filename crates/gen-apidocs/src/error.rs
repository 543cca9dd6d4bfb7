//! Typed error enum for the `gen-apidocs` library API.
//!
//! Library consumers can match on specific variants. The CLI (`main.rs`)
//! converts these to `anyhow::Error` at the binary boundary for richer
//! context messages.

use std::path::PathBuf;

/// Errors produced by `gen-apidocs` library operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// File I/O failure outside a specific output file (creating output
    /// directories, reading the config).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing failure (project config).
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization failure (navigation data).
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The API model failed to load or validate.
    #[error(transparent)]
    Model(#[from] apidocs_core::ModelError),

    /// A static section file exists but could not be read or copied.
    #[error("failed to copy static file {}: {source}", path.display())]
    StaticFile {
        /// Source path under the sections directory.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An output file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the library's public API.
pub type Result<T> = std::result::Result<T, Error>;
