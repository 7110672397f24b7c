//! Error types for PartCatalog.
//!
//! Library crates use [`PartCatalogError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all PartCatalog operations.
#[derive(Debug, thiserror::Error)]
pub enum PartCatalogError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Brace imbalance or other structural corruption in a config file.
    #[error("unparseable block at line {line}: {message}")]
    Unparseable { line: usize, message: String },

    /// A `PART` block without a usable `name` attribute.
    #[error("part block at line {line} has no name")]
    MissingIdentifier { line: usize },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad option values, invalid paths, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PartCatalogError>;

impl PartCatalogError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a structural parse error at the given 1-based line.
    pub fn unparseable(line: usize, msg: impl Into<String>) -> Self {
        Self::Unparseable {
            line,
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
