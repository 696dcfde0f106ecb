//! Structured error types for recipectl-core.
//!
//! Uses `thiserror` so library consumers get composable errors.
//! The `recipectl` binary wraps these with `anyhow` context.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for recipectl-core operations
#[derive(Error, Debug)]
pub enum RecipeError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON parsing or serialization failed
    #[error("JSON error at {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// Config file is not valid TOML or has the wrong shape
    #[error("Invalid config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Config could not be serialized
    #[error("Failed to serialize config: {source}")]
    ConfigWrite {
        #[from]
        source: toml::ser::Error,
    },

    /// Input is not in the expected layout
    #[error("Invalid format in {context}: {reason}")]
    InvalidFormat { context: String, reason: String },

    /// File or directory not found
    #[error("Path not found: {path:?}")]
    PathNotFound { path: PathBuf },
}

/// Result type alias for recipectl-core operations
pub type Result<T> = std::result::Result<T, RecipeError>;

impl RecipeError {
    /// Create a JSON error with context
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid format error
    pub fn invalid_format(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Create a path not found error
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        Self::PathNotFound { path: path.into() }
    }
}
