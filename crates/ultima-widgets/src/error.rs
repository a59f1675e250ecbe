//! Error types for widget configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating menu configuration.
#[derive(Debug, Error)]
pub enum MenuError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML for this schema.
    #[error("invalid menu config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A field parsed but holds an unusable value.
    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// What is wrong with it
        message: String,
    },
}

/// Result alias for configuration operations.
pub type MenuResult<T> = Result<T, MenuError>;
