//! Error types for engine operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur inside the storage engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// I/O error while reading or writing a store file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Record payload could not be encoded or decoded.
    #[error("codec error: {message}")]
    Codec {
        /// Description of the codec failure.
        message: String,
    },

    /// A model name was used that the container's schema does not declare.
    #[error("model not in schema: {model}")]
    SchemaViolation {
        /// The offending model name.
        model: String,
    },

    /// The schema itself is invalid (for example, duplicate model names).
    #[error("invalid schema: {message}")]
    InvalidSchema {
        /// Description of the schema problem.
        message: String,
    },

    /// No physical store is registered for the given path.
    #[error("store not found: {path}")]
    StoreNotFound {
        /// The path that did not resolve to a store.
        path: PathBuf,
    },

    /// The physical store has been destroyed; writes are no longer accepted.
    #[error("store destroyed: {path}")]
    StoreDestroyed {
        /// Path of the destroyed store.
        path: PathBuf,
    },

    /// The store file exists but does not contain a valid store document.
    #[error("invalid store file: {message}")]
    InvalidStoreFile {
        /// Description of the format issue.
        message: String,
    },
}

impl EngineError {
    /// Creates a codec error from any displayable cause.
    pub fn codec(cause: impl std::fmt::Display) -> Self {
        Self::Codec {
            message: cause.to_string(),
        }
    }

    /// Creates a schema violation error.
    pub fn schema_violation(model: impl Into<String>) -> Self {
        Self::SchemaViolation {
            model: model.into(),
        }
    }

    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            message: message.into(),
        }
    }

    /// Creates an invalid store file error.
    pub fn invalid_store_file(message: impl Into<String>) -> Self {
        Self::InvalidStoreFile {
            message: message.into(),
        }
    }
}
