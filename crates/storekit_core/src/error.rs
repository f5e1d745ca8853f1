//! Error types for the utility layer.

use storekit_engine::EngineError;
use thiserror::Error;

/// Result type for utility-layer operations.
pub type UtilResult<T> = Result<T, UtilError>;

/// Errors surfaced by the utility layer.
///
/// Advisory read paths (store-file metadata lookups) never surface
/// errors; they log and return empty. Everything else is typed here.
#[derive(Debug, Error)]
pub enum UtilError {
    /// The container or context could not be constructed.
    ///
    /// Never retried internally; the descriptor's configuration (path,
    /// schema, permissions) needs fixing first.
    #[error("storage unavailable: {reason}")]
    StorageUnavailable {
        /// Why construction failed.
        reason: String,
    },

    /// The engine rejected a commit.
    ///
    /// Retry policy is the caller's decision.
    #[error("commit failed: {source}")]
    CommitFailed {
        /// The engine's rejection.
        #[source]
        source: EngineError,
    },

    /// A persistent identifier did not match the expected internal
    /// encoding.
    ///
    /// This signals that the engine's identifier contract changed; it
    /// must never be silently swallowed.
    #[error("identifier decode failed: unexpected position marker in {encoded}")]
    IdentifierDecode {
        /// The identifier's encoded form.
        encoded: String,
    },

    /// A metadata write could not locate its store.
    #[error("metadata write failed: {reason}")]
    MetadataWrite {
        /// Why the write failed.
        reason: String,
    },

    /// Any other engine failure.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl UtilError {
    /// Creates a storage-unavailable error.
    pub fn storage_unavailable(reason: impl std::fmt::Display) -> Self {
        Self::StorageUnavailable {
            reason: reason.to_string(),
        }
    }

    /// Creates a commit-failed error.
    pub fn commit_failed(source: EngineError) -> Self {
        Self::CommitFailed { source }
    }

    /// Creates an identifier-decode error.
    pub fn identifier_decode(encoded: impl Into<String>) -> Self {
        Self::IdentifierDecode {
            encoded: encoded.into(),
        }
    }

    /// Creates a metadata-write error.
    pub fn metadata_write(reason: impl std::fmt::Display) -> Self {
        Self::MetadataWrite {
            reason: reason.to_string(),
        }
    }
}
