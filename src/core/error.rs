//! Error types and canonical status mapping.
//!
//! Store operations report expected run-time conditions (duplicate submission,
//! missing key, lost CAS race, unsupported operation) through [`StoreError`].
//! Contract violations are deliberately absent from this type; see
//! [`crate::store::guards`].

use crate::coord::CoordError;
use crate::store::codec::CodecError;
use thiserror::Error;

/// Recoverable store error conditions.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key already holds a record. For `add_pending_entry` this is the
    /// de-duplication outcome and the caller's entry has been replaced with
    /// the stored one.
    #[error("already exists: {key}")]
    AlreadyExists { key: String },

    /// No record at the key.
    #[error("not found: {key}")]
    NotFound { key: String },

    /// A concurrent writer won a compare-and-swap race. Retry with a fresh read.
    #[error("aborted at {key}: {reason}")]
    Aborted { key: String, reason: String },

    /// The operation belongs to a different coordinator.
    #[error("{operation}: not implemented")]
    Unimplemented { operation: &'static str },

    /// A stored record could not be decoded.
    #[error("corrupt record at {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: CodecError,
    },

    /// A value could not be encoded for storage.
    #[error("failed to encode value for {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: CodecError,
    },

    /// Coordination service failure, passed through unchanged.
    #[error(transparent)]
    Coordination(#[from] CoordError),
}

/// Canonical status categories returned to store callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Ok,
    NotFound,
    AlreadyExists,
    Aborted,
    Unimplemented,
    Unavailable,
    DataLoss,
    Internal,
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Ok => "OK",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::Aborted => "ABORTED",
            Self::Unimplemented => "UNIMPLEMENTED",
            Self::Unavailable => "UNAVAILABLE",
            Self::DataLoss => "DATA_LOSS",
            Self::Internal => "INTERNAL",
        };
        f.write_str(name)
    }
}

impl StoreError {
    /// Create an Aborted error.
    pub fn aborted(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Aborted {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Map to the canonical status category.
    pub fn code(&self) -> StatusCode {
        match self {
            Self::AlreadyExists { .. } => StatusCode::AlreadyExists,
            Self::NotFound { .. } => StatusCode::NotFound,
            Self::Aborted { .. } => StatusCode::Aborted,
            Self::Unimplemented { .. } => StatusCode::Unimplemented,
            Self::Corrupt { .. } => StatusCode::DataLoss,
            Self::Encode { .. } => StatusCode::Internal,
            Self::Coordination(err) => match err {
                CoordError::KeyExists { .. } => StatusCode::AlreadyExists,
                CoordError::KeyNotFound { .. } => StatusCode::NotFound,
                CoordError::CompareFailed { .. } => StatusCode::Aborted,
                CoordError::Unavailable { .. } => StatusCode::Unavailable,
            },
        }
    }

    /// Check if the caller may retry after re-reading state.
    pub fn is_retriable(&self) -> bool {
        matches!(self.code(), StatusCode::Aborted | StatusCode::Unavailable)
    }
}

/// Result type using StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

/// Canonical status of a store result, `Ok` on success.
pub fn status_of<T>(result: &StoreResult<T>) -> StatusCode {
    match result {
        Ok(_) => StatusCode::Ok,
        Err(err) => err.code(),
    }
}
