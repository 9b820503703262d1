//! Coordination service client interface.
//!
//! The consistent store keeps all shared state in an etcd-style service:
//! hierarchical keys, one global modification index advanced by every write,
//! and compare-and-swap keyed on that index.
//!
//! - [`memory`] - In-process coordination service
//! - [`dispatch`] - Single-task dispatch loop and cloneable client handle

pub mod dispatch;
pub mod memory;

pub use dispatch::{spawn_memory_coordinator, CoordinatorHandle, CoordinatorLoop};
pub use memory::{CoordinatorStats, MemoryCoordinator};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A key/value record as reported by the coordination service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Full key path.
    pub key: String,
    /// Stored value.
    pub value: String,
    /// Index of the write that created the key.
    pub created_index: u64,
    /// Index of the last write to the key; the CAS version token.
    pub modified_index: u64,
}

/// Coordination service failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordError {
    /// Create on a key that already exists.
    #[error("key already exists: {key} (index {index})")]
    KeyExists { key: String, index: u64 },

    /// Key does not exist.
    #[error("key not found: {key}")]
    KeyNotFound { key: String },

    /// CAS precondition failed.
    #[error("compare failed on {key}: expected index {expected}, found {actual}")]
    CompareFailed {
        key: String,
        expected: u64,
        actual: u64,
    },

    /// Service unreachable or the dispatch loop has stopped.
    #[error("coordination service unavailable: {message}")]
    Unavailable { message: String },
}

impl CoordError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Primitive operations the consistent store is built on.
///
/// Implementations must be usable from many tasks at once. Each call is an
/// independent request; ordering is only guaranteed per key.
#[async_trait]
pub trait CoordinationClient: Send + Sync {
    /// Create `key` if absent. Returns the index of the write.
    async fn create(&self, key: &str, value: &str) -> Result<u64, CoordError>;

    /// Read `key`.
    async fn get(&self, key: &str) -> Result<Node, CoordError>;

    /// Replace the value of `key` if its modified index equals `expected_index`.
    /// Returns the index of the write.
    async fn update(&self, key: &str, value: &str, expected_index: u64)
        -> Result<u64, CoordError>;

    /// Unconditionally write `key`. Returns the index of the write.
    async fn force_set(&self, key: &str, value: &str) -> Result<u64, CoordError>;

    /// Remove `key` if its modified index equals `expected_index`.
    async fn delete(&self, key: &str, expected_index: u64) -> Result<(), CoordError>;

    /// Direct children of `dir`. A directory with no children is empty, not missing.
    async fn list_children(&self, dir: &str) -> Result<Vec<Node>, CoordError>;
}
