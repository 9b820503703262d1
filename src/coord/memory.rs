//! In-process coordination service.
//!
//! Holds the keyspace in an ordered map with a single global modification
//! index. Every successful write advances the index by one, so the first write
//! to a fresh service lands at index 1. Failed writes leave the index alone.

use super::{CoordError, Node};
use std::collections::BTreeMap;

/// Key/value state with etcd v2 style CAS semantics.
///
/// Not synchronized: one owner (the dispatch loop) drives it.
#[derive(Debug, Default)]
pub struct MemoryCoordinator {
    /// Index of the most recent write.
    current_index: u64,

    /// Key → current record.
    nodes: BTreeMap<String, Node>,
}

impl MemoryCoordinator {
    /// Create an empty coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the most recent write (0 before any write).
    pub fn current_index(&self) -> u64 {
        self.current_index
    }

    fn next_index(&mut self) -> u64 {
        self.current_index += 1;
        self.current_index
    }

    /// Create a key if absent.
    pub fn create(&mut self, key: &str, value: &str) -> Result<u64, CoordError> {
        if let Some(existing) = self.nodes.get(key) {
            return Err(CoordError::KeyExists {
                key: key.to_string(),
                index: existing.modified_index,
            });
        }

        let index = self.next_index();
        self.nodes.insert(
            key.to_string(),
            Node {
                key: key.to_string(),
                value: value.to_string(),
                created_index: index,
                modified_index: index,
            },
        );
        Ok(index)
    }

    /// Read a key.
    pub fn get(&self, key: &str) -> Result<Node, CoordError> {
        self.nodes
            .get(key)
            .cloned()
            .ok_or_else(|| CoordError::KeyNotFound {
                key: key.to_string(),
            })
    }

    /// Compare-and-swap on the modified index.
    pub fn update(
        &mut self,
        key: &str,
        value: &str,
        expected_index: u64,
    ) -> Result<u64, CoordError> {
        let actual = self.modified_index_of(key)?;
        if actual != expected_index {
            return Err(CoordError::CompareFailed {
                key: key.to_string(),
                expected: expected_index,
                actual,
            });
        }

        let index = self.next_index();
        if let Some(node) = self.nodes.get_mut(key) {
            node.value = value.to_string();
            node.modified_index = index;
        }
        Ok(index)
    }

    /// Blind write, creating the key if needed.
    pub fn force_set(&mut self, key: &str, value: &str) -> u64 {
        let index = self.next_index();
        let created_index = self
            .nodes
            .get(key)
            .map(|n| n.created_index)
            .unwrap_or(index);
        self.nodes.insert(
            key.to_string(),
            Node {
                key: key.to_string(),
                value: value.to_string(),
                created_index,
                modified_index: index,
            },
        );
        index
    }

    /// Compare-and-delete on the modified index.
    pub fn delete(&mut self, key: &str, expected_index: u64) -> Result<(), CoordError> {
        let actual = self.modified_index_of(key)?;
        if actual != expected_index {
            return Err(CoordError::CompareFailed {
                key: key.to_string(),
                expected: expected_index,
                actual,
            });
        }

        self.next_index();
        self.nodes.remove(key);
        Ok(())
    }

    /// Direct children of a directory, in key order.
    pub fn list_children(&self, dir: &str) -> Vec<Node> {
        let prefix = format!("{}/", dir.trim_end_matches('/'));
        self.nodes
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter(|(key, _)| !key[prefix.len()..].contains('/'))
            .map(|(_, node)| node.clone())
            .collect()
    }

    /// Check if a key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.nodes.contains_key(key)
    }

    /// Get statistics about the keyspace.
    pub fn stats(&self) -> CoordinatorStats {
        CoordinatorStats {
            current_index: self.current_index,
            key_count: self.nodes.len(),
        }
    }

    fn modified_index_of(&self, key: &str) -> Result<u64, CoordError> {
        self.nodes
            .get(key)
            .map(|n| n.modified_index)
            .ok_or_else(|| CoordError::KeyNotFound {
                key: key.to_string(),
            })
    }
}

/// Statistics for a coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorStats {
    /// Index of the most recent write.
    pub current_index: u64,
    /// Number of live keys.
    pub key_count: usize,
}
