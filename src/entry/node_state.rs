//! Cluster node progress records.

use serde::{Deserialize, Serialize};

/// A signed commitment to the log's Merkle tree at some size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTreeHead {
    pub version: u32,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub tree_size: u64,
    pub sha256_root_hash: Vec<u8>,
    pub signature: Vec<u8>,
}

/// Progress and health report of one node in the cluster.
///
/// Each node owns exactly one record and overwrites it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterNodeState {
    pub node_id: String,
    /// Number of sequenced entries this node holds without gaps.
    pub contiguous_tree_size: u64,
    /// Most recent tree head this node has built.
    pub newest_sth: Option<SignedTreeHead>,
    pub hostname: String,
    pub log_port: u16,
}

impl ClusterNodeState {
    pub fn new(node_id: impl Into<String>, contiguous_tree_size: u64) -> Self {
        Self {
            node_id: node_id.into(),
            contiguous_tree_size,
            ..Default::default()
        }
    }
}
