//! Keyspace layout.
//!
//! ```text
//! <root>/unsequenced/<base64url(hash)>   pending entries
//! <root>/sequenced/<sequence_number>     sequenced entries
//! <root>/nodes/<node_id>                 per-node state
//! ```
//!
//! Hashes use the URL-safe base64 alphabet so each one stays a single path
//! segment. Keyspaces that name pending entries with standard base64 differ
//! whenever a hash encodes to `+` or `/`; they cannot be shared with this
//! layout.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;

const UNSEQUENCED: &str = "unsequenced";
const SEQUENCED: &str = "sequenced";
const NODES: &str = "nodes";

/// Maps logical collections to coordination-service keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathScheme {
    root: String,
}

impl PathScheme {
    /// Create a scheme rooted at `root`. Trailing slashes are ignored.
    pub fn new(root: impl Into<String>) -> Self {
        let root = root.into();
        Self {
            root: root.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Key segment for an entry hash.
    pub fn encode_hash(hash: &[u8]) -> String {
        URL_SAFE.encode(hash)
    }

    pub fn pending_dir(&self) -> String {
        format!("{}/{}", self.root, UNSEQUENCED)
    }

    pub fn pending_entry(&self, hash: &[u8]) -> String {
        format!("{}/{}", self.pending_dir(), Self::encode_hash(hash))
    }

    pub fn sequenced_dir(&self) -> String {
        format!("{}/{}", self.root, SEQUENCED)
    }

    pub fn sequenced_entry(&self, sequence_number: u64) -> String {
        format!("{}/{}", self.sequenced_dir(), sequence_number)
    }

    pub fn nodes_dir(&self) -> String {
        format!("{}/{}", self.root, NODES)
    }

    pub fn node(&self, node_id: &str) -> String {
        format!("{}/{}", self.nodes_dir(), node_id)
    }
}
