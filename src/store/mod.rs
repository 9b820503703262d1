//! Consistent store over a coordination service.
//!
//! - [`codec`] - Stored value representation
//! - [`paths`] - Keyspace layout
//! - [`guards`] - Contract violations
//! - [`etcd`] - Store implementation over a [`CoordinationClient`](crate::coord::CoordinationClient)

pub mod codec;
pub mod etcd;
pub mod guards;
pub mod paths;

pub use etcd::EtcdConsistentStore;
pub use guards::ContractViolation;
pub use paths::PathScheme;

use crate::core::error::StoreResult;
use crate::entry::{ClusterNodeState, EntryHandle, LoggedEntry, SignedTreeHead};
use async_trait::async_trait;

/// Shared source of truth for log entries and cluster node state.
///
/// Operations return [`StoreError`](crate::core::error::StoreError) for
/// expected conditions. Contract violations panic; see [`guards`].
#[async_trait]
pub trait ConsistentStore<E: LoggedEntry>: Send + Sync {
    /// Next free sequence number.
    async fn next_available_sequence_number(&self) -> u64;

    /// Publish the tree head the cluster serves.
    async fn set_serving_sth(&self, sth: &SignedTreeHead) -> StoreResult<()>;

    /// Record an unsequenced entry.
    ///
    /// If an entry with the same identity is already pending or has been
    /// sequenced, `entry` is replaced with the stored pending record and
    /// `AlreadyExists` is returned.
    async fn add_pending_entry(&self, entry: &mut E) -> StoreResult<()>;

    /// Read the pending entry with identity `hash`.
    async fn get_pending_entry_for_hash(&self, hash: &[u8]) -> StoreResult<EntryHandle<E>>;

    /// All pending entries, in no particular order.
    async fn get_pending_entries(&self) -> StoreResult<Vec<EntryHandle<E>>>;

    /// All sequenced entries, ordered by sequence number.
    async fn get_sequenced_entries(&self) -> StoreResult<Vec<EntryHandle<E>>>;

    /// The entry at `sequence_number`.
    async fn get_sequenced_entry(&self, sequence_number: u64) -> StoreResult<EntryHandle<E>>;

    /// Move a pending entry to its permanent position.
    ///
    /// `handle` must come from a pending read. On success it holds the
    /// sequenced entry and the version of the sequenced record. The pending
    /// record is kept, reserved at `sequence_number`, and no longer reads as
    /// pending.
    async fn assign_sequence_number(
        &self,
        sequence_number: u64,
        handle: &mut EntryHandle<E>,
    ) -> StoreResult<()>;

    /// Overwrite this node's state record.
    async fn set_cluster_node_state(&self, state: &ClusterNodeState) -> StoreResult<()>;

    /// Read the state record of `node_id`.
    async fn get_cluster_node_state(&self, node_id: &str) -> StoreResult<ClusterNodeState>;

    /// State records of every node.
    async fn get_cluster_node_states(&self) -> StoreResult<Vec<ClusterNodeState>>;
}
