//! Log entries and the records stored alongside them.
//!
//! - [`certificate`] - `LoggedCertificate`, the concrete log entry
//! - [`handle`] - `EntryHandle`, an entry paired with its store version
//! - [`node_state`] - per-node progress records and signed tree heads

pub mod certificate;
pub mod handle;
pub mod node_state;

pub use certificate::{EntryType, LogEntryData, LoggedCertificate, SignedCertificateTimestamp};
pub use handle::EntryHandle;
pub use node_state::{ClusterNodeState, SignedTreeHead};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// An entry the consistent store can hold.
///
/// `hash` is the entry's identity: a deterministic function of its immutable
/// content, stable for the lifetime of the entry. Two entries with the same
/// hash are the same entry, whatever their scratch fields say.
pub trait LoggedEntry:
    Clone + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Identity hash of the entry content.
    fn hash(&self) -> Vec<u8>;

    /// Permanent position in the log, if assigned.
    fn sequence_number(&self) -> Option<u64>;

    /// Record the permanent position.
    fn set_sequence_number(&mut self, sequence_number: u64);

    /// Tentative position reserved ahead of the final assignment.
    fn provisional_sequence_number(&self) -> Option<u64>;

    /// Record a tentative position.
    fn set_provisional_sequence_number(&mut self, sequence_number: u64);

    /// Drop a tentative position that can no longer be used.
    fn clear_provisional_sequence_number(&mut self);

    /// Check if the entry has been given a permanent position.
    fn is_sequenced(&self) -> bool {
        self.sequence_number().is_some()
    }
}
