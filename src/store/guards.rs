//! Contract guards.
//!
//! A contract violation means some caller (or the data it wrote) is broken in
//! a way the store cannot repair: an already-sequenced entry handed to a
//! pending-only operation, a record in the wrong collection, a provisional
//! number that disagrees with the final one, two contents under one identity.
//! These never travel as a [`StoreError`](crate::core::error::StoreError).
//! The guard logs the violation and panics; release builds abort on panic.

use crate::entry::LoggedEntry;
use thiserror::Error;

/// Violated store invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// An entry passed to `operation` already has a sequence number.
    #[error("{operation}: entry already has sequence number {sequence_number}")]
    EntryAlreadySequenced {
        operation: &'static str,
        sequence_number: u64,
    },

    /// A record in the pending collection has a sequence number.
    #[error("pending record at {key} has sequence number {sequence_number}")]
    PendingRecordSequenced { key: String, sequence_number: u64 },

    /// A record in the sequenced collection has no sequence number.
    #[error("sequenced record at {key} has no sequence number")]
    SequencedRecordUnsequenced { key: String },

    /// Final assignment disagrees with the reserved number.
    #[error("assigned sequence number {assigned} does not match provisional sequence number {provisional}")]
    ProvisionalMismatch { assigned: u64, provisional: u64 },

    /// A stored entry shares the submitted entry's identity but not its content.
    #[error("stored entry at {key} does not match the submitted entry")]
    IdentityCollision { key: String },

    /// A CAS operation was given a handle with no version.
    #[error("{operation}: entry handle has no version")]
    UnversionedHandle { operation: &'static str },

    /// The operation is owned by a different coordinator.
    #[error("{operation}: not implemented")]
    NotImplemented { operation: &'static str },
}

/// Report a contract violation and stop.
#[track_caller]
pub fn violated(violation: ContractViolation) -> ! {
    tracing::error!(%violation, "contract violation");
    panic!("contract violation: {violation}");
}

/// The entry handed to `operation` must not be sequenced.
#[track_caller]
pub fn ensure_unsequenced<E: LoggedEntry>(entry: &E, operation: &'static str) {
    if let Some(sequence_number) = entry.sequence_number() {
        violated(ContractViolation::EntryAlreadySequenced {
            operation,
            sequence_number,
        });
    }
}

/// A record read from the pending collection must not be sequenced.
#[track_caller]
pub fn ensure_pending_record<E: LoggedEntry>(entry: &E, key: &str) {
    if let Some(sequence_number) = entry.sequence_number() {
        violated(ContractViolation::PendingRecordSequenced {
            key: key.to_string(),
            sequence_number,
        });
    }
}

/// A record read from the sequenced collection must be sequenced.
#[track_caller]
pub fn ensure_sequenced_record<E: LoggedEntry>(entry: &E, key: &str) {
    if entry.sequence_number().is_none() {
        violated(ContractViolation::SequencedRecordUnsequenced {
            key: key.to_string(),
        });
    }
}

/// A reserved number, if any, must equal the one being assigned.
#[track_caller]
pub fn ensure_provisional_matches<E: LoggedEntry>(entry: &E, assigned: u64) {
    if let Some(provisional) = entry.provisional_sequence_number() {
        if provisional != assigned {
            violated(ContractViolation::ProvisionalMismatch {
                assigned,
                provisional,
            });
        }
    }
}
