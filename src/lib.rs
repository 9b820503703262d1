//! ctstore - consistent store for certificate-transparency log state.
//!
//! Cluster nodes of a CT log share their entries and progress through an
//! etcd-style coordination service. Submitted certificates are recorded as
//! pending, de-duplicated by content hash, later given a sequence number and
//! republished as sequenced. Each node publishes how far it has caught up.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Frontends / Sequencer                      │
//! └─────────────────────────────────────────────────────────────────┘
//!                                  │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         ConsistentStore                          │
//! │      pending │ sequenced │ node state │ contract guards          │
//! └─────────────────────────────────────────────────────────────────┘
//!                                  │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      CoordinationClient                          │
//! │     create │ get │ CAS update │ force set │ CAS delete │ list    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Organization
//!
//! ## Core
//! - [`core::config`] - Configuration parsing and validation
//! - [`core::error`] - Error types and status codes
//!
//! ## Entries
//! - [`entry`] - Logged certificates, entry handles, node state
//!
//! ## Coordination
//! - [`coord::memory`] - In-process coordination service
//! - [`coord::dispatch`] - Dispatch loop and client handle
//!
//! ## Store
//! - [`store::etcd`] - The consistent store
//! - [`store::guards`] - Contract violations
//!
//! ## Operations
//! - [`ops::telemetry`] - Structured logging setup
//!
//! ## CLI
//! - [`cli::commands`] - CLI command implementations

// Core infrastructure
pub mod core;

// Log entries
pub mod entry;

// Coordination service
pub mod coord;

// Consistent store
pub mod store;

// Operations
pub mod ops;

// CLI
pub mod cli;

// Re-exports for convenience
pub use self::core::{config, error};
pub use self::core::error::{StatusCode, StoreError, StoreResult};
pub use coord::{CoordinationClient, CoordinatorHandle};
pub use entry::{ClusterNodeState, EntryHandle, LoggedCertificate, LoggedEntry, SignedTreeHead};
pub use ops::telemetry;
pub use store::{ConsistentStore, EtcdConsistentStore};
