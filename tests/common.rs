//! Common test utilities.
//!
//! This module contains shared helpers for integration tests.
//! Import with `mod common;` in test files.

#![allow(dead_code)]

use async_trait::async_trait;
use ctstore::coord::{
    spawn_memory_coordinator, CoordError, CoordinationClient, CoordinatorHandle, Node,
};
use ctstore::core::config::Config;
use ctstore::entry::LoggedCertificate;
use ctstore::store::{codec, EtcdConsistentStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::NamedTempFile;

pub const ROOT: &str = "/root";
pub const NODE_ID: &str = "node_id";
pub const TIMESTAMP: u64 = 9000;

pub type TestStore = EtcdConsistentStore<LoggedCertificate, CoordinatorHandle>;

/// A store over a fresh in-process coordinator, plus a raw client for
/// setting up and inspecting the keyspace behind the store's back.
pub fn create_store() -> (TestStore, CoordinatorHandle) {
    let (client, _task) = spawn_memory_coordinator(64);
    let store = EtcdConsistentStore::new(client.clone(), ROOT, NODE_ID);
    (store, client)
}

/// Failures armed on a [`FlakyClient`]. Each fires once.
#[derive(Debug, Default)]
pub struct Faults {
    sequenced_create: AtomicBool,
    sequenced_get: AtomicBool,
}

impl Faults {
    /// Fail the next create of a sequenced record.
    pub fn fail_next_publish(&self) {
        self.sequenced_create.store(true, Ordering::SeqCst);
    }

    /// Fail the next read of a sequenced record.
    pub fn fail_next_sequenced_read(&self) {
        self.sequenced_get.store(true, Ordering::SeqCst);
    }

    fn trip(flag: &AtomicBool, key: &str) -> Result<(), CoordError> {
        if key.contains("/sequenced/") && flag.swap(false, Ordering::SeqCst) {
            return Err(CoordError::unavailable("injected fault"));
        }
        Ok(())
    }
}

/// Coordination client that fails selected requests on demand.
#[derive(Debug, Clone)]
pub struct FlakyClient {
    inner: CoordinatorHandle,
    faults: Arc<Faults>,
}

#[async_trait]
impl CoordinationClient for FlakyClient {
    async fn create(&self, key: &str, value: &str) -> Result<u64, CoordError> {
        Faults::trip(&self.faults.sequenced_create, key)?;
        self.inner.create(key, value).await
    }

    async fn get(&self, key: &str) -> Result<Node, CoordError> {
        Faults::trip(&self.faults.sequenced_get, key)?;
        self.inner.get(key).await
    }

    async fn update(&self, key: &str, value: &str, expected_index: u64) -> Result<u64, CoordError> {
        self.inner.update(key, value, expected_index).await
    }

    async fn force_set(&self, key: &str, value: &str) -> Result<u64, CoordError> {
        self.inner.force_set(key, value).await
    }

    async fn delete(&self, key: &str, expected_index: u64) -> Result<(), CoordError> {
        self.inner.delete(key, expected_index).await
    }

    async fn list_children(&self, dir: &str) -> Result<Vec<Node>, CoordError> {
        self.inner.list_children(dir).await
    }
}

pub type FlakyStore = EtcdConsistentStore<LoggedCertificate, FlakyClient>;

/// A store whose client fails on demand, with the fault switches and a
/// reliable client on the same keyspace.
pub fn create_flaky_store() -> (FlakyStore, Arc<Faults>, CoordinatorHandle) {
    let (client, _task) = spawn_memory_coordinator(64);
    let faults = Arc::new(Faults::default());
    let flaky = FlakyClient {
        inner: client.clone(),
        faults: Arc::clone(&faults),
    };
    (EtcdConsistentStore::new(flaky, ROOT, NODE_ID), faults, client)
}

/// Unsequenced X509 certificate.
pub fn make_cert(timestamp: u64, body: &str) -> LoggedCertificate {
    LoggedCertificate::x509(timestamp, body)
}

/// Certificate carrying a final sequence number.
pub fn make_sequenced_cert(timestamp: u64, body: &str, seq: u64) -> LoggedCertificate {
    make_cert(timestamp, body).with_sequence_number(seq)
}

pub fn default_cert() -> LoggedCertificate {
    make_cert(TIMESTAMP, "leaf")
}

/// Write `thing` at `key` the way the store encodes values. Returns the index.
pub async fn insert_entry<T: Serialize>(client: &CoordinatorHandle, key: &str, thing: &T) -> u64 {
    let value = codec::encode(thing).expect("Failed to encode");
    client
        .create(key, &value)
        .await
        .expect("Failed to insert entry")
}

/// Read and decode the value at `key`.
pub async fn peek_entry<T: DeserializeOwned>(client: &CoordinatorHandle, key: &str) -> T {
    let node = client.get(key).await.expect("Failed to read entry");
    codec::decode(&node.value).expect("Failed to decode")
}

/// Create a configuration file with the given contents.
pub fn create_config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write config");
    file
}

/// Create a minimal valid configuration file.
pub fn create_minimal_config() -> NamedTempFile {
    create_config_file(
        r#"
[store]
node_id = "node-a"
"#,
    )
}

/// Load a config from a temp file.
pub fn load_config(file: &NamedTempFile) -> Config {
    Config::from_file(file.path()).expect("Failed to load config")
}

/// Assert that a result is Ok and return the value.
#[track_caller]
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("Expected Ok, got Err: {:?}", e),
    }
}

/// Assert that a result is Err.
#[track_caller]
pub fn assert_err<T: std::fmt::Debug, E>(result: Result<T, E>) -> E {
    match result {
        Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
        Err(e) => e,
    }
}
