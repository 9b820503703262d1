//! Consistent store backed by an etcd-style coordination service.
//!
//! All synchronization is delegated to the service's per-key CAS; the store
//! itself holds no locks and no state beyond the client, the keyspace layout
//! and this node's identifier.

use super::codec::{self, CodecError};
use super::guards::{self, ContractViolation};
use super::paths::PathScheme;
use super::ConsistentStore;
use crate::coord::{CoordError, CoordinationClient, Node};
use crate::core::config::StoreConfig;
use crate::core::error::{StoreError, StoreResult};
use crate::entry::{ClusterNodeState, EntryHandle, LoggedEntry, SignedTreeHead};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;

/// [`ConsistentStore`] over a [`CoordinationClient`].
pub struct EtcdConsistentStore<E, C> {
    client: C,
    paths: PathScheme,
    node_id: String,
    _entry: PhantomData<fn() -> E>,
}

impl<E: LoggedEntry, C: CoordinationClient> EtcdConsistentStore<E, C> {
    /// Create a store rooted at `root` for the node `node_id`.
    pub fn new(client: C, root: impl Into<String>, node_id: impl Into<String>) -> Self {
        Self {
            client,
            paths: PathScheme::new(root),
            node_id: node_id.into(),
            _entry: PhantomData,
        }
    }

    /// Create a store from configuration.
    pub fn from_config(client: C, config: &StoreConfig) -> Self {
        Self::new(client, config.root.clone(), config.node_id.clone())
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn paths(&self) -> &PathScheme {
        &self.paths
    }

    fn encode_value<T: Serialize>(key: &str, value: &T) -> StoreResult<String> {
        codec::encode(value).map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })
    }

    fn decode_node<T: DeserializeOwned>(node: &Node) -> StoreResult<T> {
        codec::decode(&node.value).map_err(|source: CodecError| StoreError::Corrupt {
            key: node.key.clone(),
            source,
        })
    }

    /// Read and decode the entry at `key`.
    async fn read_entry(&self, key: &str) -> StoreResult<EntryHandle<E>> {
        let node = match self.client.get(key).await {
            Ok(node) => node,
            Err(CoordError::KeyNotFound { .. }) => {
                return Err(StoreError::NotFound {
                    key: key.to_string(),
                })
            }
            Err(err) => return Err(err.into()),
        };
        let entry: E = Self::decode_node(&node)?;
        Ok(EntryHandle::with_version(entry, node.modified_index))
    }

    /// Read every entry directly under `dir`.
    async fn read_entries(&self, dir: &str) -> StoreResult<Vec<(String, EntryHandle<E>)>> {
        let nodes = self.client.list_children(dir).await?;
        let mut entries = Vec::with_capacity(nodes.len());
        for node in nodes {
            let entry: E = Self::decode_node(&node)?;
            entries.push((node.key, EntryHandle::with_version(entry, node.modified_index)));
        }
        Ok(entries)
    }

    /// Check whether a pending `entry` already sits at its reserved number.
    async fn is_published(&self, entry: &E) -> StoreResult<bool> {
        let Some(sequence_number) = entry.provisional_sequence_number() else {
            return Ok(false);
        };
        match self
            .client
            .get(&self.paths.sequenced_entry(sequence_number))
            .await
        {
            Ok(node) => {
                let published: E = Self::decode_node(&node)?;
                Ok(published.hash() == entry.hash())
            }
            Err(CoordError::KeyNotFound { .. }) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Put the pending record back to `restored` after a failed publish.
    async fn release_reservation(&self, key: &str, restored: &E, reserved_version: u64) {
        let value = match Self::encode_value(key, restored) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(%key, error = %err, "failed to encode reservation release");
                return;
            }
        };
        if let Err(err) = self.client.update(key, &value, reserved_version).await {
            tracing::warn!(%key, error = %err, "failed to release sequence number reservation");
        }
    }
}

#[async_trait]
impl<E: LoggedEntry, C: CoordinationClient> ConsistentStore<E> for EtcdConsistentStore<E, C> {
    async fn next_available_sequence_number(&self) -> u64 {
        guards::violated(ContractViolation::NotImplemented {
            operation: "next_available_sequence_number",
        })
    }

    async fn set_serving_sth(&self, _sth: &SignedTreeHead) -> StoreResult<()> {
        Err(StoreError::Unimplemented {
            operation: "set_serving_sth",
        })
    }

    async fn add_pending_entry(&self, entry: &mut E) -> StoreResult<()> {
        guards::ensure_unsequenced(&*entry, "add_pending_entry");

        let hash = entry.hash();
        let key = self.paths.pending_entry(&hash);
        let value = Self::encode_value(&key, &*entry)?;

        match self.client.create(&key, &value).await {
            Ok(index) => {
                tracing::debug!(%key, index, "added pending entry");
                Ok(())
            }
            Err(CoordError::KeyExists { .. }) => {
                let existing = match self.read_entry(&key).await {
                    Ok(existing) => existing,
                    Err(StoreError::NotFound { .. }) => {
                        return Err(StoreError::aborted(
                            key,
                            "pending entry removed during de-duplication",
                        ))
                    }
                    Err(err) => return Err(err),
                };
                guards::ensure_pending_record(existing.entry(), &key);
                if existing.entry().hash() != hash {
                    guards::violated(ContractViolation::IdentityCollision { key: key.clone() });
                }

                tracing::debug!(%key, "pending entry already exists");
                *entry = existing.into_entry();
                Err(StoreError::AlreadyExists { key })
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn get_pending_entry_for_hash(&self, hash: &[u8]) -> StoreResult<EntryHandle<E>> {
        let key = self.paths.pending_entry(hash);
        let handle = self.read_entry(&key).await?;
        guards::ensure_pending_record(handle.entry(), &key);
        if self.is_published(handle.entry()).await? {
            return Err(StoreError::NotFound { key });
        }
        Ok(handle)
    }

    async fn get_pending_entries(&self) -> StoreResult<Vec<EntryHandle<E>>> {
        let entries = self.read_entries(&self.paths.pending_dir()).await?;
        for (key, handle) in &entries {
            guards::ensure_pending_record(handle.entry(), key);
        }
        let mut pending = Vec::with_capacity(entries.len());
        for (_, handle) in entries {
            if !self.is_published(handle.entry()).await? {
                pending.push(handle);
            }
        }
        Ok(pending)
    }

    async fn get_sequenced_entries(&self) -> StoreResult<Vec<EntryHandle<E>>> {
        let entries = self.read_entries(&self.paths.sequenced_dir()).await?;
        for (key, handle) in &entries {
            guards::ensure_sequenced_record(handle.entry(), key);
        }
        let mut handles: Vec<EntryHandle<E>> =
            entries.into_iter().map(|(_, handle)| handle).collect();
        handles.sort_by_key(|h| h.entry().sequence_number());
        Ok(handles)
    }

    async fn get_sequenced_entry(&self, sequence_number: u64) -> StoreResult<EntryHandle<E>> {
        let key = self.paths.sequenced_entry(sequence_number);
        let handle = self.read_entry(&key).await?;
        guards::ensure_sequenced_record(handle.entry(), &key);
        Ok(handle)
    }

    async fn assign_sequence_number(
        &self,
        sequence_number: u64,
        handle: &mut EntryHandle<E>,
    ) -> StoreResult<()> {
        guards::ensure_unsequenced(handle.entry(), "assign_sequence_number");
        guards::ensure_provisional_matches(handle.entry(), sequence_number);
        let Some(pending_version) = handle.version() else {
            guards::violated(ContractViolation::UnversionedHandle {
                operation: "assign_sequence_number",
            });
        };

        let hash = handle.entry().hash();
        let pending_key = self.paths.pending_entry(&hash);
        let sequenced_key = self.paths.sequenced_entry(sequence_number);

        // Reserve the number on the pending record; this is where concurrent
        // mutation of the pending record is detected.
        let mut reserved = handle.entry().clone();
        reserved.set_provisional_sequence_number(sequence_number);
        let reserved_value = Self::encode_value(&pending_key, &reserved)?;
        let reserved_version = match self
            .client
            .update(&pending_key, &reserved_value, pending_version)
            .await
        {
            Ok(version) => version,
            Err(CoordError::CompareFailed { .. }) => {
                tracing::warn!(key = %pending_key, sequence_number, "pending entry modified concurrently");
                return Err(StoreError::aborted(
                    pending_key,
                    "pending entry modified concurrently",
                ));
            }
            Err(CoordError::KeyNotFound { .. }) => {
                return Err(StoreError::aborted(pending_key, "pending entry no longer exists"));
            }
            Err(err) => return Err(err.into()),
        };

        // Publish. Creating the sequenced key is the serialization point for
        // the sequence number. Every failure hands the reservation back.
        let mut sequenced = reserved;
        sequenced.set_sequence_number(sequence_number);
        let sequenced_value = Self::encode_value(&sequenced_key, &sequenced)?;
        let sequenced_version = match self.client.create(&sequenced_key, &sequenced_value).await {
            Ok(version) => version,
            Err(CoordError::KeyExists { .. }) => {
                let existing = match self.read_entry(&sequenced_key).await {
                    Ok(existing) => existing,
                    Err(err) => {
                        self.release_reservation(&pending_key, handle.entry(), reserved_version)
                            .await;
                        return Err(err);
                    }
                };
                if existing.entry().hash() != hash {
                    tracing::warn!(key = %sequenced_key, "sequence number taken by another entry");
                    let mut restored = handle.entry().clone();
                    restored.clear_provisional_sequence_number();
                    self.release_reservation(&pending_key, &restored, reserved_version)
                        .await;
                    return Err(StoreError::aborted(
                        sequenced_key,
                        "sequence number already assigned to another entry",
                    ));
                }
                // An earlier attempt published this entry and then stopped.
                tracing::info!(key = %sequenced_key, "resuming interrupted sequencing");
                guards::ensure_sequenced_record(existing.entry(), &sequenced_key);
                sequenced = existing.entry().clone();
                existing.version().unwrap_or_default()
            }
            Err(err) => {
                tracing::warn!(key = %sequenced_key, error = %err, "failed to publish sequenced entry");
                self.release_reservation(&pending_key, handle.entry(), reserved_version)
                    .await;
                return Err(err.into());
            }
        };

        // The reserved pending record stays behind as the marker that keeps
        // resubmissions of this entry de-duplicated. Readers skip it once the
        // sequenced record exists.
        tracing::info!(
            sequence_number,
            key = %sequenced_key,
            "assigned sequence number"
        );
        *handle = EntryHandle::with_version(sequenced, sequenced_version);
        Ok(())
    }

    async fn set_cluster_node_state(&self, state: &ClusterNodeState) -> StoreResult<()> {
        let key = self.paths.node(&self.node_id);
        let value = Self::encode_value(&key, state)?;
        let index = self.client.force_set(&key, &value).await?;
        tracing::debug!(
            %key,
            index,
            contiguous_tree_size = state.contiguous_tree_size,
            "published node state"
        );
        Ok(())
    }

    async fn get_cluster_node_state(&self, node_id: &str) -> StoreResult<ClusterNodeState> {
        let key = self.paths.node(node_id);
        match self.client.get(&key).await {
            Ok(node) => Self::decode_node(&node),
            Err(CoordError::KeyNotFound { .. }) => Err(StoreError::NotFound { key }),
            Err(err) => Err(err.into()),
        }
    }

    async fn get_cluster_node_states(&self) -> StoreResult<Vec<ClusterNodeState>> {
        let nodes = self.client.list_children(&self.paths.nodes_dir()).await?;
        nodes.iter().map(|node| Self::decode_node(node)).collect()
    }
}
