//! Simulate command implementation.
//!
//! Drives the store the way a small cluster would: several submitters race
//! to add overlapping certificates, then one sequencer gives every pending
//! entry a position and the node publishes its progress.

use crate::coord::{spawn_memory_coordinator, CoordinatorHandle};
use crate::core::config::Config;
use crate::core::error::StoreError;
use crate::entry::{ClusterNodeState, LoggedCertificate};
use crate::store::{ConsistentStore, EtcdConsistentStore};
use anyhow::{Context, Result};
use clap::Args;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Run submitters and a sequencer against an in-process coordinator.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Number of concurrent submitters.
    #[arg(long, default_value_t = 4)]
    pub submitters: usize,

    /// Certificates per submitter. Every submitter sends the same leaves.
    #[arg(long, default_value_t = 16)]
    pub entries: usize,
}

/// Outcome of a simulation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationReport {
    /// Submissions that created a pending entry.
    pub added: usize,
    /// Submissions de-duplicated against an existing entry.
    pub duplicates: usize,
    /// Entries given a sequence number.
    pub sequenced: usize,
    /// Assignments lost to a concurrent writer.
    pub conflicts: usize,
    /// Coordinator index after the run.
    pub final_index: u64,
}

type SimStore = EtcdConsistentStore<LoggedCertificate, CoordinatorHandle>;

/// Run the simulate command.
pub async fn run_simulate(args: SimulateArgs, config: &Config) -> Result<()> {
    let report = simulate(config, args.submitters, args.entries).await?;

    println!("Simulation (node: {})", config.store.node_id);
    println!("==========================================");
    println!("Added:       {}", report.added);
    println!("Duplicates:  {}", report.duplicates);
    println!("Sequenced:   {}", report.sequenced);
    println!("Conflicts:   {}", report.conflicts);
    println!("Final index: {}", report.final_index);
    Ok(())
}

/// Run a simulation and report what happened.
pub async fn simulate(config: &Config, submitters: usize, entries: usize) -> Result<SimulationReport> {
    if submitters == 0 || entries == 0 {
        anyhow::bail!("submitters and entries must be > 0");
    }

    let (client, task) = spawn_memory_coordinator(config.coordinator.queue_depth);
    let store: Arc<SimStore> = Arc::new(EtcdConsistentStore::from_config(
        client.clone(),
        &config.store,
    ));
    let mut report = SimulationReport::default();

    let mut workers = JoinSet::new();
    for submitter in 0..submitters {
        let store = Arc::clone(&store);
        workers.spawn(submit(store, submitter, entries));
    }
    while let Some(joined) = workers.join_next().await {
        let (added, duplicates) = joined.context("submitter task failed")??;
        report.added += added;
        report.duplicates += duplicates;
    }

    let (sequenced, conflicts) = sequence(&store).await?;
    report.sequenced = sequenced;
    report.conflicts = conflicts;

    let tree_size = store.get_sequenced_entries().await?.len() as u64;
    store
        .set_cluster_node_state(&ClusterNodeState::new(store.node_id(), tree_size))
        .await?;

    report.final_index = client.stats().await?.current_index;
    client.shutdown().await;
    task.await.context("coordinator loop failed")?;

    tracing::info!(?report, "simulation finished");
    Ok(report)
}

async fn submit(
    store: Arc<SimStore>,
    submitter: usize,
    entries: usize,
) -> Result<(usize, usize), StoreError> {
    let mut added = 0;
    let mut duplicates = 0;
    for i in 0..entries {
        let timestamp = 1_000 * (submitter as u64 + 1) + i as u64;
        let mut cert = LoggedCertificate::x509(timestamp, format!("leaf-{i}").into_bytes());
        match store.add_pending_entry(&mut cert).await {
            Ok(()) => added += 1,
            Err(StoreError::AlreadyExists { .. }) => duplicates += 1,
            Err(err) => return Err(err),
        }
    }
    tracing::debug!(submitter, added, duplicates, "submitter done");
    Ok((added, duplicates))
}

/// Assign consecutive numbers to pending entries in timestamp order.
async fn sequence(store: &SimStore) -> Result<(usize, usize)> {
    let mut pending = store.get_pending_entries().await?;
    pending.sort_by_key(|h| h.entry().timestamp());

    let mut next = store.get_sequenced_entries().await?.len() as u64;
    let mut sequenced = 0;
    let mut conflicts = 0;
    for mut handle in pending {
        match store.assign_sequence_number(next, &mut handle).await {
            Ok(()) => {
                sequenced += 1;
                next += 1;
            }
            Err(err) if err.is_retriable() => {
                tracing::warn!(error = %err, "skipping entry after conflict");
                conflicts += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok((sequenced, conflicts))
}
