//! Dispatch loop for the in-process coordination service.
//!
//! One task owns the [`MemoryCoordinator`] and serves requests in arrival
//! order. Callers hold cloneable [`CoordinatorHandle`]s and await the reply to
//! their own request, so any number of workers can issue calls concurrently
//! without ever touching the state directly.

use super::memory::{CoordinatorStats, MemoryCoordinator};
use super::{CoordError, CoordinationClient, Node};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

type Reply<T> = oneshot::Sender<Result<T, CoordError>>;

/// Requests served by the dispatch loop.
#[derive(Debug)]
pub enum Request {
    Create {
        key: String,
        value: String,
        resp: Reply<u64>,
    },
    Get {
        key: String,
        resp: Reply<Node>,
    },
    Update {
        key: String,
        value: String,
        expected_index: u64,
        resp: Reply<u64>,
    },
    ForceSet {
        key: String,
        value: String,
        resp: Reply<u64>,
    },
    Delete {
        key: String,
        expected_index: u64,
        resp: Reply<()>,
    },
    ListChildren {
        dir: String,
        resp: Reply<Vec<Node>>,
    },
    Stats {
        resp: oneshot::Sender<CoordinatorStats>,
    },
    Shutdown,
}

/// The loop owning the coordinator state.
pub struct CoordinatorLoop {
    state: MemoryCoordinator,
    rx: mpsc::Receiver<Request>,
}

impl CoordinatorLoop {
    /// Create a loop over `state`, returning it with the client handle.
    pub fn new(state: MemoryCoordinator, queue_depth: usize) -> (Self, CoordinatorHandle) {
        let (tx, rx) = mpsc::channel(queue_depth.max(1));
        (Self { state, rx }, CoordinatorHandle { tx })
    }

    /// Serve requests until shutdown or until every handle is dropped.
    pub async fn run(mut self) -> MemoryCoordinator {
        while let Some(request) = self.rx.recv().await {
            match request {
                Request::Create { key, value, resp } => {
                    tracing::trace!(%key, "create");
                    let _ = resp.send(self.state.create(&key, &value));
                }
                Request::Get { key, resp } => {
                    tracing::trace!(%key, "get");
                    let _ = resp.send(self.state.get(&key));
                }
                Request::Update {
                    key,
                    value,
                    expected_index,
                    resp,
                } => {
                    tracing::trace!(%key, expected_index, "update");
                    let _ = resp.send(self.state.update(&key, &value, expected_index));
                }
                Request::ForceSet { key, value, resp } => {
                    tracing::trace!(%key, "force_set");
                    let _ = resp.send(Ok(self.state.force_set(&key, &value)));
                }
                Request::Delete {
                    key,
                    expected_index,
                    resp,
                } => {
                    tracing::trace!(%key, expected_index, "delete");
                    let _ = resp.send(self.state.delete(&key, expected_index));
                }
                Request::ListChildren { dir, resp } => {
                    tracing::trace!(%dir, "list_children");
                    let _ = resp.send(Ok(self.state.list_children(&dir)));
                }
                Request::Stats { resp } => {
                    let _ = resp.send(self.state.stats());
                }
                Request::Shutdown => break,
            }
        }

        tracing::debug!(index = self.state.current_index(), "coordinator loop stopped");
        self.state
    }
}

/// Cloneable client end of a [`CoordinatorLoop`].
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
    tx: mpsc::Sender<Request>,
}

impl CoordinatorHandle {
    async fn call<T>(
        &self,
        make: impl FnOnce(Reply<T>) -> Request,
    ) -> Result<T, CoordError> {
        let (resp, rx) = oneshot::channel();
        self.tx
            .send(make(resp))
            .await
            .map_err(|_| CoordError::unavailable("dispatch loop stopped"))?;
        rx.await
            .map_err(|_| CoordError::unavailable("dispatch loop dropped the request"))?
    }

    /// Keyspace statistics.
    pub async fn stats(&self) -> Result<CoordinatorStats, CoordError> {
        let (resp, rx) = oneshot::channel();
        self.tx
            .send(Request::Stats { resp })
            .await
            .map_err(|_| CoordError::unavailable("dispatch loop stopped"))?;
        rx.await
            .map_err(|_| CoordError::unavailable("dispatch loop dropped the request"))
    }

    /// Ask the loop to stop. Requests queued behind the shutdown fail.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(Request::Shutdown).await;
    }
}

#[async_trait]
impl CoordinationClient for CoordinatorHandle {
    async fn create(&self, key: &str, value: &str) -> Result<u64, CoordError> {
        self.call(|resp| Request::Create {
            key: key.to_string(),
            value: value.to_string(),
            resp,
        })
        .await
    }

    async fn get(&self, key: &str) -> Result<Node, CoordError> {
        self.call(|resp| Request::Get {
            key: key.to_string(),
            resp,
        })
        .await
    }

    async fn update(
        &self,
        key: &str,
        value: &str,
        expected_index: u64,
    ) -> Result<u64, CoordError> {
        self.call(|resp| Request::Update {
            key: key.to_string(),
            value: value.to_string(),
            expected_index,
            resp,
        })
        .await
    }

    async fn force_set(&self, key: &str, value: &str) -> Result<u64, CoordError> {
        self.call(|resp| Request::ForceSet {
            key: key.to_string(),
            value: value.to_string(),
            resp,
        })
        .await
    }

    async fn delete(&self, key: &str, expected_index: u64) -> Result<(), CoordError> {
        self.call(|resp| Request::Delete {
            key: key.to_string(),
            expected_index,
            resp,
        })
        .await
    }

    async fn list_children(&self, dir: &str) -> Result<Vec<Node>, CoordError> {
        self.call(|resp| Request::ListChildren {
            dir: dir.to_string(),
            resp,
        })
        .await
    }
}

/// Spawn a dispatch loop over an empty coordinator on the current runtime.
pub fn spawn_memory_coordinator(
    queue_depth: usize,
) -> (CoordinatorHandle, JoinHandle<MemoryCoordinator>) {
    let (coordinator, handle) = CoordinatorLoop::new(MemoryCoordinator::new(), queue_depth);
    let task = tokio::spawn(coordinator.run());
    (handle, task)
}
