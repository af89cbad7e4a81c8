//! Offline action queue.
//!
//! Buffers actions that must reach the backend, persists them through a
//! [`BlobStore`], and drains them when the device is online. At most one
//! drain pass runs at a time; a trigger that arrives while a pass is
//! running is dropped.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::action::{decode_queue, encode_queue, NewAction, QueuedAction};
use super::connectivity::ConnectivityState;
use super::processor::{ActionProcessor, ProcessError};
use crate::config::QueueConfig;
use crate::storage::BlobStore;

/// Options fixed for the lifetime of a manager.
#[derive(Debug, Clone)]
pub struct ManagerOptions {
    /// Key under which the queue blob is stored.
    pub storage_key: String,
    /// Upper bound on a single processor call; `None` waits forever.
    pub processor_timeout: Option<Duration>,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self::from(&QueueConfig::default())
    }
}

impl From<&QueueConfig> for ManagerOptions {
    fn from(config: &QueueConfig) -> Self {
        Self {
            storage_key: config.storage_key.clone(),
            processor_timeout: config.processor_timeout(),
        }
    }
}

/// Outcome of one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrainSummary {
    /// Actions handed to the processor.
    pub attempted: usize,
    /// Actions delivered and removed.
    pub succeeded: usize,
    /// Failed attempts, including those that led to a drop.
    pub failed: usize,
    /// Actions removed after exhausting their retries.
    pub dropped: usize,
    /// Actions left in the queue when the pass ended.
    pub remaining: usize,
}

/// Point-in-time counts for the queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    /// Actions waiting for delivery.
    pub pending: usize,
    /// Waiting actions that have failed at least once.
    pub retrying: usize,
    /// Creation time of the oldest waiting action.
    pub oldest: Option<DateTime<Utc>>,
}

/// Handle to the offline action queue.
///
/// Cloning is cheap; all clones share the same queue.
#[derive(Clone)]
pub struct OfflineManager {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn BlobStore>,
    processor: Arc<dyn ActionProcessor>,
    connectivity: watch::Receiver<ConnectivityState>,
    options: ManagerOptions,
    // Held across the persist of every mutation.
    queue: Mutex<Vec<QueuedAction>>,
    draining: AtomicBool,
    synchronizing: watch::Sender<bool>,
}

impl OfflineManager {
    /// Load the queue from `store` and build a manager around it.
    ///
    /// A missing blob yields an empty queue. A blob that cannot be read or
    /// decoded is logged and also yields an empty queue.
    pub async fn load(
        store: Arc<dyn BlobStore>,
        processor: Arc<dyn ActionProcessor>,
        connectivity: watch::Receiver<ConnectivityState>,
        options: ManagerOptions,
    ) -> Self {
        let queue = match store.get(&options.storage_key).await {
            Ok(Some(blob)) => decode_queue(&blob).unwrap_or_else(|e| {
                error!(key = %options.storage_key, "Error decoding offline queue: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                error!(key = %options.storage_key, "Error loading offline queue: {e}");
                Vec::new()
            }
        };

        debug!(count = queue.len(), "Offline queue loaded");

        let (synchronizing, _) = watch::channel(false);

        Self {
            inner: Arc::new(Inner {
                store,
                processor,
                connectivity,
                options,
                queue: Mutex::new(queue),
                draining: AtomicBool::new(false),
                synchronizing,
            }),
        }
    }

    /// Append an action and return its id.
    ///
    /// The queue is persisted before this returns. If the device is online
    /// a drain pass is started in the background; the id is returned
    /// without waiting for it.
    pub async fn queue_action(&self, action: NewAction) -> Uuid {
        let action = QueuedAction::from_new(action);
        let id = action.id;
        debug!(%id, kind = %action.kind, "Queueing action");

        {
            let mut queue = self.inner.queue.lock().await;
            queue.push(action);
            self.inner.persist(&queue).await;
        }

        if self.is_online() {
            let this = self.clone();
            tokio::spawn(async move {
                this.drain().await;
            });
        }

        id
    }

    /// Run a drain pass and wait for it.
    ///
    /// Returns `None` without doing anything when offline or when a pass
    /// is already running.
    pub async fn retry_all(&self) -> Option<DrainSummary> {
        if !self.is_online() {
            debug!("Retry requested while offline, ignoring");
            return None;
        }
        self.drain().await
    }

    /// Remove every queued action.
    pub async fn clear_queue(&self) {
        let mut queue = self.inner.queue.lock().await;
        queue.clear();
        self.inner.persist(&queue).await;
        info!("Offline queue cleared");
    }

    /// Copy of the current queue, in order.
    pub async fn get_queue(&self) -> Vec<QueuedAction> {
        self.inner.queue.lock().await.clone()
    }

    /// Number of queued actions.
    pub async fn len(&self) -> usize {
        self.inner.queue.lock().await.len()
    }

    /// Whether the queue is empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.queue.lock().await.is_empty()
    }

    /// Counts for status displays.
    pub async fn stats(&self) -> QueueStats {
        let queue = self.inner.queue.lock().await;
        QueueStats {
            pending: queue.len(),
            retrying: queue.iter().filter(|a| a.retry_count > 0).count(),
            oldest: queue.iter().map(|a| a.timestamp).min(),
        }
    }

    /// Whether a drain pass is running.
    #[must_use]
    pub fn is_synchronizing(&self) -> bool {
        *self.inner.synchronizing.borrow()
    }

    /// Observe the synchronizing flag.
    #[must_use]
    pub fn subscribe_synchronizing(&self) -> watch::Receiver<bool> {
        self.inner.synchronizing.subscribe()
    }

    /// Current connectivity as seen by the manager.
    #[must_use]
    pub fn connectivity(&self) -> ConnectivityState {
        *self.inner.connectivity.borrow()
    }

    fn is_online(&self) -> bool {
        self.connectivity().online
    }

    /// Drain whenever the device is online and foregrounded.
    ///
    /// The condition is checked once at start and again on every
    /// connectivity change. The task ends when the connectivity source is
    /// dropped.
    #[must_use]
    pub fn spawn_connectivity_watcher(&self) -> JoinHandle<()> {
        let this = self.clone();
        let mut rx = self.inner.connectivity.clone();

        tokio::spawn(async move {
            let ready = rx.borrow_and_update().can_drain();
            if ready {
                this.drain().await;
            }

            while rx.changed().await.is_ok() {
                let state = *rx.borrow_and_update();
                if state.can_drain() {
                    this.drain().await;
                }
            }

            debug!("Connectivity source closed, watcher stopped");
        })
    }

    /// One pass over the queue. `None` if another pass holds the flag.
    async fn drain(&self) -> Option<DrainSummary> {
        let Some(_guard) = DrainGuard::acquire(&self.inner) else {
            debug!("Drain already running, trigger dropped");
            return None;
        };

        let mut summary = DrainSummary::default();
        let mut attempted: HashSet<Uuid> = HashSet::new();

        loop {
            let next = {
                let queue = self.inner.queue.lock().await;
                queue.iter().find(|a| !attempted.contains(&a.id)).cloned()
            };
            let Some(action) = next else {
                break;
            };

            attempted.insert(action.id);
            summary.attempted += 1;

            let delivered = self.inner.attempt(&action).await;

            let mut queue = self.inner.queue.lock().await;
            let Some(pos) = queue.iter().position(|a| a.id == action.id) else {
                debug!(id = %action.id, "Action removed while processing, outcome discarded");
                continue;
            };

            if delivered {
                queue.remove(pos);
                summary.succeeded += 1;
                debug!(id = %action.id, "Action delivered");
            } else {
                summary.failed += 1;
                if queue[pos].record_failure() {
                    let dropped = queue.remove(pos);
                    summary.dropped += 1;
                    warn!(
                        id = %dropped.id,
                        kind = %dropped.kind,
                        retries = dropped.retry_count,
                        "Dropping action after exhausting retries"
                    );
                }
            }

            self.inner.persist(&queue).await;
        }

        summary.remaining = self.len().await;
        info!(
            attempted = summary.attempted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            dropped = summary.dropped,
            remaining = summary.remaining,
            "Drain pass finished"
        );

        Some(summary)
    }
}

impl Inner {
    /// Write the full queue. Failures are logged, never returned.
    async fn persist(&self, queue: &[QueuedAction]) {
        let blob = match encode_queue(queue) {
            Ok(blob) => blob,
            Err(e) => {
                error!("Error encoding offline queue: {e}");
                return;
            }
        };

        if let Err(e) = self.store.set(&self.options.storage_key, &blob).await {
            error!(key = %self.options.storage_key, "Error saving offline queue: {e}");
        }
    }

    /// Run the processor for one action. Errors and timeouts count as failure.
    async fn attempt(&self, action: &QueuedAction) -> bool {
        let call = self.processor.process(action);
        let outcome = match self.options.processor_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
                Err(ProcessError::new(format!(
                    "timed out after {}ms",
                    limit.as_millis()
                )))
            }),
            None => call.await,
        };

        match outcome {
            Ok(true) => true,
            Ok(false) => {
                debug!(id = %action.id, "Processor reported failure");
                false
            }
            Err(e) => {
                warn!(id = %action.id, kind = %action.kind, "Error processing action: {e}");
                false
            }
        }
    }
}

/// Single-flight claim on the drain pass, released on drop.
struct DrainGuard<'a> {
    inner: &'a Inner,
}

impl<'a> DrainGuard<'a> {
    fn acquire(inner: &'a Inner) -> Option<Self> {
        inner
            .draining
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        inner.synchronizing.send_replace(true);
        Some(Self { inner })
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.inner.draining.store(false, Ordering::Release);
        self.inner.synchronizing.send_replace(false);
    }
}
