//! # Persist Worker
//!
//! Writes cart snapshots to the key-value store in the background, one
//! snapshot per mutation, strictly in mutation order.
//!
//! ## Persist Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Persist Worker Flow                               │
//! │                                                                         │
//! │  CartManager mutation (inside the state lock)                          │
//! │       │                                                                 │
//! │       │  PersistCommand::Write(Arc<Cart>)                              │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  unbounded mpsc queue   [W1] [W2] [Flush] [W3] [Shutdown]       │   │
//! │  └────────────────────────────┬────────────────────────────────────┘   │
//! │                               │  FIFO                                   │
//! │                               ▼                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    PersistWorker                                │   │
//! │  │                                                                 │   │
//! │  │  Write:    encode(cart) → store.set(key, json)                  │   │
//! │  │            ok  → completed += 1, last_success_at = now          │   │
//! │  │            err → failed += 1, last_error, warn!  (no retry)     │   │
//! │  │                                                                 │   │
//! │  │  Flush:    ack once every earlier write was attempted           │   │
//! │  │                                                                 │   │
//! │  │  Shutdown: ack and exit; earlier writes already drained         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Each write carries the FULL cart, so the store converges to the       │
//! │  last mutation even if an intermediate write failed.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use cart_core::{codec, Cart};
use cart_store::KeyValueStore;

use crate::error::{CartError, CartResult};

// =============================================================================
// Persist Status
// =============================================================================

/// Counters describing the background persistence so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersistStatus {
    /// Snapshots written successfully.
    pub completed: u64,

    /// Snapshots that failed to encode or write.
    pub failed: u64,

    /// Message of the most recent failure.
    pub last_error: Option<String>,

    /// When the most recent successful write finished.
    pub last_success_at: Option<DateTime<Utc>>,
}

impl PersistStatus {
    /// Total write attempts.
    pub fn attempted(&self) -> u64 {
        self.completed + self.failed
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Messages processed by the worker, in arrival order.
#[derive(Debug)]
pub(crate) enum PersistCommand {
    /// Persist this snapshot.
    Write(Arc<Cart>),

    /// Acknowledge once every earlier command has been processed.
    Flush(oneshot::Sender<()>),

    /// Acknowledge and stop.
    Shutdown(oneshot::Sender<()>),
}

// =============================================================================
// Persist Worker
// =============================================================================

/// Background task that owns the store writes.
pub struct PersistWorker {
    store: Arc<dyn KeyValueStore>,
    key: String,
    rx: mpsc::UnboundedReceiver<PersistCommand>,
    status: watch::Sender<PersistStatus>,
}

/// Handle for queueing work on the persist worker.
#[derive(Debug, Clone)]
pub struct PersistHandle {
    tx: mpsc::UnboundedSender<PersistCommand>,
    status: watch::Receiver<PersistStatus>,
}

impl PersistWorker {
    /// Creates a worker writing under `key` and returns its handle.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> (Self, PersistHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(PersistStatus::default());

        let worker = PersistWorker {
            store,
            key: key.into(),
            rx,
            status: status_tx,
        };

        let handle = PersistHandle {
            tx,
            status: status_rx,
        };

        (worker, handle)
    }

    /// Runs the worker loop.
    ///
    /// This should be spawned as a background task. It returns after a
    /// shutdown command or once every handle is dropped.
    pub async fn run(mut self) {
        info!(key = %self.key, "Persist worker starting");

        while let Some(command) = self.rx.recv().await {
            match command {
                PersistCommand::Write(cart) => self.write(&cart).await,
                PersistCommand::Flush(ack) => {
                    let _ = ack.send(());
                }
                PersistCommand::Shutdown(ack) => {
                    // Refuse new work before acknowledging
                    self.rx.close();
                    let _ = ack.send(());
                    break;
                }
            }
        }

        info!(key = %self.key, "Persist worker stopped");
    }

    async fn write(&self, cart: &Cart) {
        let result = match codec::encode(cart) {
            Ok(json) => self
                .store
                .set(&self.key, &json)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(()) => {
                debug!(key = %self.key, items = cart.len(), "Cart persisted");
                self.status.send_modify(|status| {
                    status.completed += 1;
                    status.last_success_at = Some(Utc::now());
                });
            }
            Err(error) => {
                warn!(key = %self.key, error = %error, "Failed to persist cart");
                self.status.send_modify(|status| {
                    status.failed += 1;
                    status.last_error = Some(error);
                });
            }
        }
    }
}

impl PersistHandle {
    /// Queues a snapshot for writing.
    pub fn enqueue(&self, cart: Arc<Cart>) -> CartResult<()> {
        self.tx
            .send(PersistCommand::Write(cart))
            .map_err(|_| CartError::ChannelError("Persist queue closed".into()))
    }

    /// Waits until every snapshot queued before this call has been attempted.
    pub async fn flush(&self) -> CartResult<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(PersistCommand::Flush(ack_tx))
            .map_err(|_| CartError::ChannelError("Persist queue closed".into()))?;

        ack_rx
            .await
            .map_err(|_| CartError::ChannelError("Persist worker dropped flush".into()))
    }

    /// Drains the queue and stops the worker.
    pub async fn shutdown(&self) -> CartResult<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.tx
            .send(PersistCommand::Shutdown(ack_tx))
            .map_err(|_| CartError::ChannelError("Persist queue closed".into()))?;

        ack_rx
            .await
            .map_err(|_| CartError::ChannelError("Persist worker dropped shutdown".into()))
    }

    /// Returns a snapshot of the persistence counters.
    pub fn status(&self) -> PersistStatus {
        self.status.borrow().clone()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
