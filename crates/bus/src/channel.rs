//! In-process notification bus
//!
//! Wraps a tokio broadcast channel. The ledger publishes synchronously
//! through `NotificationSink`; each subscriber drains its own receiver on a
//! spawned task.

use ripple_ledger::{NotificationSink, RippleNotification, SinkError};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::subscriber::{run_subscriber, NotificationSubscriber};

/// Receiver type for bus notifications
pub type NotificationReceiver = broadcast::Receiver<Arc<RippleNotification>>;

/// Default channel capacity
pub const DEFAULT_CAPACITY: usize = 1024;

/// Broadcast bus for ledger notifications
#[derive(Clone)]
pub struct NotificationBus {
    tx: broadcast::Sender<Arc<RippleNotification>>,
    closed: Arc<watch::Sender<bool>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create with custom capacity (0 is raised to 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        let (closed, _) = watch::channel(false);
        Self {
            tx,
            closed: Arc::new(closed),
        }
    }

    /// Subscribe to receive every notification published from now on
    pub fn subscribe(&self) -> NotificationReceiver {
        self.tx.subscribe()
    }

    /// Get the number of active receivers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Drive `subscriber` from a fresh receiver on a spawned task.
    ///
    /// Must be called from within a tokio runtime. The task ends after
    /// `close` (once it has drained what was already published) or once
    /// every handle to this bus has been dropped.
    pub fn spawn_subscriber(&self, subscriber: Arc<dyn NotificationSubscriber>) -> JoinHandle<()> {
        let rx = self.subscribe();
        let closed = self.closed.subscribe();
        tracing::debug!(subscriber = subscriber.name(), "Subscriber attached");
        tokio::spawn(run_subscriber(rx, closed, subscriber))
    }

    /// Ask spawned subscribers to finish.
    ///
    /// Subscribers often hold the ledger, which holds this bus, so dropping
    /// handles alone never closes the channel.
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for NotificationBus {
    fn publish(&self, notification: RippleNotification) -> Result<(), SinkError> {
        // send() returns error if there are no receivers, which is fine
        if let Err(e) = self.tx.send(Arc::new(notification)) {
            tracing::debug!(kind = e.0.kind(), "Notification dropped (no receivers)");
        }
        Ok(())
    }
}
