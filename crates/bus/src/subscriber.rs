//! Notification subscriber trait and the loop that drives it

use async_trait::async_trait;
use ripple_ledger::RippleNotification;
use std::sync::Arc;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::watch;

use crate::channel::NotificationReceiver;
use crate::error::BusError;

/// Trait for notification subscribers
///
/// Subscribers receive notifications from the bus and process them
/// asynchronously. A subscriber error is logged and never reaches the
/// ledger. Each subscriber should be idempotent.
#[async_trait]
pub trait NotificationSubscriber: Send + Sync {
    /// Get the subscriber name (for logging)
    fn name(&self) -> &str;

    /// Handle one ledger notification
    async fn handle(&self, notification: &RippleNotification) -> Result<(), BusError>;
}

/// Feed `rx` into `subscriber` until the bus is closed or dropped.
///
/// On close, whatever is already queued is still delivered.
pub async fn run_subscriber(
    mut rx: NotificationReceiver,
    mut closed: watch::Receiver<bool>,
    subscriber: Arc<dyn NotificationSubscriber>,
) {
    let mut watching = true;
    loop {
        if watching && *closed.borrow_and_update() {
            drain(&mut rx, subscriber.as_ref()).await;
            break;
        }

        tokio::select! {
            biased;
            received = rx.recv() => match received {
                Ok(notification) => deliver(subscriber.as_ref(), &notification).await,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(subscriber = subscriber.name(), skipped, "Subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            },
            changed = closed.changed(), if watching => {
                // Every bus handle is gone; recv() reports Closed after the backlog
                if changed.is_err() {
                    watching = false;
                }
            }
        }
    }
    tracing::debug!(subscriber = subscriber.name(), "Subscriber stopped");
}

async fn drain(rx: &mut NotificationReceiver, subscriber: &dyn NotificationSubscriber) {
    loop {
        match rx.try_recv() {
            Ok(notification) => deliver(subscriber, &notification).await,
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(subscriber = subscriber.name(), skipped, "Subscriber lagged");
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}

async fn deliver(subscriber: &dyn NotificationSubscriber, notification: &RippleNotification) {
    if let Err(e) = subscriber.handle(notification).await {
        tracing::error!(
            subscriber = subscriber.name(),
            event_id = notification.event_id(),
            kind = notification.kind(),
            error = %e,
            "Subscriber failed"
        );
    }
}
