//! Application context - wires everything together

use anyhow::Context as _;
use ripple_bus::{NotificationBus, WatchtowerSubscriber};
use ripple_ledger::{LedgerConfig, RippleLedger};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Application context - ledger, bus and the subscribers fed by it
pub struct AppContext {
    pub ledger: Arc<RippleLedger>,
    pub bus: NotificationBus,
    subscribers: Vec<JoinHandle<()>>,
}

impl AppContext {
    /// Wire a fresh ledger to a bus sized from `config`.
    ///
    /// Must be called from within a tokio runtime when a watchtower path is
    /// configured.
    pub fn new(config: LedgerConfig) -> Self {
        let config = config.normalized();
        let bus = NotificationBus::with_capacity(config.notification_capacity);
        let watchtower_path = config.watchtower_path.clone();
        let ledger = Arc::new(RippleLedger::new(config).with_sink(Arc::new(bus.clone())));

        let mut subscribers = Vec::new();
        if let Some(path) = watchtower_path {
            tracing::info!(path = %path.display(), "Watchtower audit log enabled");
            let watchtower = WatchtowerSubscriber::new(ledger.clone(), path);
            subscribers.push(bus.spawn_subscriber(Arc::new(watchtower)));
        }

        Self {
            ledger,
            bus,
            subscribers,
        }
    }

    /// Load configuration (file if given, else defaults), apply
    /// `RIPPLE_*` overrides, then wire the context.
    pub fn from_config_file(path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => LedgerConfig::from_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => LedgerConfig::default(),
        };
        Ok(Self::new(config.apply_env()))
    }

    pub fn config(&self) -> &LedgerConfig {
        self.ledger.config()
    }

    /// Close the bus and wait for subscribers to drain
    pub async fn shutdown(self) {
        self.bus.close();
        for handle in self.subscribers {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Subscriber task panicked");
            }
        }
    }
}
