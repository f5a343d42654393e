//! Ripple Notification Bus - In-process async notification distribution
//!
//! Carries ledger notifications to subscribers (watchtower audit log, etc.)
//!
//! # Features
//! - Async pub/sub with tokio broadcast channel
//! - NotificationSubscriber trait for custom handlers
//! - Subscriber failures are logged, never propagated to the ledger

pub mod channel;
pub mod error;
pub mod subscriber;
pub mod watchtower;

pub use channel::{NotificationBus, NotificationReceiver, DEFAULT_CAPACITY};
pub use error::BusError;
pub use subscriber::{run_subscriber, NotificationSubscriber};
pub use watchtower::WatchtowerSubscriber;
