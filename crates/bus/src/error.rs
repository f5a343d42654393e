//! Notification bus errors

use thiserror::Error;

/// Errors that can occur in the notification bus and its subscribers
#[derive(Error, Debug)]
pub enum BusError {
    #[error("Subscriber '{name}' failed: {reason}")]
    SubscriberFailed { name: String, reason: String },

    #[error("Ledger error: {0}")]
    Ledger(#[from] ripple_ledger::LedgerError),

    #[error("Audit log I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Audit log encoding error: {0}")]
    Csv(#[from] csv::Error),
}
