//! Ledger notifications and the sink they are published to
//!
//! Notifications fire once per flag transition, after the mutation has been
//! committed. Delivery is best-effort: a failing sink never rolls back or
//! fails the mutation that produced the notification.
//!
//! Every notification carries a `sequence`, its position among the
//! transitions of its record. Activation is 1 and each later transition
//! takes the next number, so `(event_id, sequence)` names one transition and
//! a redelivered copy can be recognised.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SinkError;

/// Notifications emitted by the ripple ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RippleNotification {
    /// A new record was created
    RippleActivated {
        event_id: String,
        origin_shard: String,
        contract_address: String,
        timestamp: DateTime<Utc>,
        sequence: u64,
    },

    /// The theft flag went from false to true
    TheftDetected {
        event_id: String,
        alteration_types: Vec<String>,
        actors: Vec<String>,
        sequence: u64,
    },

    /// The chain-theft flag went from false to true
    ChainTheftDetected {
        event_id: String,
        hidden_layers: Vec<String>,
        sequence: u64,
    },

    /// Restitution moved from NotStarted to InProgress
    ReturnInitiated {
        event_id: String,
        original_owner: String,
        stolen_cycles: u64,
        sequence: u64,
    },
}

impl RippleNotification {
    pub fn event_id(&self) -> &str {
        match self {
            RippleNotification::RippleActivated { event_id, .. } => event_id,
            RippleNotification::TheftDetected { event_id, .. } => event_id,
            RippleNotification::ChainTheftDetected { event_id, .. } => event_id,
            RippleNotification::ReturnInitiated { event_id, .. } => event_id,
        }
    }

    /// Per-record transition number, 0 until the ledger commits it
    pub fn sequence(&self) -> u64 {
        match self {
            RippleNotification::RippleActivated { sequence, .. }
            | RippleNotification::TheftDetected { sequence, .. }
            | RippleNotification::ChainTheftDetected { sequence, .. }
            | RippleNotification::ReturnInitiated { sequence, .. } => *sequence,
        }
    }

    pub(crate) fn sequenced(mut self, next: u64) -> Self {
        match &mut self {
            RippleNotification::RippleActivated { sequence, .. }
            | RippleNotification::TheftDetected { sequence, .. }
            | RippleNotification::ChainTheftDetected { sequence, .. }
            | RippleNotification::ReturnInitiated { sequence, .. } => *sequence = next,
        }
        self
    }

    /// Stable snake_case name of the notification kind
    pub fn kind(&self) -> &'static str {
        match self {
            RippleNotification::RippleActivated { .. } => "ripple_activated",
            RippleNotification::TheftDetected { .. } => "theft_detected",
            RippleNotification::ChainTheftDetected { .. } => "chain_theft_detected",
            RippleNotification::ReturnInitiated { .. } => "return_initiated",
        }
    }
}

/// Destination for ledger notifications
///
/// The ledger publishes while it still holds the record lock, so a record's
/// notifications reach the sink in sequence order. Implementations must not
/// block or call back into the ledger; they hand the notification off (for
/// example to a channel) and return.
pub trait NotificationSink: Send + Sync {
    fn publish(&self, notification: RippleNotification) -> Result<(), SinkError>;
}

/// Sink that drops everything (the default when nothing is wired)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn publish(&self, _notification: RippleNotification) -> Result<(), SinkError> {
        Ok(())
    }
}
