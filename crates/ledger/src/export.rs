//! Record exports - JSON snapshot and Watchtower CSV row

use chrono::{DateTime, Utc};
use ripple_core::RippleEvent;
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::notification::RippleNotification;

/// Column order of the Watchtower audit CSV
pub const WATCHTOWER_HEADER: [&str; 7] = [
    "timestamp",
    "event_id",
    "origin_shard",
    "ripple_type",
    "detected_issue",
    "severity",
    "tribunal_ready",
];

/// One Watchtower audit line, for a record or for one of its transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchtowerRow {
    pub timestamp: DateTime<Utc>,
    pub event_id: String,
    pub origin_shard: String,
    /// `XX` when theft was detected, `legitimate` otherwise; transition rows
    /// name the vector that caused them
    pub ripple_type: &'static str,
    /// Evidence joined with `;`, or `none`
    pub detected_issue: String,
    /// `red` for theft and chain theft, `green` otherwise
    pub severity: &'static str,
    pub tribunal_ready: bool,
}

impl WatchtowerRow {
    pub fn from_event(event: &RippleEvent) -> Self {
        let theft = event.is_theft_detected();
        let types = event.alteration_types();

        Self {
            timestamp: event.timestamp,
            event_id: event.event_id.clone(),
            origin_shard: event.origin_shard.clone(),
            ripple_type: if theft { "XX" } else { "legitimate" },
            detected_issue: issue(types),
            severity: if theft { "red" } else { "green" },
            tribunal_ready: event.tribunal_ready(),
        }
    }

    /// Row for one transition of `event`
    ///
    /// The issue columns come from the notification payload, so a row keeps
    /// the evidence that raised the flag even if the record changed since.
    pub fn for_transition(event: &RippleEvent, notification: &RippleNotification) -> Self {
        let (ripple_type, detected_issue, severity) = match notification {
            RippleNotification::RippleActivated { .. } => ("legitimate", issue(&[]), "green"),
            RippleNotification::TheftDetected {
                alteration_types, ..
            } => ("XX", issue(alteration_types), "red"),
            RippleNotification::ChainTheftDetected { hidden_layers, .. } => {
                ("ZZ", issue(hidden_layers), "red")
            }
            RippleNotification::ReturnInitiated { .. } => ("YY", issue(&[]), "green"),
        };

        Self {
            timestamp: event.timestamp,
            event_id: event.event_id.clone(),
            origin_shard: event.origin_shard.clone(),
            ripple_type,
            detected_issue,
            severity,
            tribunal_ready: event.tribunal_ready(),
        }
    }

    /// Render as a single CSV line (no trailing newline)
    pub fn to_csv_line(&self) -> LedgerResult<String> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer
            .serialize(self)
            .map_err(|e| LedgerError::Encoding(e.to_string()))?;
        let bytes = writer
            .into_inner()
            .map_err(|e| LedgerError::Encoding(e.to_string()))?;
        let line = String::from_utf8(bytes).map_err(|e| LedgerError::Encoding(e.to_string()))?;
        Ok(line.trim_end_matches('\n').to_string())
    }
}

fn issue(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(";")
    }
}

/// Pretty JSON snapshot of a record
pub fn to_json(event: &RippleEvent) -> LedgerResult<String> {
    Ok(serde_json::to_string_pretty(event)?)
}
