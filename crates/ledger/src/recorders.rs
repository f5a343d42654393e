//! Vector recorders
//!
//! Each recorder validates one report and replaces its vector in place.
//! Recorders run against a staged copy of the record; the ledger only
//! commits the copy when the recorder returns `Ok`, so a rejected report
//! never leaves a partial write behind.

use chrono::{DateTime, Utc};
use ripple_core::{
    CutVector, DepthVector, Hash32, IntentVector, RestitutionStatus, ReturnVector, RippleEvent,
    TemporalEntry,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::canonical;
use crate::detection;
use crate::error::{LedgerError, LedgerResult};
use crate::restitution;

/// XX report: evidence of alteration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CutReport {
    pub detected_alteration: bool,
    #[serde(default)]
    pub alteration_types: Vec<String>,
    #[serde(default)]
    pub actors: Vec<String>,
}

impl CutReport {
    /// Report a detected alteration
    pub fn theft<S: Into<String>>(
        alteration_types: impl IntoIterator<Item = S>,
        actors: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            detected_alteration: true,
            alteration_types: alteration_types.into_iter().map(Into::into).collect(),
            actors: actors.into_iter().map(Into::into).collect(),
        }
    }

    /// Report that nothing was altered
    pub fn clean() -> Self {
        Self::default()
    }
}

/// YY report: return to source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnReport {
    pub original_owner: String,
    #[serde(default)]
    pub return_path: Vec<String>,
    #[serde(default)]
    pub restitution_status: RestitutionStatus,
    #[serde(default)]
    pub stolen_cycles_returned: u64,
}

/// ZZ report: depth scan results
///
/// Chain theft is always derived from `hidden_layers`; there is no way to
/// assert it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthReport {
    pub scan_depth: u64,
    #[serde(default)]
    pub hidden_layers: Vec<String>,
    #[serde(default)]
    pub layer_types: Vec<String>,
}

/// WW report: motive and authority
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntentReport {
    #[serde(default)]
    pub real_motive: String,
    #[serde(default)]
    pub stated_reason: String,
    #[serde(default)]
    pub hidden_agenda: String,
    #[serde(default)]
    pub authority_chain: Vec<String>,
    #[serde(default)]
    pub order_behind_action: String,
}

/// Fields the XX signature covers
#[derive(Serialize)]
struct CutEvidence<'a> {
    event_id: &'a str,
    detected_alteration: bool,
    alteration_types: &'a [String],
    actors: &'a BTreeSet<String>,
}

pub fn record_cut(event: &mut RippleEvent, report: CutReport) -> LedgerResult<()> {
    if report.detected_alteration {
        if report.alteration_types.is_empty() {
            return Err(LedgerError::invalid_vector(
                "XX",
                "detected alteration requires at least one alteration type",
            ));
        }
        if report.actors.is_empty() {
            return Err(LedgerError::invalid_vector(
                "XX",
                "detected alteration requires at least one actor",
            ));
        }
    }

    let actors: BTreeSet<String> = report.actors.into_iter().collect();
    let signature = canonical::digest_value(&CutEvidence {
        event_id: &event.event_id,
        detected_alteration: report.detected_alteration,
        alteration_types: &report.alteration_types,
        actors: &actors,
    })?;

    event.xx = Some(CutVector {
        detected_alteration: report.detected_alteration,
        alteration_types: report.alteration_types,
        signature,
        actors,
    });
    Ok(())
}

pub fn record_return(event: &mut RippleEvent, report: ReturnReport) -> LedgerResult<()> {
    let status = restitution::resolve(
        &event.yy,
        report.restitution_status,
        !report.return_path.is_empty(),
        report.stolen_cycles_returned,
    )?;

    event.yy = ReturnVector {
        original_owner: report.original_owner,
        return_path: report.return_path,
        restitution_status: status,
        stolen_cycles_returned: report.stolen_cycles_returned,
    };
    Ok(())
}

pub fn record_depth(event: &mut RippleEvent, report: DepthReport) -> LedgerResult<()> {
    if report.hidden_layers.len() != report.layer_types.len() {
        return Err(LedgerError::invalid_vector(
            "ZZ",
            format!(
                "{} hidden layers but {} layer types",
                report.hidden_layers.len(),
                report.layer_types.len()
            ),
        ));
    }

    event.zz = Some(DepthVector {
        scan_depth: report.scan_depth,
        chain_theft_detected: false,
        hidden_layers: report.hidden_layers,
        layer_types: report.layer_types,
    });
    let derived = detection::chain_theft_detected(event);
    if let Some(zz) = event.zz.as_mut() {
        zz.chain_theft_detected = derived;
    }
    Ok(())
}

/// Append a temporal entry; the memory hash is assigned here, never by callers.
pub fn record_time(
    event: &mut RippleEvent,
    event_type: &str,
    memory_weave: &str,
    recorded_at: DateTime<Utc>,
) -> Hash32 {
    let interval_ms = event
        .tt
        .last()
        .map(|prev| (recorded_at - prev.recorded_at).num_milliseconds())
        .unwrap_or(0);
    let memory_hash = canonical::memory_hash(memory_weave, recorded_at);

    event.tt.events.push(TemporalEntry {
        event_type: event_type.to_string(),
        memory_weave: memory_weave.to_string(),
        memory_hash,
        recorded_at,
        interval_ms,
    });
    memory_hash
}

pub fn record_intent(event: &mut RippleEvent, report: IntentReport) {
    let motive_match = report.real_motive == report.stated_reason;
    event.ww = Some(IntentVector {
        real_motive: report.real_motive,
        stated_reason: report.stated_reason,
        hidden_agenda: report.hidden_agenda,
        authority_chain: report.authority_chain,
        order_behind_action: report.order_behind_action,
        motive_match,
    });
}
