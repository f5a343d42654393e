//! The five evidence vectors attached to a ripple event
//!
//! - XX (the cut): who altered the path
//! - YY (the return): the path back to the original owner
//! - ZZ (the depth): hidden intermediary layers
//! - TT (the time): append-only temporal log
//! - WW (the intent): stated vs real motive
//!
//! Plus the tribunal proof bundle. Fields marked "derived" are computed by
//! the ledger's recorders and never taken from callers.

use crate::digest::Hash32;
use crate::status::RestitutionStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// XX vector - evidence of alteration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutVector {
    pub detected_alteration: bool,

    /// Kinds of alteration observed, in report order
    pub alteration_types: Vec<String>,

    /// Digest over the evidence fields (derived)
    pub signature: Hash32,

    /// Addresses implicated in the alteration
    pub actors: BTreeSet<String>,
}

/// YY vector - return to source
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReturnVector {
    pub original_owner: String,
    pub return_path: Vec<String>,
    pub restitution_status: RestitutionStatus,

    /// Never decreases across successive recordings
    pub stolen_cycles_returned: u64,
}

/// ZZ vector - depth scan results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthVector {
    pub scan_depth: u64,
    pub hidden_layers: Vec<String>,

    /// Same length as `hidden_layers`
    pub layer_types: Vec<String>,

    /// Derived: `!hidden_layers.is_empty()`
    pub chain_theft_detected: bool,
}

/// One entry of the TT temporal log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalEntry {
    pub event_type: String,
    pub memory_weave: String,

    /// SHA-256 of `memory_weave` followed by `recorded_at` (derived)
    pub memory_hash: Hash32,

    pub recorded_at: DateTime<Utc>,

    /// Milliseconds since the previous entry, 0 for the first
    pub interval_ms: i64,
}

/// TT vector - append-only temporal log
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeVector {
    pub events: Vec<TemporalEntry>,
}

impl TimeVector {
    pub fn last(&self) -> Option<&TemporalEntry> {
        self.events.last()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// WW vector - intent analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentVector {
    pub real_motive: String,
    pub stated_reason: String,
    pub hidden_agenda: String,
    pub authority_chain: Vec<String>,
    pub order_behind_action: String,

    /// Derived: `real_motive == stated_reason`
    pub motive_match: bool,
}

/// Quorum-attested proof over a record's canonical encoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TribunalProof {
    /// Digest of the canonical record encoding (without the proof)
    pub proof_hash: Hash32,

    /// Digest binding `proof_hash` to the witness set
    pub seal: Hash32,

    /// Distinct witness addresses
    pub witnesses: BTreeSet<String>,

    pub generated_at: DateTime<Utc>,
}
