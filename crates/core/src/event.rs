//! RippleEvent - one provenance record per event id

use crate::digest::Hash32;
use crate::score::DensityScore;
use crate::status::RestitutionStatus;
use crate::vectors::{CutVector, DepthVector, IntentVector, ReturnVector, TimeVector, TribunalProof};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A complete ripple record.
///
/// Identity and provenance tags are fixed at creation. The vectors, the
/// density score and the proof are only ever changed by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RippleEvent {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub origin_shard: String,
    pub contract_address: String,
    pub umbrella: String,

    /// Absent until the first XX recording
    pub xx: Option<CutVector>,
    pub yy: ReturnVector,
    /// Absent until the first ZZ recording
    pub zz: Option<DepthVector>,
    pub tt: TimeVector,
    /// Absent until the first WW recording
    pub ww: Option<IntentVector>,

    pub density_score: DensityScore,
    pub tribunal_proof: Option<TribunalProof>,
}

impl RippleEvent {
    /// A fresh record with empty vectors
    pub fn new(
        event_id: impl Into<String>,
        origin_shard: impl Into<String>,
        contract_address: impl Into<String>,
        umbrella: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            timestamp,
            origin_shard: origin_shard.into(),
            contract_address: contract_address.into(),
            umbrella: umbrella.into(),
            xx: None,
            yy: ReturnVector::default(),
            zz: None,
            tt: TimeVector::default(),
            ww: None,
            density_score: DensityScore::default(),
            tribunal_proof: None,
        }
    }

    pub fn is_theft_detected(&self) -> bool {
        self.xx.as_ref().is_some_and(|xx| xx.detected_alteration)
    }

    pub fn is_chain_theft_detected(&self) -> bool {
        self.zz.as_ref().is_some_and(|zz| zz.chain_theft_detected)
    }

    pub fn restitution(&self) -> (RestitutionStatus, u64) {
        (self.yy.restitution_status, self.yy.stolen_cycles_returned)
    }

    /// True once a tribunal proof has been generated
    pub fn tribunal_ready(&self) -> bool {
        self.tribunal_proof.is_some()
    }

    pub fn proof_hash(&self) -> Option<Hash32> {
        self.tribunal_proof.as_ref().map(|p| p.proof_hash)
    }

    /// Alteration types recorded by XX, empty if none
    pub fn alteration_types(&self) -> &[String] {
        self.xx
            .as_ref()
            .map(|xx| xx.alteration_types.as_slice())
            .unwrap_or(&[])
    }
}
