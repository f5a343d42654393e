//! Ripple ledger - owns every record and serializes mutation per event id
//!
//! ```text
//! caller ──► RippleLedger::record_* ──► per-record lock
//!                                          │ clone → recorder → detection diff
//!                                          ▼
//!                                   commit staged copy
//!                                          │ number transitions
//!                                          ▼
//!                                   NotificationSink::publish
//!                                          │
//!                                          ▼
//!                                     lock released
//! ```
//!
//! Distinct event ids never contend on the same lock. Readers clone a
//! snapshot under the record lock, so a half-applied vector is never visible.

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ripple_core::{DensityScore, Hash32, RestitutionStatus, RippleEvent};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::clock::{Clock, SystemClock};
use crate::config::LedgerConfig;
use crate::detection::{self, DetectionFlags};
use crate::error::{LedgerError, LedgerResult};
use crate::export::{self, WatchtowerRow};
use crate::notification::{NotificationSink, NullSink, RippleNotification};
use crate::recorders::{self, CutReport, DepthReport, IntentReport, ReturnReport};
use crate::restitution;
use crate::tribunal;

/// A record and the number of transitions it has announced so far
///
/// The counter lives beside the event so it never enters the canonical hash.
struct Record {
    event: RippleEvent,
    transitions: u64,
}

impl Record {
    fn announce(&mut self, notifications: Vec<RippleNotification>) -> Vec<RippleNotification> {
        notifications
            .into_iter()
            .map(|notification| {
                self.transitions += 1;
                notification.sequenced(self.transitions)
            })
            .collect()
    }
}

type RecordCell = Arc<Mutex<Record>>;

/// Tribunal proof as reported by `get_tribunal_proof`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofStatus {
    pub proof_hash: Option<Hash32>,
    pub witnesses: BTreeSet<String>,
    pub ready: bool,
}

/// The single coordinating ledger instance.
///
/// Construct once at start-up and share by `Arc`; there is no global.
pub struct RippleLedger {
    records: DashMap<String, RecordCell>,
    config: LedgerConfig,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn NotificationSink>,
}

impl RippleLedger {
    /// Create an empty ledger with the system clock and no subscribers
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            records: DashMap::new(),
            config: config.normalized(),
            clock: Arc::new(SystemClock),
            sink: Arc::new(NullSink),
        }
    }

    /// Route notifications to `sink`
    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Take time from `clock`
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // === Creation ===

    /// Create a record. Fails with `DuplicateEvent` if the id was ever used.
    pub fn generate_ripple(
        &self,
        event_id: &str,
        origin_shard: &str,
        contract_address: &str,
        umbrella: &str,
    ) -> LedgerResult<RippleEvent> {
        let event = RippleEvent::new(
            event_id,
            origin_shard,
            contract_address,
            umbrella,
            self.clock.now(),
        );

        let activated = RippleNotification::RippleActivated {
            event_id: event.event_id.clone(),
            origin_shard: event.origin_shard.clone(),
            contract_address: event.contract_address.clone(),
            timestamp: event.timestamp,
            sequence: 1,
        };

        // The map shard stays locked until the activation is out, so no
        // mutation of this record can publish ahead of it
        match self.records.entry(event_id.to_string()) {
            Entry::Occupied(_) => {
                tracing::debug!(event_id, "Rejected duplicate ripple");
                return Err(LedgerError::DuplicateEvent(event_id.to_string()));
            }
            Entry::Vacant(slot) => {
                let record = slot.insert(Arc::new(Mutex::new(Record {
                    event: event.clone(),
                    transitions: 1,
                })));
                tracing::info!(
                    event_id,
                    origin_shard,
                    contract_address,
                    umbrella,
                    "Ripple activated"
                );
                self.publish(vec![activated]);
                drop(record);
            }
        }

        Ok(event)
    }

    // === Vector recorders ===

    /// XX: record (or clear) evidence of alteration
    pub fn record_xx(&self, event_id: &str, report: CutReport) -> LedgerResult<()> {
        self.mutate(event_id, "XX", |event, _| recorders::record_cut(event, report))
    }

    /// YY: record return-to-source progress
    pub fn record_yy(&self, event_id: &str, report: ReturnReport) -> LedgerResult<()> {
        self.mutate(event_id, "YY", |event, _| {
            recorders::record_return(event, report)
        })
    }

    /// ZZ: record a depth scan; chain theft is derived from the layers
    pub fn record_zz(&self, event_id: &str, report: DepthReport) -> LedgerResult<()> {
        self.mutate(event_id, "ZZ", |event, _| recorders::record_depth(event, report))
    }

    /// TT: append a temporal entry and return its memory hash
    pub fn record_tt(
        &self,
        event_id: &str,
        event_type: &str,
        memory_weave: &str,
    ) -> LedgerResult<Hash32> {
        self.mutate(event_id, "TT", |event, now| {
            Ok(recorders::record_time(event, event_type, memory_weave, now))
        })
    }

    /// WW: record motive analysis
    pub fn record_ww(&self, event_id: &str, report: IntentReport) -> LedgerResult<()> {
        self.mutate(event_id, "WW", |event, _| {
            recorders::record_intent(event, report);
            Ok(())
        })
    }

    /// Store a clamped density score and return it
    pub fn update_density_score(&self, event_id: &str, score: i64) -> LedgerResult<DensityScore> {
        self.mutate(event_id, "density", |event, _| {
            Ok(crate::density::update_density(event, score))
        })
    }

    /// Attach an immutable tribunal proof and return its hash
    pub fn generate_tribunal_proof(
        &self,
        event_id: &str,
        witnesses: &[String],
    ) -> LedgerResult<Hash32> {
        let quorum = self.config.min_witnesses;
        let proof = self.mutate(event_id, "tribunal", |event, now| {
            tribunal::generate_proof(event, witnesses, quorum, now)
        })?;

        tracing::info!(
            event_id,
            proof_hash = %proof.proof_hash,
            witnesses = proof.witnesses.len(),
            "Tribunal proof generated"
        );
        Ok(proof.proof_hash)
    }

    // === Queries ===

    /// Consistent snapshot of a record
    pub fn get_ripple_event(&self, event_id: &str) -> LedgerResult<RippleEvent> {
        self.read(event_id, RippleEvent::clone)
    }

    pub fn is_theft_detected(&self, event_id: &str) -> LedgerResult<bool> {
        self.read(event_id, detection::theft_detected)
    }

    pub fn is_chain_theft_detected(&self, event_id: &str) -> LedgerResult<bool> {
        self.read(event_id, detection::chain_theft_detected)
    }

    /// `(status, stolen_cycles_returned)`
    pub fn get_restitution_status(
        &self,
        event_id: &str,
    ) -> LedgerResult<(RestitutionStatus, u64)> {
        self.read(event_id, RippleEvent::restitution)
    }

    pub fn get_tribunal_proof(&self, event_id: &str) -> LedgerResult<ProofStatus> {
        self.read(event_id, |event| match &event.tribunal_proof {
            Some(proof) => ProofStatus {
                proof_hash: Some(proof.proof_hash),
                witnesses: proof.witnesses.clone(),
                ready: true,
            },
            None => ProofStatus {
                proof_hash: None,
                witnesses: BTreeSet::new(),
                ready: false,
            },
        })
    }

    /// Recompute the stored proof over the current record
    pub fn verify_tribunal_proof(&self, event_id: &str) -> LedgerResult<bool> {
        self.read(event_id, tribunal::verify_proof)?
    }

    pub fn export_json(&self, event_id: &str) -> LedgerResult<String> {
        self.read(event_id, export::to_json)?
    }

    pub fn watchtower_row(&self, event_id: &str) -> LedgerResult<WatchtowerRow> {
        self.read(event_id, WatchtowerRow::from_event)
    }

    /// Audit row for one published transition
    pub fn transition_row(&self, notification: &RippleNotification) -> LedgerResult<WatchtowerRow> {
        self.read(notification.event_id(), |event| {
            WatchtowerRow::for_transition(event, notification)
        })
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.records.contains_key(event_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All event ids, sorted
    pub fn event_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.records.iter().map(|r| r.key().clone()).collect();
        ids.sort();
        ids
    }

    // === Internals ===

    fn cell(&self, event_id: &str) -> LedgerResult<RecordCell> {
        // Clone the handle so the map shard is released before locking the record
        self.records
            .get(event_id)
            .map(|r| Arc::clone(r.value()))
            .ok_or_else(|| LedgerError::NotFound(event_id.to_string()))
    }

    fn read<T>(&self, event_id: &str, f: impl FnOnce(&RippleEvent) -> T) -> LedgerResult<T> {
        let cell = self.cell(event_id)?;
        let guard = lock(&cell);
        Ok(f(&guard.event))
    }

    /// Run `f` against a staged copy and commit it only on success.
    ///
    /// Transitions are numbered and published before the record lock is
    /// released.
    fn mutate<T>(
        &self,
        event_id: &str,
        op: &'static str,
        f: impl FnOnce(&mut RippleEvent, DateTime<Utc>) -> LedgerResult<T>,
    ) -> LedgerResult<T> {
        let cell = self.cell(event_id)?;

        let mut guard = lock(&cell);
        let mut staged = guard.event.clone();
        let flags = DetectionFlags::of(&guard.event);
        let status = guard.event.yy.restitution_status;

        let output = f(&mut staged, self.clock.now()).map_err(|e| {
            tracing::debug!(event_id, op, error = %e, "Rejected mutation");
            e
        })?;

        let mut notifications = detection::transitions(flags, &staged);
        notifications.extend(restitution::initiated(status, &staged));

        guard.event = staged;
        let notifications = guard.announce(notifications);
        self.publish(notifications);
        Ok(output)
    }

    fn publish(&self, notifications: Vec<RippleNotification>) {
        for notification in notifications {
            let kind = notification.kind();
            let sequence = notification.sequence();
            let event_id = notification.event_id().to_string();
            if let Err(e) = self.sink.publish(notification) {
                tracing::warn!(event_id = %event_id, kind, sequence, error = %e, "Notification delivery failed");
            }
        }
    }
}

impl Default for RippleLedger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

// Mutations only ever assign a fully validated copy, so a poisoned record
// still holds a consistent value.
fn lock(cell: &Mutex<Record>) -> MutexGuard<'_, Record> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}
