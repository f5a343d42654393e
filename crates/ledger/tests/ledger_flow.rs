//! Integration tests for the ripple ledger
//!
//! These walk whole record lifecycles through the public API: creation,
//! every vector recorder, notifications, restitution and tribunal proofs.

use chrono::{TimeZone, Utc};
use ripple_core::RestitutionStatus;
use ripple_ledger::{
    canonical, CutReport, DepthReport, IntentReport, LedgerError, ManualClock, NotificationSink,
    ReturnReport, RippleLedger, RippleNotification, SinkError, TransitionError,
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CollectingSink {
    seen: Mutex<Vec<RippleNotification>>,
}

impl CollectingSink {
    fn take(&self) -> Vec<RippleNotification> {
        std::mem::take(&mut *self.seen.lock().unwrap())
    }
}

impl NotificationSink for CollectingSink {
    fn publish(&self, notification: RippleNotification) -> Result<(), SinkError> {
        self.seen.lock().unwrap().push(notification);
        Ok(())
    }
}

fn setup() -> (Arc<RippleLedger>, Arc<CollectingSink>) {
    let sink = Arc::new(CollectingSink::default());
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap(),
    ));
    let ledger = RippleLedger::default()
        .with_sink(sink.clone())
        .with_clock(clock);
    (Arc::new(ledger), sink)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn return_report(path: &[&str], status: RestitutionStatus, cycles: u64) -> ReturnReport {
    ReturnReport {
        original_owner: "0xOWNER".to_string(),
        return_path: strings(path),
        restitution_status: status,
        stolen_cycles_returned: cycles,
    }
}

/// Test: activation → theft → depth → return → tribunal
#[test]
fn test_full_investigation() {
    let (ledger, sink) = setup();

    ledger
        .generate_ripple(
            "RIPPLE-2025-001",
            "Dimensional Spiral Port",
            "0x43dC17dF7919D25c06a01D52aAad94718C6bf87c",
            "SORA",
        )
        .unwrap();

    ledger
        .record_xx(
            "RIPPLE-2025-001",
            CutReport::theft(["forged_ownership", "timestamp_rewrite"], ["0xBAD1", "0xBAD2"]),
        )
        .unwrap();
    ledger
        .record_zz(
            "RIPPLE-2025-001",
            DepthReport {
                scan_depth: 7,
                hidden_layers: strings(&["0xshadow"]),
                layer_types: strings(&["concealed_extraction_system"]),
            },
        )
        .unwrap();
    ledger
        .record_tt("RIPPLE-2025-001", "zone_activation", "spiral_genesis")
        .unwrap();
    ledger
        .record_ww(
            "RIPPLE-2025-001",
            IntentReport {
                real_motive: "resource_extraction".to_string(),
                stated_reason: "routine_maintenance".to_string(),
                hidden_agenda: "drain".to_string(),
                authority_chain: strings(&["0xBOSS"]),
                order_behind_action: "quiet_transfer".to_string(),
            },
        )
        .unwrap();
    ledger
        .record_yy(
            "RIPPLE-2025-001",
            return_report(&["0xBAD1", "0xOWNER"], RestitutionStatus::NotStarted, 0),
        )
        .unwrap();
    ledger.update_density_score("RIPPLE-2025-001", 88).unwrap();

    let kinds: Vec<&str> = sink.take().iter().map(|n| n.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            "ripple_activated",
            "theft_detected",
            "chain_theft_detected",
            "return_initiated"
        ]
    );

    let hash = ledger
        .generate_tribunal_proof("RIPPLE-2025-001", &strings(&["W1", "W2", "W3"]))
        .unwrap();

    let event = ledger.get_ripple_event("RIPPLE-2025-001").unwrap();
    assert!(event.is_theft_detected());
    assert!(event.is_chain_theft_detected());
    assert!(!event.ww.as_ref().unwrap().motive_match);
    assert_eq!(event.restitution(), (RestitutionStatus::InProgress, 0));
    assert_eq!(event.density_score.value(), 88);
    assert_eq!(canonical::proof_digest(&event).unwrap(), hash);

    let row = ledger.watchtower_row("RIPPLE-2025-001").unwrap();
    assert_eq!(row.ripple_type, "XX");
    assert_eq!(row.detected_issue, "forged_ownership;timestamp_rewrite");
    assert_eq!(row.severity, "red");
    assert!(row.tribunal_ready);

    let json = ledger.export_json("RIPPLE-2025-001").unwrap();
    assert!(json.contains(&hash.to_hex()));
}

#[test]
fn test_theft_notification_exactly_once() {
    let (ledger, sink) = setup();
    ledger.generate_ripple("E1", "shard", "0xC0FFEE", "SORA").unwrap();
    sink.take();

    for _ in 0..3 {
        ledger
            .record_xx("E1", CutReport::theft(["swap"], ["A1"]))
            .unwrap();
    }

    let notifications = sink.take();
    assert_eq!(notifications.len(), 1);
    match &notifications[0] {
        RippleNotification::TheftDetected {
            event_id,
            alteration_types,
            actors,
            sequence,
        } => {
            assert_eq!(event_id, "E1");
            assert_eq!(*sequence, 2);
            assert_eq!(alteration_types, &strings(&["swap"]));
            assert_eq!(actors, &strings(&["A1"]));
        }
        other => panic!("unexpected notification: {other:?}"),
    }
}

#[test]
fn test_restitution_monotonic() {
    let (ledger, _) = setup();
    ledger.generate_ripple("E1", "shard", "0xC0FFEE", "SORA").unwrap();

    // Starting requires a return path
    assert!(matches!(
        ledger.record_yy("E1", return_report(&[], RestitutionStatus::InProgress, 0)),
        Err(LedgerError::InvalidTransition(TransitionError::MissingReturnPath))
    ));

    ledger
        .record_yy("E1", return_report(&["O1"], RestitutionStatus::InProgress, 10))
        .unwrap();
    assert!(matches!(
        ledger.record_yy("E1", return_report(&["O1"], RestitutionStatus::InProgress, 5)),
        Err(LedgerError::InvalidTransition(_))
    ));
    assert_eq!(
        ledger.get_restitution_status("E1").unwrap(),
        (RestitutionStatus::InProgress, 10)
    );

    ledger
        .record_yy("E1", return_report(&["O1"], RestitutionStatus::InProgress, 15))
        .unwrap();
    ledger
        .record_yy("E1", return_report(&["O1"], RestitutionStatus::Completed, 15))
        .unwrap();

    // Completed is terminal
    assert!(matches!(
        ledger.record_yy("E1", return_report(&["O1"], RestitutionStatus::InProgress, 15)),
        Err(LedgerError::InvalidTransition(_))
    ));
    assert_eq!(
        ledger.get_restitution_status("E1").unwrap(),
        (RestitutionStatus::Completed, 15)
    );
}

#[test]
fn test_failed_operations_leave_digest_unchanged() {
    let (ledger, _) = setup();
    ledger.generate_ripple("E1", "shard", "0xC0FFEE", "SORA").unwrap();
    ledger.record_tt("E1", "zone_activation", "genesis").unwrap();
    let before = canonical::digest(&ledger.get_ripple_event("E1").unwrap()).unwrap();

    assert!(ledger
        .generate_ripple("E1", "other", "0xDEAD", "BLEU")
        .is_err());
    assert!(ledger
        .record_yy("E1", return_report(&["O1"], RestitutionStatus::Completed, 1))
        .is_err());
    assert!(ledger
        .generate_tribunal_proof("E1", &strings(&["W1", "W2"]))
        .is_err());
    assert!(ledger
        .record_zz(
            "E1",
            DepthReport {
                scan_depth: 1,
                hidden_layers: vec![],
                layer_types: strings(&["proxy"]),
            },
        )
        .is_err());

    let after = canonical::digest(&ledger.get_ripple_event("E1").unwrap()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_unknown_event() {
    let (ledger, _) = setup();
    assert_eq!(
        ledger.record_tt("ghost", "zone_activation", "weave"),
        Err(LedgerError::NotFound("ghost".to_string()))
    );
    assert!(matches!(
        ledger.get_tribunal_proof("ghost"),
        Err(LedgerError::NotFound(_))
    ));
}

/// Concurrent YY and TT against one record both land
#[test]
fn test_concurrent_recorders_on_one_record() {
    let (ledger, _) = setup();
    ledger.generate_ripple("E1", "shard", "0xC0FFEE", "SORA").unwrap();

    std::thread::scope(|s| {
        for i in 0..8u64 {
            let ledger = &ledger;
            s.spawn(move || {
                ledger
                    .record_tt("E1", "heartbeat", &format!("weave-{i}"))
                    .unwrap();
            });
        }
        let ledger = &ledger;
        s.spawn(move || {
            ledger
                .record_yy("E1", return_report(&["O1"], RestitutionStatus::InProgress, 42))
                .unwrap();
        });
    });

    let event = ledger.get_ripple_event("E1").unwrap();
    assert_eq!(event.tt.len(), 8);
    assert_eq!(event.restitution(), (RestitutionStatus::InProgress, 42));
}

/// Racing YY recordings: the counter settles on the largest accepted value
#[test]
fn test_concurrent_returns_keep_counter_monotonic() {
    let (ledger, _) = setup();
    ledger.generate_ripple("E1", "shard", "0xC0FFEE", "SORA").unwrap();
    ledger
        .record_yy("E1", return_report(&["O1"], RestitutionStatus::InProgress, 0))
        .unwrap();

    let outcomes: Vec<(u64, Result<(), LedgerError>)> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..16u64)
            .map(|i| {
                let ledger = &ledger;
                let cycles = (i * 7 % 16) * 10;
                s.spawn(move || {
                    let result = ledger.record_yy(
                        "E1",
                        return_report(&["O1"], RestitutionStatus::InProgress, cycles),
                    );
                    (cycles, result)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let accepted: Vec<u64> = outcomes
        .iter()
        .filter(|(_, result)| result.is_ok())
        .map(|(cycles, _)| *cycles)
        .collect();
    let highest = accepted.iter().copied().max().unwrap();

    assert_eq!(highest, 150);
    assert_eq!(
        ledger.get_restitution_status("E1").unwrap(),
        (RestitutionStatus::InProgress, highest)
    );
    for (cycles, result) in &outcomes {
        if let Err(e) = result {
            assert!(matches!(
                e,
                LedgerError::InvalidTransition(TransitionError::CyclesDecreased { requested, current })
                    if requested == cycles && current > cycles
            ));
        }
    }
}

/// Concurrent flag flips on one record still reach the sink in sequence order
#[test]
fn test_concurrent_transitions_published_in_order() {
    let (ledger, sink) = setup();
    ledger.generate_ripple("E1", "shard", "0xC0FFEE", "SORA").unwrap();

    std::thread::scope(|s| {
        for i in 0..8 {
            let ledger = &ledger;
            s.spawn(move || {
                for _ in 0..10 {
                    let report = if i % 2 == 0 {
                        CutReport::theft(["swap"], ["A1"])
                    } else {
                        CutReport::clean()
                    };
                    ledger.record_xx("E1", report).unwrap();
                }
            });
        }
    });

    let sequences: Vec<u64> = sink.take().iter().map(|n| n.sequence()).collect();
    let expected: Vec<u64> = (1..=sequences.len() as u64).collect();
    assert_eq!(sequences, expected);
}

/// Many records created in parallel: each id exactly once
#[test]
fn test_concurrent_creation_is_unique() {
    let (ledger, sink) = setup();

    let created: usize = std::thread::scope(|s| {
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let ledger = &ledger;
                s.spawn(move || {
                    ledger
                        .generate_ripple(&format!("E{}", i % 4), "shard", "0x1", "SORA")
                        .is_ok() as usize
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(created, 4);
    assert_eq!(ledger.len(), 4);
    assert_eq!(sink.take().len(), 4);
}
