//! Detection engine - derived theft flags
//!
//! Pure functions of the current record. The ledger evaluates them before
//! and after each write and only notifies on a false → true edge, so
//! re-recording an unchanged detection-relevant value stays silent.

use ripple_core::RippleEvent;

use crate::notification::RippleNotification;

/// `xx.detected_alteration`, false while XX is absent
pub fn theft_detected(event: &RippleEvent) -> bool {
    event.xx.as_ref().is_some_and(|xx| xx.detected_alteration)
}

/// `len(zz.hidden_layers) > 0`, false while ZZ is absent
pub fn chain_theft_detected(event: &RippleEvent) -> bool {
    event
        .zz
        .as_ref()
        .is_some_and(|zz| !zz.hidden_layers.is_empty())
}

/// Snapshot of every derived flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetectionFlags {
    pub theft: bool,
    pub chain_theft: bool,
}

impl DetectionFlags {
    pub fn of(event: &RippleEvent) -> Self {
        Self {
            theft: theft_detected(event),
            chain_theft: chain_theft_detected(event),
        }
    }
}

/// Notifications for flags that rose between `before` and `after`
pub fn transitions(before: DetectionFlags, after: &RippleEvent) -> Vec<RippleNotification> {
    let now = DetectionFlags::of(after);
    let mut notifications = Vec::new();

    if !before.theft && now.theft {
        let (alteration_types, actors): (Vec<String>, Vec<String>) = after
            .xx
            .as_ref()
            .map(|xx| (xx.alteration_types.clone(), xx.actors.iter().cloned().collect()))
            .unwrap_or_default();

        tracing::warn!(
            event_id = %after.event_id,
            alterations = ?alteration_types,
            "Theft detected"
        );
        notifications.push(RippleNotification::TheftDetected {
            event_id: after.event_id.clone(),
            alteration_types,
            actors,
            sequence: 0,
        });
    }

    if !before.chain_theft && now.chain_theft {
        let hidden_layers = after
            .zz
            .as_ref()
            .map(|zz| zz.hidden_layers.clone())
            .unwrap_or_default();

        tracing::warn!(
            event_id = %after.event_id,
            layers = hidden_layers.len(),
            "Chain theft detected"
        );
        notifications.push(RippleNotification::ChainTheftDetected {
            event_id: after.event_id.clone(),
            hidden_layers,
            sequence: 0,
        });
    }

    notifications
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ripple_core::{CutVector, DepthVector, Hash32};
    use std::collections::BTreeSet;

    fn create_event() -> RippleEvent {
        RippleEvent::new("E1", "shard", "0xC0FFEE", "SORA", Utc::now())
    }

    fn cut(detected: bool) -> CutVector {
        CutVector {
            detected_alteration: detected,
            alteration_types: if detected { vec!["swap".to_string()] } else { vec![] },
            signature: Hash32::ZERO,
            actors: if detected {
                BTreeSet::from(["A1".to_string()])
            } else {
                BTreeSet::new()
            },
        }
    }

    #[test]
    fn test_absent_vectors_are_clean() {
        let event = create_event();
        assert_eq!(DetectionFlags::of(&event), DetectionFlags::default());
    }

    #[test]
    fn test_rising_edge_notifies_once() {
        let before = create_event();
        let mut after = before.clone();
        after.xx = Some(cut(true));

        let notifications = transitions(DetectionFlags::of(&before), &after);
        assert_eq!(notifications.len(), 1);
        assert!(matches!(
            &notifications[0],
            RippleNotification::TheftDetected { actors, .. } if actors == &vec!["A1".to_string()]
        ));

        // Same value again: no edge
        let again = transitions(DetectionFlags::of(&after), &after);
        assert!(again.is_empty());
    }

    #[test]
    fn test_falling_edge_is_silent() {
        let mut before = create_event();
        before.xx = Some(cut(true));
        let mut after = before.clone();
        after.xx = Some(cut(false));

        assert!(transitions(DetectionFlags::of(&before), &after).is_empty());
        assert!(!theft_detected(&after));
    }

    #[test]
    fn test_chain_theft_from_hidden_layers() {
        let before = create_event();
        let mut after = before.clone();
        after.zz = Some(DepthVector {
            scan_depth: 3,
            hidden_layers: vec!["0xshadow".to_string()],
            layer_types: vec!["proxy".to_string()],
            chain_theft_detected: true,
        });

        assert!(chain_theft_detected(&after));
        let notifications = transitions(DetectionFlags::of(&before), &after);
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind(), "chain_theft_detected");
    }
}
