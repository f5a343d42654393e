//! Restitution tracker - one-way status machine and monotonic counter
//!
//! ```text
//! NotStarted ──(non-empty return path)──► InProgress ──(explicit)──► Completed
//! ```
//!
//! A YY recording may stay at the stored status or move exactly one step
//! forward. `stolen_cycles_returned` may only grow or stay.

use ripple_core::{RestitutionStatus, ReturnVector, RippleEvent};

use crate::error::{LedgerResult, TransitionError};
use crate::notification::RippleNotification;

/// Work out the status a YY recording lands on, or why it cannot.
///
/// `has_return_path` promotes a request for `NotStarted` to `InProgress`
/// when nothing has started yet.
pub fn resolve(
    current: &ReturnVector,
    requested: RestitutionStatus,
    has_return_path: bool,
    requested_cycles: u64,
) -> LedgerResult<RestitutionStatus> {
    let from = current.restitution_status;

    if requested_cycles < current.stolen_cycles_returned {
        return Err(TransitionError::CyclesDecreased {
            current: current.stolen_cycles_returned,
            requested: requested_cycles,
        }
        .into());
    }

    let target = match (from, requested) {
        (RestitutionStatus::NotStarted, RestitutionStatus::NotStarted) if has_return_path => {
            RestitutionStatus::InProgress
        }
        _ => requested,
    };

    if target < from {
        return Err(TransitionError::Regression { from, to: target }.into());
    }
    if !from.can_move_to(target) {
        return Err(TransitionError::Skip { from, to: target }.into());
    }
    if from == RestitutionStatus::NotStarted
        && target == RestitutionStatus::InProgress
        && !has_return_path
    {
        return Err(TransitionError::MissingReturnPath.into());
    }

    Ok(target)
}

/// `ReturnInitiated` if the record just moved NotStarted → InProgress
pub fn initiated(before: RestitutionStatus, after: &RippleEvent) -> Option<RippleNotification> {
    let now = after.yy.restitution_status;
    if before != RestitutionStatus::NotStarted || now != RestitutionStatus::InProgress {
        return None;
    }

    tracing::info!(
        event_id = %after.event_id,
        original_owner = %after.yy.original_owner,
        stolen_cycles = after.yy.stolen_cycles_returned,
        "Return initiated"
    );
    Some(RippleNotification::ReturnInitiated {
        event_id: after.event_id.clone(),
        original_owner: after.yy.original_owner.clone(),
        stolen_cycles: after.yy.stolen_cycles_returned,
        sequence: 0,
    })
}
