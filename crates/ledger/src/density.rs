//! Density scorer
//!
//! Clamping is the policy, not an error: any requested score is stored,
//! pulled into [0, 100] first.

use ripple_core::{DensityScore, RippleEvent};

/// Store the clamped score and return what was stored
pub fn update_density(event: &mut RippleEvent, requested: i64) -> DensityScore {
    let score = DensityScore::clamped(requested);
    if DensityScore::was_clamped(requested) {
        tracing::debug!(
            event_id = %event.event_id,
            requested,
            stored = score.value(),
            "Density score clamped"
        );
    }
    event.density_score = score;
    score
}
