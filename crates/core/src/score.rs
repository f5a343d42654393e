//! DensityScore - Bounded impact score
//!
//! A density score is always within [0, 100]. Out-of-range requests are
//! clamped rather than rejected; this is enforced at the type level.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An impact score in [0, 100].
///
/// # Example
/// ```
/// use ripple_core::DensityScore;
///
/// assert_eq!(DensityScore::clamped(-5).value(), 0);
/// assert_eq!(DensityScore::clamped(50).value(), 50);
/// assert_eq!(DensityScore::clamped(150).value(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct DensityScore(u8);

impl DensityScore {
    pub const MIN: u8 = 0;
    pub const MAX: u8 = 100;

    /// Clamp any requested score into range.
    pub fn clamped(requested: i64) -> Self {
        Self(requested.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    #[inline]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// True when the request had to be clamped to fit
    pub fn was_clamped(requested: i64) -> bool {
        requested < Self::MIN as i64 || requested > Self::MAX as i64
    }
}

impl fmt::Display for DensityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for DensityScore {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<DensityScore> for u8 {
    fn from(score: DensityScore) -> Self {
        score.0
    }
}
