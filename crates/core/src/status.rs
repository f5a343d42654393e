//! Restitution status - one-way progression
//!
//! NotStarted → InProgress → Completed. Completed is terminal.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Progress of returning misappropriated value to its original owner
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
    EnumString, Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RestitutionStatus {
    /// No return has been initiated
    #[default]
    NotStarted,

    /// A return path is known and value is flowing back
    InProgress,

    /// Restitution finished
    Completed,
}

impl RestitutionStatus {
    /// The single status reachable from this one, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            RestitutionStatus::NotStarted => Some(RestitutionStatus::InProgress),
            RestitutionStatus::InProgress => Some(RestitutionStatus::Completed),
            RestitutionStatus::Completed => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RestitutionStatus::Completed)
    }

    /// Staying put or moving exactly one step forward
    pub fn can_move_to(&self, target: Self) -> bool {
        *self == target || self.next() == Some(target)
    }
}
