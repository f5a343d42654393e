//! Ledger errors

use ripple_core::RestitutionStatus;
use thiserror::Error;

/// Errors that can occur in ledger operations
///
/// All of these are precondition failures. A rejected mutation leaves the
/// record exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Ripple event already exists: {0}")]
    DuplicateEvent(String),

    #[error("Ripple event not found: {0}")]
    NotFound(String),

    #[error("Invalid {vector} vector: {reason}")]
    InvalidVector {
        vector: &'static str,
        reason: String,
    },

    #[error("Invalid restitution transition: {0}")]
    InvalidTransition(#[from] TransitionError),

    #[error("Tribunal proof requires {required} distinct witnesses, got {provided}")]
    InsufficientWitnesses { required: usize, provided: usize },

    #[error("Tribunal proof already exists for {0}")]
    ProofAlreadyExists(String),

    #[error("Canonical encoding failed: {0}")]
    Encoding(String),
}

impl LedgerError {
    pub(crate) fn invalid_vector(vector: &'static str, reason: impl Into<String>) -> Self {
        LedgerError::InvalidVector {
            vector,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        LedgerError::Encoding(e.to_string())
    }
}

/// Why a YY recording was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot move back from {from} to {to}")]
    Regression {
        from: RestitutionStatus,
        to: RestitutionStatus,
    },

    #[error("cannot skip from {from} to {to}")]
    Skip {
        from: RestitutionStatus,
        to: RestitutionStatus,
    },

    #[error("stolen cycles returned cannot decrease from {current} to {requested}")]
    CyclesDecreased { current: u64, requested: u64 },

    #[error("restitution cannot start without a return path")]
    MissingReturnPath,
}

/// Errors reported by a notification sink
///
/// Never propagated to the caller of a mutation; the ledger only logs them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("Notification channel closed")]
    Closed,
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
