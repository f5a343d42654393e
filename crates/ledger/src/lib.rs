//! Ripple Ledger - the multi-vector event record core
//!
//! Every state change to a ripple record goes through `RippleLedger`.
//!
//! # Key Types
//! - `RippleLedger`: Owns all records, serializes mutation per event id
//! - `CutReport` / `ReturnReport` / `DepthReport` / `IntentReport`: Vector inputs
//! - `RippleNotification`: Emitted on detection and restitution transitions
//! - `NotificationSink`: Where notifications are published
//! - `LedgerConfig`: Quorum and notification settings

pub mod canonical;
pub mod clock;
pub mod config;
pub mod density;
pub mod detection;
pub mod error;
pub mod export;
pub mod ledger;
pub mod notification;
pub mod recorders;
pub mod restitution;
pub mod tribunal;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LedgerConfig;
pub use error::{LedgerError, LedgerResult, SinkError, TransitionError};
pub use export::{WatchtowerRow, WATCHTOWER_HEADER};
pub use ledger::{ProofStatus, RippleLedger};
pub use notification::{NotificationSink, NullSink, RippleNotification};
pub use recorders::{CutReport, DepthReport, IntentReport, ReturnReport};
pub use tribunal::MIN_QUORUM;
