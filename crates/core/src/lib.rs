//! Ripple Core - Domain types
//!
//! This crate contains the fundamental types shared by the ledger, the bus
//! and the CLI:
//! - `RippleEvent`: one provenance record with its five evidence vectors
//! - `Hash32`: 32-byte content digest (hex on the wire)
//! - `DensityScore`: impact score clamped to [0, 100]
//! - `RestitutionStatus`: one-way restitution progression

pub mod digest;
pub mod event;
pub mod event_id;
pub mod score;
pub mod status;
pub mod vectors;

pub use digest::{DigestError, Hash32};
pub use event::RippleEvent;
pub use score::DensityScore;
pub use status::RestitutionStatus;
pub use vectors::{
    CutVector, DepthVector, IntentVector, ReturnVector, TemporalEntry, TimeVector, TribunalProof,
};
