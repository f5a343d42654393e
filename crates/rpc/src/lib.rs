//! Ripple RPC - CLI orchestrator
//!
//! This crate provides the `ripple` binary, the application context and
//! the JSON operation-script runner.

pub mod commands;
pub mod context;
pub mod script;

pub use context::AppContext;
pub use script::{Operation, Outcome, ScriptError, ScriptReport};
