//! Ledger configuration
//!
//! Defaults are safe; a JSON file and environment variables can override
//! them. The tribunal quorum can be raised but never dropped below 3.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::tribunal::MIN_QUORUM;

pub const ENV_MIN_WITNESSES: &str = "RIPPLE_MIN_WITNESSES";
pub const ENV_NOTIFICATION_CAPACITY: &str = "RIPPLE_NOTIFICATION_CAPACITY";
pub const ENV_WATCHTOWER_PATH: &str = "RIPPLE_WATCHTOWER_PATH";

/// Configuration for the ripple ledger and its notification plumbing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Distinct witnesses required for a tribunal proof
    #[serde(default = "default_min_witnesses")]
    pub min_witnesses: usize,

    /// Capacity of the notification broadcast channel
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,

    /// Where the watchtower subscriber appends its CSV audit trail
    #[serde(default)]
    pub watchtower_path: Option<PathBuf>,
}

fn default_min_witnesses() -> usize {
    MIN_QUORUM
}

fn default_notification_capacity() -> usize {
    1024
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            min_witnesses: default_min_witnesses(),
            notification_capacity: default_notification_capacity(),
            watchtower_path: None,
        }
    }
}

impl LedgerConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config.normalized())
    }

    /// Override fields from `RIPPLE_*` environment variables
    pub fn apply_env(self) -> Self {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    fn apply_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(ENV_MIN_WITNESSES) {
            match raw.parse() {
                Ok(value) => self.min_witnesses = value,
                Err(_) => tracing::warn!(var = ENV_MIN_WITNESSES, value = %raw, "Ignoring unparsable value"),
            }
        }
        if let Some(raw) = lookup(ENV_NOTIFICATION_CAPACITY) {
            match raw.parse() {
                Ok(value) => self.notification_capacity = value,
                Err(_) => tracing::warn!(var = ENV_NOTIFICATION_CAPACITY, value = %raw, "Ignoring unparsable value"),
            }
        }
        if let Some(raw) = lookup(ENV_WATCHTOWER_PATH) {
            self.watchtower_path = Some(PathBuf::from(raw));
        }
        self.normalized()
    }

    /// Raise out-of-range values to their floors
    pub fn normalized(mut self) -> Self {
        if self.min_witnesses < MIN_QUORUM {
            tracing::warn!(
                requested = self.min_witnesses,
                floor = MIN_QUORUM,
                "Tribunal quorum below floor, raising"
            );
            self.min_witnesses = MIN_QUORUM;
        }
        if self.notification_capacity == 0 {
            self.notification_capacity = default_notification_capacity();
        }
        self
    }
}
