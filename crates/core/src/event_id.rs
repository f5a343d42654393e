//! Event id convention
//!
//! Format: `RIPPLE-<year>-<HEX millis><4 HEX random>`
//! Example: `RIPPLE-2025-18F3A2B4C1D7F2A`
//!
//! The ledger treats ids as opaque strings; this is only the convention
//! callers use when minting new ones.

use chrono::{DateTime, Datelike, Utc};

pub const PREFIX: &str = "RIPPLE";

/// Mint a conventional event id for the given instant
pub fn generate(now: DateTime<Utc>) -> String {
    let suffix: u16 = rand::random();
    format_id(now, suffix)
}

fn format_id(now: DateTime<Utc>, suffix: u16) -> String {
    format!(
        "{}-{}-{:X}{:04X}",
        PREFIX,
        now.year(),
        now.timestamp_millis(),
        suffix
    )
}

/// Check whether an id follows the `RIPPLE-<year>-<hex>` shape
pub fn follows_convention(id: &str) -> bool {
    let mut parts = id.splitn(3, '-');
    let (Some(prefix), Some(year), Some(tail)) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    prefix == PREFIX
        && year.len() == 4
        && year.bytes().all(|b| b.is_ascii_digit())
        && tail.len() > 4
        && tail.bytes().all(|b| b.is_ascii_hexdigit())
}
