//! Canonical serializer - the only way a record (or part of one) is hashed
//!
//! Encoding: compact JSON with object keys sorted lexicographically at every
//! depth. Sequences keep their declared order (the TT log is insertion
//! ordered, sets are `BTreeSet` and therefore already sorted). The output is
//! independent of map iteration order and of serde_json feature flags.

use chrono::{DateTime, SecondsFormat, Utc};
use ripple_core::{Hash32, RippleEvent};
use serde::Serialize;
use serde_json::Value;

use crate::error::LedgerResult;

/// Canonical byte encoding of a full record, proof included
pub fn encode(event: &RippleEvent) -> LedgerResult<Vec<u8>> {
    encode_value(event)
}

/// Canonical byte encoding of any serializable fragment
pub fn encode_value<T: Serialize>(value: &T) -> LedgerResult<Vec<u8>> {
    let value = serde_json::to_value(value)?;
    let mut out = String::new();
    write_canonical(&value, &mut out);
    Ok(out.into_bytes())
}

/// Digest of the full record; changes whenever any field changes
pub fn digest(event: &RippleEvent) -> LedgerResult<Hash32> {
    Ok(Hash32::sha256_of(&encode(event)?))
}

/// Digest of a serializable fragment
pub fn digest_value<T: Serialize>(value: &T) -> LedgerResult<Hash32> {
    Ok(Hash32::sha256_of(&encode_value(value)?))
}

/// Digest a tribunal proof attests to: the record with its proof slot empty.
///
/// Recomputing this on an unmutated record always yields the stored
/// `proof_hash`.
pub fn proof_digest(event: &RippleEvent) -> LedgerResult<Hash32> {
    if event.tribunal_proof.is_none() {
        return digest(event);
    }
    let mut unsealed = event.clone();
    unsealed.tribunal_proof = None;
    digest(&unsealed)
}

/// TT memory hash: SHA-256 of the weave followed by the recording instant
pub fn memory_hash(memory_weave: &str, recorded_at: DateTime<Utc>) -> Hash32 {
    let at = recorded_at.to_rfc3339_opts(SecondsFormat::Nanos, true);
    Hash32::sha256_parts(&[memory_weave.as_bytes(), at.as_bytes()])
}

/// Seal binding a proof hash to its (sorted, distinct) witnesses
pub fn seal<'a>(proof_hash: &Hash32, witnesses: impl IntoIterator<Item = &'a String>) -> Hash32 {
    let mut material = proof_hash.to_hex();
    for witness in witnesses {
        material.push('\n');
        material.push_str(witness);
    }
    Hash32::sha256_of(material.as_bytes())
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
