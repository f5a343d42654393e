//! Tribunal proof generator
//!
//! A proof is a quorum-witnessed, content-addressed attestation over the
//! canonical encoding of the record at the moment of generation. Once
//! attached it is immutable.

use chrono::{DateTime, Utc};
use ripple_core::{RippleEvent, TribunalProof};
use std::collections::BTreeSet;

use crate::canonical;
use crate::error::{LedgerError, LedgerResult};

/// The smallest quorum any configuration may ask for
pub const MIN_QUORUM: usize = 3;

/// Attach a proof to `event`, returning a copy of what was attached.
///
/// Fails with `ProofAlreadyExists` when a proof is present and with
/// `InsufficientWitnesses` when fewer than `quorum` distinct witnesses are
/// supplied.
pub fn generate_proof(
    event: &mut RippleEvent,
    witnesses: &[String],
    quorum: usize,
    generated_at: DateTime<Utc>,
) -> LedgerResult<TribunalProof> {
    if event.tribunal_proof.is_some() {
        return Err(LedgerError::ProofAlreadyExists(event.event_id.clone()));
    }

    let required = quorum.max(MIN_QUORUM);
    let distinct: BTreeSet<String> = witnesses.iter().cloned().collect();
    if distinct.len() < required {
        return Err(LedgerError::InsufficientWitnesses {
            required,
            provided: distinct.len(),
        });
    }

    let proof_hash = canonical::proof_digest(event)?;
    let proof = TribunalProof {
        proof_hash,
        seal: canonical::seal(&proof_hash, &distinct),
        witnesses: distinct,
        generated_at,
    };
    event.tribunal_proof = Some(proof.clone());
    Ok(proof)
}

/// Check a stored proof against the record it is attached to
pub fn verify_proof(event: &RippleEvent) -> LedgerResult<bool> {
    let Some(proof) = event.tribunal_proof.as_ref() else {
        return Ok(false);
    };
    let recomputed = canonical::proof_digest(event)?;
    Ok(recomputed == proof.proof_hash
        && canonical::seal(&recomputed, &proof.witnesses) == proof.seal)
}
