//! Hash-chain primitives for the decision log.
//!
//! Hash input layout (bytes, in order):
//!   1. log_id as UTF-8 bytes
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. compact JSON of the decision record

use sha2::{Digest, Sha256};

use routegate_contracts::{
    error::{GuardError, GuardResult},
    record::DecisionRecord,
};

use crate::event::DecisionEvent;

/// Compute the SHA-256 hash for one decision event.
///
/// Returns a lowercase 64-character hex string.
pub fn hash_event(
    log_id: &str,
    sequence: u64,
    record: &DecisionRecord,
    prev_hash: &str,
) -> GuardResult<String> {
    let record_json = serde_json::to_vec(record).map_err(|e| GuardError::AuditWriteFailed {
        reason: format!("decision record is not serializable: {}", e),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(log_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Return the sequence number of the first event that breaks the chain.
///
/// An event breaks the chain when its `prev_hash` is not the previous
/// event's `this_hash` (`GENESIS_HASH` for the first), when its sequence is
/// out of place, or when its `this_hash` does not match a recomputation.
pub fn first_break(events: &[DecisionEvent]) -> Option<u64> {
    let mut expected_prev: &str = DecisionEvent::GENESIS_HASH;

    for (position, event) in events.iter().enumerate() {
        if event.sequence != position as u64 || event.prev_hash != expected_prev {
            return Some(position as u64);
        }

        match hash_event(&event.log_id, event.sequence, &event.record, &event.prev_hash) {
            Ok(recomputed) if recomputed == event.this_hash => {}
            _ => return Some(position as u64),
        }

        expected_prev = event.this_hash.as_str();
    }

    None
}

/// True if the chain is intact.  An empty chain is intact.
pub fn verify_chain(events: &[DecisionEvent]) -> bool {
    first_break(events).is_none()
}
