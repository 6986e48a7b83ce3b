//! Decision log entry and export types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use routegate_contracts::record::DecisionRecord;

/// One link in a decision log's hash chain.
///
/// Changing any field, including those of the embedded `record`,
/// invalidates `this_hash` and every later `prev_hash`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionEvent {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    /// The log this event belongs to.
    pub log_id: String,

    /// The gate evaluation being recorded.
    pub record: DecisionRecord,

    /// Hex SHA-256 of the previous event, or `GENESIS_HASH` for the first.
    pub prev_hash: String,

    /// Hex SHA-256 over (log_id, sequence, prev_hash, record JSON).
    pub this_hash: String,
}

impl DecisionEvent {
    /// The `prev_hash` of the first event in every chain: 64 hex zeros.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// A point-in-time export of a decision log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTrail {
    pub log_id: String,

    /// All events in chain order.
    pub events: Vec<DecisionEvent>,

    /// When the export was taken (UTC).
    pub exported_at: DateTime<Utc>,

    /// `this_hash` of the last event; empty when there are no events.
    pub terminal_hash: String,
}

impl DecisionTrail {
    /// Records of evaluations that denied the caller.
    pub fn denials(&self) -> impl Iterator<Item = &DecisionRecord> {
        self.events.iter().map(|e| &e.record).filter(|r| !r.allowed)
    }

    /// Number of redirects the router accepted over the whole trail.
    pub fn redirect_count(&self) -> usize {
        let issued = self
            .events
            .iter()
            .filter(|e| e.record.redirected_to.is_some())
            .count();
        let failed = self
            .events
            .iter()
            .filter(|e| e.record.redirect_failed.is_some())
            .count();
        issued.saturating_sub(failed)
    }
}
