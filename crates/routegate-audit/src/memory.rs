//! In-memory implementation of `DecisionLog`.
//!
//! `InMemoryDecisionLog` keeps every event in a `Vec` behind a `Mutex`.
//! Clone it to hand one copy to a `NavigationDriver` and keep another for
//! exporting or integrity checks; all clones share the same chain.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, info};

use routegate_contracts::{
    error::{GuardError, GuardResult},
    record::DecisionRecord,
};
use routegate_core::traits::DecisionLog;

use crate::{
    chain::{hash_event, verify_chain},
    event::{DecisionEvent, DecisionTrail},
};

pub(crate) struct ChainState {
    pub(crate) events: Vec<DecisionEvent>,
    /// `this_hash` of the last event, or `GENESIS_HASH`.
    pub(crate) last_hash: String,
}

/// An in-memory, append-only decision log backed by a SHA-256 hash chain.
#[derive(Clone)]
pub struct InMemoryDecisionLog {
    log_id: String,
    pub(crate) state: Arc<Mutex<ChainState>>,
}

impl InMemoryDecisionLog {
    /// Create an empty log.  `log_id` is folded into every hash.
    pub fn new(log_id: impl Into<String>) -> Self {
        Self {
            log_id: log_id.into(),
            state: Arc::new(Mutex::new(ChainState {
                events: Vec::new(),
                last_hash: DecisionEvent::GENESIS_HASH.to_string(),
            })),
        }
    }

    pub fn log_id(&self) -> &str {
        &self.log_id
    }

    fn lock(&self) -> GuardResult<MutexGuard<'_, ChainState>> {
        self.state.lock().map_err(|e| GuardError::AuditWriteFailed {
            reason: format!("decision log lock poisoned: {}", e),
        })
    }

    pub fn len(&self) -> GuardResult<usize> {
        Ok(self.lock()?.events.len())
    }

    pub fn is_empty(&self) -> GuardResult<bool> {
        Ok(self.lock()?.events.is_empty())
    }

    /// Export every event written so far.
    pub fn export(&self) -> GuardResult<DecisionTrail> {
        let state = self.lock()?;
        let terminal_hash = state
            .events
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default();

        info!(
            log_id = %self.log_id,
            event_count = state.events.len(),
            terminal_hash = %terminal_hash,
            "decision log exported"
        );

        Ok(DecisionTrail {
            log_id: self.log_id.clone(),
            events: state.events.clone(),
            exported_at: Utc::now(),
            terminal_hash,
        })
    }

    /// True if the chain has not been tampered with in memory.
    pub fn verify_integrity(&self) -> GuardResult<bool> {
        Ok(verify_chain(&self.lock()?.events))
    }
}

impl DecisionLog for InMemoryDecisionLog {
    /// Hash `record` onto the end of the chain.
    fn record(&self, record: &DecisionRecord) -> GuardResult<()> {
        let mut state = self.lock()?;

        let sequence = state.events.len() as u64;
        let prev_hash = state.last_hash.clone();
        let this_hash = hash_event(&self.log_id, sequence, record, &prev_hash)?;

        debug!(
            log_id = %self.log_id,
            sequence,
            path = %record.path,
            allowed = record.allowed,
            "decision recorded"
        );

        state.events.push(DecisionEvent {
            sequence,
            log_id: self.log_id.clone(),
            record: record.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.last_hash = this_hash;

        Ok(())
    }
}
