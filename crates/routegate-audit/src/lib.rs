//! # routegate-audit
//!
//! Append-only, SHA-256 hash-chained decision log for routegate.
//!
//! ## Overview
//!
//! Every gate evaluation the navigation driver performs is wrapped in a
//! `DecisionEvent` linked to the previous event by its SHA-256 hash.
//! Editing any recorded decision breaks the chain, and `first_break`
//! reports where.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use routegate_audit::InMemoryDecisionLog;
//!
//! let log = InMemoryDecisionLog::new(session_id.to_string());
//! let driver = NavigationDriver::new(session_id, gate, identity, navigator, Box::new(log.clone()));
//! // ... navigate ...
//! assert!(log.verify_integrity()?);
//! let trail = log.export()?;
//! ```

pub mod chain;
pub mod event;
pub mod memory;

pub use chain::{first_break, hash_event, verify_chain};
pub use event::{DecisionEvent, DecisionTrail};
pub use memory::InMemoryDecisionLog;

// ── Tests ─────────────────────────────────────────────────────────────────────
