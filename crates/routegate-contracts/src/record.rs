//! Session identity and decision audit records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capability::RequiredSet;

/// Unique identifier for one caller session.
///
/// Every record the navigation driver writes carries this ID so a decision
/// log can be attributed to the session that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub uuid::Uuid);

impl SessionId {
    /// Create a new, unique session ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An immutable record of one gate evaluation, written to the decision log.
///
/// Every navigation, allowed or not, produces one record; a redirect the
/// router rejects adds a second one with `redirect_failed` set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// The session that navigated.
    pub session_id: SessionId,
    /// The normalized path that was evaluated.
    pub path: String,
    /// The capabilities the matching rule required, if any.
    pub required: Option<RequiredSet>,
    /// Whether the caller was let in.
    pub allowed: bool,
    /// Set when this evaluation issued a redirect.
    pub redirected_to: Option<String>,
    /// Set on the follow-up record written when the router could not carry
    /// out the redirect issued by the previous record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_failed: Option<String>,
    /// Wall-clock time the record was created (UTC).
    pub timestamp: DateTime<Utc>,
}
