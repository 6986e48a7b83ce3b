//! Authorization decision and gate outcome types.
//!
//! `AuthorizationDecision` is the pure answer for one (path, capability set)
//! pair.  `GateOutcome` is what an enforcement gate hands back to its host
//! after an evaluation: what to render, and at most one command to execute.

use serde::{Deserialize, Serialize};

use crate::capability::RequiredSet;

/// The derived decision for a single path.
///
/// `required == None` means the route is unguarded and always allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationDecision {
    /// The capabilities the matching rule asks for, if any rule matched.
    pub required: Option<RequiredSet>,
    /// True if the caller may enter the route.
    pub allowed: bool,
}

impl AuthorizationDecision {
    /// Decision for a path no rule guards.
    pub fn unguarded() -> Self {
        Self {
            required: None,
            allowed: true,
        }
    }

    pub fn is_guarded(&self) -> bool {
        self.required.is_some()
    }
}

/// Lifecycle of one mounted gate.
///
/// ```text
/// PendingEvaluation ──allowed──▶ Allowed
///        │
///        └────────denied──────▶ DeniedRedirecting
/// ```
///
/// Any change of path or capabilities puts the gate back through
/// `PendingEvaluation`; `Allowed` and `DeniedRedirecting` hold until then.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    /// Mounted (or inputs changed) and not yet evaluated.
    PendingEvaluation,
    /// The protected subtree is rendered.
    Allowed,
    /// Nothing is rendered; a redirect to `redirect_to` has been requested.
    DeniedRedirecting { redirect_to: String },
}

/// What the host should render for the protected subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Render {
    Children,
    Nothing,
}

/// A side effect the host must run after rendering, exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateCommand {
    /// Navigate the client to `to`.
    Redirect { to: String },
}

/// The result of one gate evaluation.
///
/// Hosts pattern-match on this:
/// - render according to `render`
/// - if `command` is `Some`, execute it after rendering; it is only present
///   on the evaluation that transitions into a denial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateOutcome {
    /// The path the gate evaluated.
    pub path: String,
    /// The decision behind this outcome.
    pub decision: AuthorizationDecision,
    /// Gate state after the evaluation.
    pub state: GateState,
    /// Whether to render the wrapped subtree.
    pub render: Render,
    /// The command to execute, if this evaluation issued one.
    pub command: Option<GateCommand>,
}

impl GateOutcome {
    pub fn is_allowed(&self) -> bool {
        self.decision.allowed
    }

    /// The redirect target, if this evaluation issued a redirect.
    pub fn redirect_target(&self) -> Option<&str> {
        match &self.command {
            Some(GateCommand::Redirect { to }) => Some(to.as_str()),
            None => None,
        }
    }
}
