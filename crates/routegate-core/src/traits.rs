//! Trait seams between the gate and the rest of the application.
//!
//! - `RouteResolver`    — the permission registry (trusted, immutable)
//! - `CapabilitySource` — the identity/session provider
//! - `Navigator`        — the router that executes redirects
//! - `DecisionLog`      — the audit sink for every evaluation
//!
//! The gate only ever reads from the first two and only ever writes to the
//! last two through the `NavigationDriver`.

use routegate_contracts::{
    capability::{CapabilitySet, RequiredSet},
    error::GuardResult,
    record::DecisionRecord,
};

/// Answers "what capabilities does this path require?".
///
/// Implementations must be deterministic and free of I/O; a single resolver
/// is shared by every gate in the process.
pub trait RouteResolver: Send + Sync {
    /// Return the required set of the first rule matching `path`, or `None`
    /// if the path is unguarded.
    ///
    /// `path` is compared as given. Callers normalize beforehand.
    fn resolve(&self, path: &str) -> Option<&RequiredSet>;

    /// Where denied callers are sent.
    fn unauthorized_path(&self) -> &str;
}

/// The identity/session collaborator.
pub trait CapabilitySource: Send + Sync {
    /// The caller's capabilities as of now.
    ///
    /// An error is never treated as "skip the check": the driver logs it and
    /// evaluates with an empty set.
    fn current(&self) -> GuardResult<CapabilitySet>;
}

/// The routing collaborator.
pub trait Navigator: Send + Sync {
    /// Send the client to `to`.  Repeated calls for a target already being
    /// navigated to should be harmless.
    fn redirect(&self, to: &str) -> GuardResult<()>;
}

/// The decision audit sink.
///
/// Append-only. A failed write aborts the navigation before any redirect is
/// issued.
pub trait DecisionLog: Send + Sync {
    fn record(&self, record: &DecisionRecord) -> GuardResult<()>;
}
