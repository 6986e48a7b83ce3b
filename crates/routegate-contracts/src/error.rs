//! Error types for the routegate crates.
//!
//! Authorization decisions themselves never fail: an unmatched route is
//! unguarded and a missing capability set is an empty one.  Errors arise
//! only from loading a registry or from the collaborators the navigation
//! driver talks to.

use thiserror::Error;

/// The unified error type for routegate.
#[derive(Debug, Error)]
pub enum GuardError {
    /// A registry document could not be read or parsed.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A route pattern is not a normalized absolute path.
    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Two rules share an identical pattern.
    #[error("duplicate route pattern '{pattern}'")]
    DuplicatePattern { pattern: String },

    /// A rule lists no capabilities.
    #[error("route '{pattern}' must require at least one capability")]
    EmptyRequiredSet { pattern: String },

    /// A rule lists a malformed capability name.
    #[error("invalid capability for route '{pattern}': {reason}")]
    InvalidCapability { pattern: String, reason: String },

    /// A rule can never match because an earlier rule covers every path it would.
    #[error("route '{pattern}' is unreachable: shadowed by earlier rule '{shadowed_by}'")]
    ShadowedRule { pattern: String, shadowed_by: String },

    /// The unauthorized destination is itself guarded, so a denial would loop.
    #[error("unauthorized destination '{path}' is guarded by route '{pattern}'")]
    RedirectLoop { path: String, pattern: String },

    /// The identity provider could not produce a capability set.
    #[error("identity unavailable: {reason}")]
    IdentityUnavailable { reason: String },

    /// The routing collaborator rejected a redirect.
    #[error("navigation to '{to}' failed: {reason}")]
    NavigationFailed { to: String, reason: String },

    /// The decision log could not persist a record.
    ///
    /// Fatal for the navigation: an evaluation that cannot be recorded is not
    /// acted upon.
    #[error("audit write failed: {reason}")]
    AuditWriteFailed { reason: String },
}

/// Convenience alias used throughout the routegate crates.
pub type GuardResult<T> = Result<T, GuardError>;
