//! The authorization decision rule.
//!
//! Both functions are total: they never fail and never panic.

use tracing::debug;

use routegate_contracts::{
    capability::{CapabilitySet, RequiredSet},
    decision::AuthorizationDecision,
};

use crate::traits::RouteResolver;

/// Decide whether `held` satisfies `required`.
///
/// - `None` (unguarded route) → always true.
/// - Otherwise true iff `held` contains at least one member of `required`.
///   This is a logical OR: any single listed capability is enough.
pub fn is_authorized(held: &CapabilitySet, required: Option<&RequiredSet>) -> bool {
    match required {
        None => true,
        Some(required) => held.intersects(required),
    }
}

/// Resolve `path` against `resolver` and decide for `held`.
pub fn decide(resolver: &dyn RouteResolver, held: &CapabilitySet, path: &str) -> AuthorizationDecision {
    let required = resolver.resolve(path);
    let allowed = is_authorized(held, required);

    debug!(
        path = %path,
        guarded = required.is_some(),
        held = held.len(),
        allowed,
        "authorization decided"
    );

    AuthorizationDecision {
        required: required.cloned(),
        allowed,
    }
}
