//! The enforcement gate: the single check in front of protected content.
//!
//! A gate is evaluated on every navigation and every change of the caller's
//! capabilities.  It never navigates by itself.  Instead it returns a
//! `GateOutcome` telling the host what to render and, on the evaluation
//! that first denies a path, a `GateCommand::Redirect` to run after
//! rendering.
//!
//! The redirect is keyed on `(path, allowed)`.  Evaluating again with the
//! same key (including when only the held set changed but the answer did
//! not) returns no command, so a host that re-renders freely never issues
//! a second redirect.

use std::sync::Arc;

use tracing::{debug, warn};

use routegate_contracts::{
    capability::CapabilitySet,
    decision::{GateCommand, GateOutcome, GateState, Render},
};

use crate::{decision::decide, traits::RouteResolver};

#[derive(Debug, Clone, PartialEq, Eq)]
struct EffectKey {
    path: String,
    allowed: bool,
}

/// One mounted gate.
///
/// Construct one per protected subtree; share the resolver between them.
pub struct EnforcementGate {
    resolver: Arc<dyn RouteResolver>,
    state: GateState,
    last_effect: Option<EffectKey>,
}

impl EnforcementGate {
    /// Mount a gate in `PendingEvaluation`.
    pub fn new(resolver: Arc<dyn RouteResolver>) -> Self {
        Self {
            resolver,
            state: GateState::PendingEvaluation,
            last_effect: None,
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Unmount and remount: forget the previous evaluation.
    ///
    /// The next denial after a reset issues a fresh redirect.
    pub fn reset(&mut self) {
        self.state = GateState::PendingEvaluation;
        self.last_effect = None;
    }

    /// Forget the last effect key without leaving the current state.
    ///
    /// Hosts call this when a redirect command could not be carried out, so
    /// the next evaluation that denies issues it again.
    pub fn rearm(&mut self) {
        self.last_effect = None;
    }

    /// Evaluate the gate for `path` and the caller's capabilities.
    ///
    /// `held == None` means the identity provider had nothing to give; it is
    /// evaluated as an empty set, so every guarded route is denied.
    pub fn evaluate(&mut self, path: &str, held: Option<&CapabilitySet>) -> GateOutcome {
        let empty = CapabilitySet::default();
        let held = match held {
            Some(held) => held,
            None => {
                debug!(path = %path, "no capability set supplied; evaluating as empty");
                &empty
            }
        };

        let decision = decide(self.resolver.as_ref(), held, path);

        let key = EffectKey {
            path: path.to_string(),
            allowed: decision.allowed,
        };
        let key_changed = self.last_effect.as_ref() != Some(&key);
        self.last_effect = Some(key);

        let (state, render, command) = if decision.allowed {
            (GateState::Allowed, Render::Children, None)
        } else {
            let redirect_to = self.resolver.unauthorized_path().to_string();
            let command = if key_changed {
                warn!(
                    path = %path,
                    redirect_to = %redirect_to,
                    "caller lacks every capability the route requires; redirecting"
                );
                Some(GateCommand::Redirect {
                    to: redirect_to.clone(),
                })
            } else {
                debug!(path = %path, "still denied; redirect already issued");
                None
            };
            (GateState::DeniedRedirecting { redirect_to }, Render::Nothing, command)
        };

        self.state = state.clone();

        GateOutcome {
            path: path.to_string(),
            decision,
            state,
            render,
            command,
        }
    }
}

#[cfg(test)]
mod tests {
    use routegate_contracts::capability::{Capability, RequiredSet};

    use super::*;

    /// A two-rule resolver with prefix matching, enough to drive the gate.
    struct TestResolver {
        rules: Vec<(&'static str, RequiredSet)>,
    }

    impl TestResolver {
        fn dashboard() -> Arc<dyn RouteResolver> {
            Arc::new(Self {
                rules: vec![
                    ("/dashboard/users", required("users.manage")),
                    ("/dashboard/parties", required("parties:read")),
                ],
            })
        }
    }

    impl RouteResolver for TestResolver {
        fn resolve(&self, path: &str) -> Option<&RequiredSet> {
            self.rules
                .iter()
                .find(|(pattern, _)| {
                    path == *pattern
                        || path
                            .strip_prefix(pattern)
                            .is_some_and(|rest| rest.starts_with('/'))
                })
                .map(|(_, req)| req)
        }

        fn unauthorized_path(&self) -> &str {
            "/unauthorized"
        }
    }

    fn required(name: &str) -> RequiredSet {
        RequiredSet::new([Capability::new(name)]).unwrap()
    }

    fn held(names: &[&str]) -> CapabilitySet {
        names.iter().copied().collect()
    }

    #[test]
    fn new_gate_is_pending() {
        let gate = EnforcementGate::new(TestResolver::dashboard());
        assert_eq!(gate.state(), &GateState::PendingEvaluation);
    }

    #[test]
    fn nested_path_with_capability_is_allowed() {
        let mut gate = EnforcementGate::new(TestResolver::dashboard());
        let outcome = gate.evaluate("/dashboard/users/42", Some(&held(&["users.manage"])));

        assert!(outcome.is_allowed());
        assert_eq!(outcome.render, Render::Children);
        assert_eq!(outcome.command, None);
        assert_eq!(gate.state(), &GateState::Allowed);
    }

    #[test]
    fn denied_path_redirects_exactly_once() {
        let mut gate = EnforcementGate::new(TestResolver::dashboard());

        let first = gate.evaluate("/dashboard/users", Some(&held(&[])));
        assert_eq!(first.render, Render::Nothing);
        assert_eq!(first.redirect_target(), Some("/unauthorized"));
        assert_eq!(
            gate.state(),
            &GateState::DeniedRedirecting {
                redirect_to: "/unauthorized".to_string()
            }
        );

        let second = gate.evaluate("/dashboard/users", Some(&held(&[])));
        assert_eq!(second.render, Render::Nothing);
        assert_eq!(second.command, None, "re-render must not issue a second redirect");
    }

    #[test]
    fn repeated_allowed_evaluations_are_identical() {
        let mut gate = EnforcementGate::new(TestResolver::dashboard());
        let caps = held(&["parties:read"]);
        let first = gate.evaluate("/dashboard/parties", Some(&caps));
        let second = gate.evaluate("/dashboard/parties", Some(&caps));
        assert_eq!(first, second);
    }

    #[test]
    fn held_change_without_decision_change_does_not_redirect_again() {
        let mut gate = EnforcementGate::new(TestResolver::dashboard());
        gate.evaluate("/dashboard/users", Some(&held(&[])));

        let outcome = gate.evaluate("/dashboard/users", Some(&held(&["blog.write"])));
        assert!(!outcome.is_allowed());
        assert_eq!(outcome.command, None);
    }

    #[test]
    fn new_denied_path_redirects_again() {
        let mut gate = EnforcementGate::new(TestResolver::dashboard());
        let caps = held(&[]);
        assert!(gate.evaluate("/dashboard/users", Some(&caps)).command.is_some());
        assert!(gate.evaluate("/dashboard/parties", Some(&caps)).command.is_some());
    }

    #[test]
    fn regaining_then_losing_access_redirects_again() {
        let mut gate = EnforcementGate::new(TestResolver::dashboard());
        let none = held(&[]);
        let admin = held(&["users.manage"]);

        assert!(gate.evaluate("/dashboard/users", Some(&none)).command.is_some());
        assert!(gate.evaluate("/dashboard/users", Some(&admin)).is_allowed());
        assert!(gate.evaluate("/dashboard/users", Some(&none)).command.is_some());
    }

    #[test]
    fn unguarded_path_is_allowed_regardless_of_held() {
        let mut gate = EnforcementGate::new(TestResolver::dashboard());
        let outcome = gate.evaluate("/dashboard/reports", None);
        assert!(outcome.is_allowed());
        assert!(outcome.decision.required.is_none());
        assert_eq!(outcome.render, Render::Children);
    }

    #[test]
    fn missing_capability_source_fails_closed() {
        let mut gate = EnforcementGate::new(TestResolver::dashboard());
        let outcome = gate.evaluate("/dashboard/parties/7", None);
        assert!(!outcome.is_allowed());
        assert_eq!(outcome.redirect_target(), Some("/unauthorized"));
    }

    #[test]
    fn reset_returns_to_pending_and_rearms_redirect() {
        let mut gate = EnforcementGate::new(TestResolver::dashboard());
        let caps = held(&[]);
        gate.evaluate("/dashboard/users", Some(&caps));

        gate.reset();
        assert_eq!(gate.state(), &GateState::PendingEvaluation);
        assert!(gate.evaluate("/dashboard/users", Some(&caps)).command.is_some());
    }

    #[test]
    fn rearm_keeps_state_and_reissues_redirect() {
        let mut gate = EnforcementGate::new(TestResolver::dashboard());
        let caps = held(&[]);
        gate.evaluate("/dashboard/users", Some(&caps));

        gate.rearm();
        assert!(matches!(gate.state(), GateState::DeniedRedirecting { .. }));
        assert!(gate.evaluate("/dashboard/users", Some(&caps)).command.is_some());
        assert!(gate.evaluate("/dashboard/users", Some(&caps)).command.is_none());
    }
}
