//! The navigation driver: the host-side half of the gate.
//!
//! Per navigation:
//!
//!   normalize path → read capabilities → evaluate gate → record → redirect
//!
//! The record is written before the redirect is handed to the router, so a
//! navigation that cannot be audited never moves the client.  When either
//! step fails the gate is re-armed: the redirect counts as issued only once
//! the router has accepted it.

use chrono::Utc;
use tracing::{debug, info, warn};

use routegate_contracts::{
    decision::{GateCommand, GateOutcome},
    error::GuardResult,
    path::normalize_path,
    record::{DecisionRecord, SessionId},
};

use crate::{
    gate::EnforcementGate,
    traits::{CapabilitySource, DecisionLog, Navigator},
};

/// Drives one gate for one caller session.
pub struct NavigationDriver {
    session_id: SessionId,
    gate: EnforcementGate,
    identity: Box<dyn CapabilitySource>,
    navigator: Box<dyn Navigator>,
    log: Box<dyn DecisionLog>,
}

impl NavigationDriver {
    pub fn new(
        session_id: SessionId,
        gate: EnforcementGate,
        identity: Box<dyn CapabilitySource>,
        navigator: Box<dyn Navigator>,
        log: Box<dyn DecisionLog>,
    ) -> Self {
        Self { session_id, gate, identity, navigator, log }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn gate(&self) -> &EnforcementGate {
        &self.gate
    }

    /// Handle a navigation to `raw_path`.
    ///
    /// # Pipeline
    ///
    /// 1. Normalize the path (query, fragment, trailing `/`)
    /// 2. Ask the `CapabilitySource` for the held set; on error, log and
    ///    evaluate with no capabilities
    /// 3. Evaluate the gate
    /// 4. Append a `DecisionRecord` to the log
    /// 5. If the outcome carries a redirect, hand it to the `Navigator`
    ///
    /// # Errors
    ///
    /// Only the log and the navigator can fail. A denial is not an error;
    /// it is an outcome with `Render::Nothing`.  After either failure the
    /// next navigation that is denied issues its redirect again, and a
    /// rejected redirect is followed in the log by a `redirect_failed`
    /// record.
    pub fn navigate(&mut self, raw_path: &str) -> GuardResult<GateOutcome> {
        let path = normalize_path(raw_path);

        debug!(
            session_id = %self.session_id,
            raw_path = %raw_path,
            path = %path,
            "navigation starting"
        );

        let held = match self.identity.current() {
            Ok(held) => Some(held),
            Err(e) => {
                warn!(
                    session_id = %self.session_id,
                    path = %path,
                    error = %e,
                    "capability source unavailable; failing closed"
                );
                None
            }
        };

        let outcome = self.gate.evaluate(&path, held.as_ref());

        let record = DecisionRecord {
            session_id: self.session_id.clone(),
            path: path.clone(),
            required: outcome.decision.required.clone(),
            allowed: outcome.decision.allowed,
            redirected_to: outcome.redirect_target().map(str::to_string),
            redirect_failed: None,
            timestamp: Utc::now(),
        };
        if let Err(e) = self.log.record(&record) {
            self.rearm_if_redirecting(&outcome);
            return Err(e);
        }

        if let Some(GateCommand::Redirect { to }) = &outcome.command {
            info!(
                session_id = %self.session_id,
                path = %path,
                to = %to,
                "redirecting unauthorized caller"
            );
            if let Err(e) = self.navigator.redirect(to) {
                warn!(
                    session_id = %self.session_id,
                    path = %path,
                    to = %to,
                    error = %e,
                    "redirect failed; gate re-armed"
                );
                self.gate.rearm();
                let failure = DecisionRecord {
                    redirected_to: None,
                    redirect_failed: Some(e.to_string()),
                    timestamp: Utc::now(),
                    ..record
                };
                self.log.record(&failure)?;
                return Err(e);
            }
        }

        Ok(outcome)
    }

    /// A redirect that never reached the router must be issued again on the
    /// next denial of the same path.
    fn rearm_if_redirecting(&mut self, outcome: &GateOutcome) {
        if outcome.command.is_some() {
            debug!(session_id = %self.session_id, path = %outcome.path, "gate re-armed");
            self.gate.rearm();
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use routegate_contracts::{
        capability::{Capability, CapabilitySet, RequiredSet},
        decision::Render,
        error::{GuardError, GuardResult},
        record::{DecisionRecord, SessionId},
    };

    use crate::{
        gate::EnforcementGate,
        traits::{CapabilitySource, DecisionLog, Navigator, RouteResolver},
    };

    use super::NavigationDriver;

    // ── Mock helpers ─────────────────────────────────────────────────────────

    struct UsersOnly {
        required: RequiredSet,
    }

    impl RouteResolver for UsersOnly {
        fn resolve(&self, path: &str) -> Option<&RequiredSet> {
            let hit = path == "/dashboard/users" || path.starts_with("/dashboard/users/");
            hit.then_some(&self.required)
        }

        fn unauthorized_path(&self) -> &str {
            "/unauthorized"
        }
    }

    /// An identity provider whose answer the test can swap.
    struct MockIdentity {
        held: Arc<Mutex<Option<CapabilitySet>>>,
    }

    impl CapabilitySource for MockIdentity {
        fn current(&self) -> GuardResult<CapabilitySet> {
            self.held
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| GuardError::IdentityUnavailable {
                    reason: "session expired".to_string(),
                })
        }
    }

    /// Pops one pending failure, if any.
    fn take_failure(failures: &Mutex<usize>) -> bool {
        let mut left = failures.lock().unwrap();
        if *left > 0 {
            *left -= 1;
            true
        } else {
            false
        }
    }

    struct MockNavigator {
        redirects: Arc<Mutex<Vec<String>>>,
        failures: Mutex<usize>,
    }

    impl Navigator for MockNavigator {
        fn redirect(&self, to: &str) -> GuardResult<()> {
            if take_failure(&self.failures) {
                return Err(GuardError::NavigationFailed {
                    to: to.to_string(),
                    reason: "router detached".to_string(),
                });
            }
            self.redirects.lock().unwrap().push(to.to_string());
            Ok(())
        }
    }

    struct MockLog {
        records: Arc<Mutex<Vec<DecisionRecord>>>,
        failures: Mutex<usize>,
    }

    impl DecisionLog for MockLog {
        fn record(&self, record: &DecisionRecord) -> GuardResult<()> {
            if take_failure(&self.failures) {
                return Err(GuardError::AuditWriteFailed {
                    reason: "disk full".to_string(),
                });
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    struct Harness {
        driver: NavigationDriver,
        held: Arc<Mutex<Option<CapabilitySet>>>,
        redirects: Arc<Mutex<Vec<String>>>,
        records: Arc<Mutex<Vec<DecisionRecord>>>,
    }

    /// `nav_failures` / `log_failures`: how many upcoming calls fail.
    fn harness(held: Option<&[&str]>, nav_failures: usize, log_failures: usize) -> Harness {
        let resolver = Arc::new(UsersOnly {
            required: RequiredSet::new([Capability::new("users.manage")]).unwrap(),
        });
        let held: Arc<Mutex<Option<CapabilitySet>>> =
            Arc::new(Mutex::new(held.map(|names| names.iter().copied().collect())));
        let redirects = Arc::new(Mutex::new(vec![]));
        let records = Arc::new(Mutex::new(vec![]));

        let driver = NavigationDriver::new(
            SessionId::new(),
            EnforcementGate::new(resolver),
            Box::new(MockIdentity { held: held.clone() }),
            Box::new(MockNavigator {
                redirects: redirects.clone(),
                failures: Mutex::new(nav_failures),
            }),
            Box::new(MockLog {
                records: records.clone(),
                failures: Mutex::new(log_failures),
            }),
        );

        Harness { driver, held, redirects, records }
    }

    // ── Test cases ────────────────────────────────────────────────────────────

    #[test]
    fn allowed_navigation_records_without_redirect() {
        let mut h = harness(Some(&["users.manage"]), 0, 0);
        let outcome = h.driver.navigate("/dashboard/users/42").unwrap();

        assert!(outcome.is_allowed());
        assert_eq!(outcome.render, Render::Children);
        assert!(h.redirects.lock().unwrap().is_empty());

        let records = h.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].allowed);
        assert_eq!(records[0].redirected_to, None);
        assert_eq!(&records[0].session_id, h.driver.session_id());
    }

    #[test]
    fn denied_navigation_redirects_once_across_rerenders() {
        let mut h = harness(Some(&[]), 0, 0);

        let first = h.driver.navigate("/dashboard/users").unwrap();
        let second = h.driver.navigate("/dashboard/users").unwrap();

        assert_eq!(first.render, Render::Nothing);
        assert_eq!(second.render, Render::Nothing);
        assert_eq!(*h.redirects.lock().unwrap(), vec!["/unauthorized".to_string()]);

        // Both evaluations are on record; only the first carries the redirect.
        let records = h.records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].redirected_to.as_deref(), Some("/unauthorized"));
        assert_eq!(records[1].redirected_to, None);
    }

    #[test]
    fn path_is_normalized_before_evaluation() {
        let mut h = harness(Some(&[]), 0, 0);
        let outcome = h.driver.navigate("/dashboard/users/?tab=roles").unwrap();

        assert_eq!(outcome.path, "/dashboard/users");
        assert!(!outcome.is_allowed());
        assert_eq!(h.records.lock().unwrap()[0].path, "/dashboard/users");
    }

    #[test]
    fn identity_failure_fails_closed() {
        let mut h = harness(None, 0, 0);
        let outcome = h.driver.navigate("/dashboard/users").unwrap();

        assert!(!outcome.is_allowed());
        assert_eq!(h.redirects.lock().unwrap().len(), 1);
    }

    #[test]
    fn identity_change_is_picked_up_on_next_navigation() {
        let mut h = harness(Some(&[]), 0, 0);
        assert!(!h.driver.navigate("/dashboard/users").unwrap().is_allowed());

        *h.held.lock().unwrap() = Some(["users.manage"].into_iter().collect());
        assert!(h.driver.navigate("/dashboard/users").unwrap().is_allowed());
    }

    #[test]
    fn audit_failure_aborts_before_redirect() {
        let mut h = harness(Some(&[]), 0, 1);
        let result = h.driver.navigate("/dashboard/users");

        assert!(matches!(result, Err(GuardError::AuditWriteFailed { .. })));
        assert!(h.redirects.lock().unwrap().is_empty());
    }

    #[test]
    fn navigator_failure_is_propagated() {
        let mut h = harness(Some(&[]), 1, 0);
        match h.driver.navigate("/dashboard/users") {
            Err(GuardError::NavigationFailed { to, .. }) => assert_eq!(to, "/unauthorized"),
            other => panic!("expected NavigationFailed, got {:?}", other),
        }
    }

    #[test]
    fn redirect_is_reissued_after_audit_failure() {
        let mut h = harness(Some(&[]), 0, 1);
        assert!(h.driver.navigate("/dashboard/users").is_err());

        let retry = h.driver.navigate("/dashboard/users").unwrap();
        assert_eq!(retry.render, Render::Nothing);
        assert_eq!(retry.redirect_target(), Some("/unauthorized"));
        assert_eq!(*h.redirects.lock().unwrap(), vec!["/unauthorized".to_string()]);

        // Once the redirect went through, re-renders stay quiet.
        let again = h.driver.navigate("/dashboard/users").unwrap();
        assert!(again.command.is_none());
        assert_eq!(h.redirects.lock().unwrap().len(), 1);
    }

    #[test]
    fn redirect_is_reissued_after_navigator_failure() {
        let mut h = harness(Some(&[]), 1, 0);
        assert!(h.driver.navigate("/dashboard/users").is_err());

        {
            let records = h.records.lock().unwrap();
            assert_eq!(records.len(), 2);
            assert_eq!(records[0].redirected_to.as_deref(), Some("/unauthorized"));
            assert_eq!(records[1].redirected_to, None);
            assert!(records[1].redirect_failed.as_deref().unwrap().contains("router detached"));
            assert!(!records[1].allowed);
        }

        let retry = h.driver.navigate("/dashboard/users").unwrap();
        assert_eq!(retry.redirect_target(), Some("/unauthorized"));
        assert_eq!(*h.redirects.lock().unwrap(), vec!["/unauthorized".to_string()]);
        assert_eq!(h.records.lock().unwrap()[2].redirect_failed, None);
    }

    /// A failed audit write on an already-redirected page must not cause a
    /// second redirect.
    #[test]
    fn audit_failure_while_still_denied_keeps_redirect_issued() {
        let mut h = harness(Some(&[]), 0, 0);
        h.driver.navigate("/dashboard/users").unwrap();

        // Swap in a log that fails the next write.
        h.driver.log = Box::new(MockLog {
            records: h.records.clone(),
            failures: Mutex::new(1),
        });
        assert!(h.driver.navigate("/dashboard/users").is_err());

        let again = h.driver.navigate("/dashboard/users").unwrap();
        assert!(again.command.is_none());
        assert_eq!(h.redirects.lock().unwrap().len(), 1);
    }
}
