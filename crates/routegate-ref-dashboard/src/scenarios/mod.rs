//! Dashboard navigation scenarios.
//!
//! Each scenario wires real routegate components (registry, gate, driver,
//! hash-chained decision log) to fixture collaborators, walks a caller
//! through a sequence of pages, and checks every outcome against what the
//! route table says should happen.

pub mod admin_tour;
pub mod editor_tour;
pub mod signed_out;

use std::sync::Arc;

use routegate_audit::InMemoryDecisionLog;
use routegate_contracts::{
    decision::GateOutcome,
    error::GuardResult,
    record::SessionId,
};
use routegate_core::{traits::RouteResolver, EnforcementGate, NavigationDriver};

use crate::session::{FixtureSession, RecordingNavigator};

/// What a visit is expected to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// Rendered.
    Allow,
    /// Suppressed, with a fresh redirect.
    Redirect,
    /// Suppressed, redirect already issued for this page.
    StillDenied,
}

impl Expect {
    fn holds_for(&self, outcome: &GateOutcome) -> bool {
        match self {
            Expect::Allow => outcome.is_allowed() && outcome.command.is_none(),
            Expect::Redirect => !outcome.is_allowed() && outcome.command.is_some(),
            Expect::StillDenied => !outcome.is_allowed() && outcome.command.is_none(),
        }
    }
}

/// One step of a scenario.
pub enum Step {
    Visit { path: &'static str, expect: Expect },
    /// Change the caller's role between visits.
    SwitchRole(crate::fixtures::Role),
}

/// The result of one visit.
#[derive(Debug, Clone)]
pub struct VisitReport {
    pub path: String,
    pub expected: Expect,
    pub outcome: GateOutcome,
    pub ok: bool,
}

/// Everything a scenario run produced.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub name: &'static str,
    pub visits: Vec<VisitReport>,
    /// Redirect targets the navigator received.
    pub redirects: Vec<String>,
    /// Events in the decision log.
    pub recorded: usize,
    /// Whether the decision log's hash chain verified.
    pub chain_intact: bool,
}

impl ScenarioReport {
    /// Every visit matched its expectation, every evaluation was recorded,
    /// and the decision log is intact.
    pub fn passed(&self) -> bool {
        self.visits.iter().all(|v| v.ok) && self.recorded == self.visits.len() && self.chain_intact
    }

    pub fn print(&self) {
        for visit in &self.visits {
            let verdict = if visit.outcome.is_allowed() { "ALLOW" } else { "DENY " };
            let required = match &visit.outcome.decision.required {
                Some(required) => required.to_string(),
                None => "(unguarded)".to_string(),
            };
            let redirect = visit
                .outcome
                .redirect_target()
                .map(|to| format!(" → redirect {}", to))
                .unwrap_or_default();
            let mark = if visit.ok { "ok" } else { "UNEXPECTED" };
            println!(
                "    {verdict} {:<28} requires {:<40}{redirect}  [{mark}]",
                visit.path, required
            );
        }
        println!();
        println!("  Redirects issued: {}", self.redirects.len());
        println!(
            "  Decision log: {} events, chain {}",
            self.recorded,
            if self.chain_intact { "intact" } else { "BROKEN" }
        );
        println!();
    }
}

/// Drive `session` through `steps` against `resolver`.
pub(crate) fn run_steps(
    name: &'static str,
    resolver: Arc<dyn RouteResolver>,
    session: FixtureSession,
    steps: &[Step],
) -> GuardResult<ScenarioReport> {
    let session_id = SessionId::new();
    let log = InMemoryDecisionLog::new(session_id.to_string());
    let navigator = RecordingNavigator::new();

    let mut driver = NavigationDriver::new(
        session_id,
        EnforcementGate::new(resolver),
        Box::new(session.clone()),
        Box::new(navigator.clone()),
        Box::new(log.clone()),
    );

    let mut visits = Vec::new();
    for step in steps {
        match step {
            Step::Visit { path, expect } => {
                let outcome = driver.navigate(path)?;
                visits.push(VisitReport {
                    path: path.to_string(),
                    expected: *expect,
                    ok: expect.holds_for(&outcome),
                    outcome,
                });
            }
            Step::SwitchRole(role) => {
                tracing::info!(scenario = name, role = %role, "switching role");
                session.switch_role(*role)?;
            }
        }
    }

    Ok(ScenarioReport {
        name,
        visits,
        redirects: navigator.redirects()?,
        recorded: log.len()?,
        chain_intact: log.verify_integrity()?,
    })
}
