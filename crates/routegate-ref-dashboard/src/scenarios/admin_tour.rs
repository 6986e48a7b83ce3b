//! Scenario 1: Admin tour
//!
//! An administrator visits every back-office section.  Every page renders
//! and no redirect is issued.

use routegate_contracts::error::GuardResult;

use super::{run_steps, Expect, ScenarioReport, Step};
use crate::{
    fixtures::{dashboard_registry, Role},
    session::FixtureSession,
};

const STEPS: &[Step] = &[
    Step::Visit { path: "/dashboard", expect: Expect::Allow },
    Step::Visit { path: "/dashboard/users", expect: Expect::Allow },
    Step::Visit { path: "/dashboard/users/42/edit", expect: Expect::Allow },
    Step::Visit { path: "/dashboard/about-us", expect: Expect::Allow },
    Step::Visit { path: "/dashboard/blog/new", expect: Expect::Allow },
    Step::Visit { path: "/dashboard/work", expect: Expect::Allow },
    Step::Visit { path: "/dashboard/parties/17", expect: Expect::Allow },
    Step::Visit { path: "/dashboard/quotations?status=draft", expect: Expect::Allow },
    Step::Visit { path: "/dashboard/contracts/", expect: Expect::Allow },
    Step::Visit { path: "/dashboard/reports", expect: Expect::Allow },
];

/// Run Scenario 1 and print its report.
pub fn run_scenario() -> GuardResult<ScenarioReport> {
    println!("=== Scenario 1: Admin tour ===");
    println!("  Role: admin");
    println!();

    let report = run_steps(
        "admin-tour",
        dashboard_registry()?,
        FixtureSession::signed_in(Role::Admin),
        STEPS,
    )?;
    report.print();
    Ok(report)
}
