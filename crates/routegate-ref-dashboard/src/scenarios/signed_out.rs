//! Scenario 3: Signed-out visitor
//!
//! A visitor with no session browses the public site and then tries the
//! dashboard.  The identity provider has nothing to offer, so the gate
//! evaluates with an empty capability set: public pages render, every
//! dashboard page is denied.

use routegate_contracts::error::GuardResult;

use super::{run_steps, Expect, ScenarioReport, Step};
use crate::{fixtures::dashboard_registry, session::FixtureSession};

const STEPS: &[Step] = &[
    Step::Visit { path: "/", expect: Expect::Allow },
    Step::Visit { path: "/services", expect: Expect::Allow },
    Step::Visit { path: "/work/dQw4w9WgXcQ", expect: Expect::Allow },
    Step::Visit { path: "/team", expect: Expect::Allow },
    Step::Visit { path: "/contact#form", expect: Expect::Allow },
    Step::Visit { path: "/dashboard", expect: Expect::Redirect },
    Step::Visit { path: "/unauthorized", expect: Expect::Allow },
    Step::Visit { path: "/dashboard/blog", expect: Expect::Redirect },
];

/// Run Scenario 3 and print its report.
pub fn run_scenario() -> GuardResult<ScenarioReport> {
    println!("=== Scenario 3: Signed-out visitor ===");
    println!("  Session: none");
    println!();

    let report = run_steps(
        "signed-out",
        dashboard_registry()?,
        FixtureSession::signed_out(),
        STEPS,
    )?;
    report.print();
    Ok(report)
}
