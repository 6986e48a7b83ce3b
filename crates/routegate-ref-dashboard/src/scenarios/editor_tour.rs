//! Scenario 2: Editor tour
//!
//! A content editor works through the CMS sections, strays into user
//! management and the sales records, and is later promoted to admin.
//!
//! Shows:
//! - a single redirect per denied page, even across re-renders
//! - a second redirect when a different page is denied
//! - the gate picking up a role change on the next navigation

use routegate_contracts::error::GuardResult;

use super::{run_steps, Expect, ScenarioReport, Step};
use crate::{
    fixtures::{dashboard_registry, Role},
    session::FixtureSession,
};

const STEPS: &[Step] = &[
    Step::Visit { path: "/dashboard", expect: Expect::Allow },
    Step::Visit { path: "/dashboard/blog/new", expect: Expect::Allow },
    Step::Visit { path: "/dashboard/work/showreel-2024", expect: Expect::Allow },
    Step::Visit { path: "/dashboard/users", expect: Expect::Redirect },
    // Re-render of the same page: still hidden, no second redirect.
    Step::Visit { path: "/dashboard/users", expect: Expect::StillDenied },
    Step::Visit { path: "/dashboard/parties", expect: Expect::Redirect },
    Step::Visit { path: "/dashboard/about-us", expect: Expect::Allow },
    Step::SwitchRole(Role::Admin),
    Step::Visit { path: "/dashboard/users", expect: Expect::Allow },
];

/// Run Scenario 2 and print its report.
pub fn run_scenario() -> GuardResult<ScenarioReport> {
    println!("=== Scenario 2: Editor tour ===");
    println!("  Role: editor, promoted to admin part-way through");
    println!();

    let report = run_steps(
        "editor-tour",
        dashboard_registry()?,
        FixtureSession::signed_in(Role::Editor),
        STEPS,
    )?;
    report.print();
    Ok(report)
}
