//! # routegate-ref-dashboard
//!
//! Reference deployment of routegate for the studio's back-office dashboard.
//!
//! Provides the dashboard route table (`policies/dashboard.toml`), the
//! back-office roles, fixture identity and router collaborators, and three
//! navigation scenarios:
//!
//! 1. **Admin tour**: every section renders.
//! 2. **Editor tour**: CMS sections render, user management and sales
//!    records redirect once each, a promotion opens user management.
//! 3. **Signed-out visitor**: public pages render, the dashboard fails
//!    closed.
//!
//! All data is fixed. No external services are contacted.

pub mod fixtures;
pub mod scenarios;
pub mod session;

pub use fixtures::{dashboard_registry, Role, DASHBOARD_POLICY};
pub use session::{FixtureSession, RecordingNavigator};
