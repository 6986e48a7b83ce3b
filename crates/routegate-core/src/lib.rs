//! # routegate-core
//!
//! The authorization rule and its enforcement point.
//!
//! This crate provides:
//! - The seam traits (`RouteResolver`, `CapabilitySource`, `Navigator`,
//!   `DecisionLog`)
//! - `is_authorized` / `decide`, the pure decision rule
//! - `EnforcementGate`, the per-subtree state machine that turns decisions
//!   into render/redirect outcomes
//! - `NavigationDriver`, which wires a gate to its collaborators
//!
//! ## Usage
//!
//! ```rust,ignore
//! use routegate_core::{EnforcementGate, NavigationDriver};
//!
//! let mut gate = EnforcementGate::new(registry.clone());
//! let outcome = gate.evaluate("/dashboard/users", Some(&held));
//! ```

pub mod decision;
pub mod driver;
pub mod gate;
pub mod traits;

pub use decision::{decide, is_authorized};
pub use driver::NavigationDriver;
pub use gate::EnforcementGate;
