//! # routegate-registry
//!
//! A TOML-driven route permission registry for routegate.
//!
//! ## Overview
//!
//! This crate provides [`PermissionRegistry`], which implements the
//! [`RouteResolver`](routegate_core::traits::RouteResolver) trait.  Rules
//! map a route path to the capabilities that grant access to it.  They are
//! declared in a TOML document, checked once at load time, and evaluated in
//! order; the first matching rule wins.  A path no rule matches is
//! unguarded.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::{path::Path, sync::Arc};
//! use routegate_registry::PermissionRegistry;
//!
//! let registry = Arc::new(PermissionRegistry::from_file(Path::new("policies/dashboard.toml"))?);
//! // Hand `registry` to every `routegate_core::EnforcementGate::new(...)`.
//! ```
//!
//! ## Rule matching
//!
//! A rule's `pattern` matches a path equal to it or beginning with
//! `pattern + "/"`.  Matching is case-sensitive and literal; hosts strip
//! trailing slashes and query strings before lookup.

pub mod registry;
pub mod rule;

pub use registry::{resolve_required_capabilities, PermissionRegistry};
pub use rule::{pattern_matches, RegistryConfig, RouteRule, RuleEntry, DEFAULT_UNAUTHORIZED_PATH};

// ── Tests ─────────────────────────────────────────────────────────────────────
