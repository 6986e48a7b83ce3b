//! The permission registry.
//!
//! `PermissionRegistry` is built once at startup from a validated
//! `RegistryConfig` and implements `RouteResolver` from routegate-core.
//! It never changes after construction; share it behind an `Arc`.
//!
//! Lookup algorithm:
//!
//! 1. Iterate rules in declaration order.
//! 2. A rule matches when the path equals its pattern or starts with
//!    `pattern + "/"`.
//! 3. Return the first match's required set.
//! 4. No match → `None`: the route is unguarded.

use std::path::Path;

use tracing::{debug, info};

use routegate_contracts::{capability::RequiredSet, error::GuardResult};
use routegate_core::traits::RouteResolver;

use crate::rule::{RegistryConfig, RouteRule};

/// Return the required set of the first rule in `rules` that matches `path`.
///
/// Deterministic, O(rules), no normalization: `path` is compared as given.
pub fn resolve_required_capabilities<'a>(rules: &'a [RouteRule], path: &str) -> Option<&'a RequiredSet> {
    rules.iter().find(|rule| rule.matches(path)).map(|rule| &rule.required)
}

/// An immutable, ordered route → capability table.
///
/// ```rust,ignore
/// use routegate_registry::PermissionRegistry;
///
/// let registry = PermissionRegistry::from_file(Path::new("policies/dashboard.toml"))?;
/// let required = registry.resolve("/dashboard/users/42");
/// ```
#[derive(Debug, Clone)]
pub struct PermissionRegistry {
    rules: Vec<RouteRule>,
    unauthorized_path: String,
}

impl PermissionRegistry {
    /// Validate `config` and build a registry from it.
    pub fn from_config(config: &RegistryConfig) -> GuardResult<Self> {
        let rules = config.validate()?;
        let unauthorized_path = config.unauthorized_path().to_string();

        info!(
            rules = rules.len(),
            unauthorized_path = %unauthorized_path,
            "permission registry loaded"
        );

        Ok(Self { rules, unauthorized_path })
    }

    /// Parse and validate a TOML registry document.
    pub fn from_toml_str(s: &str) -> GuardResult<Self> {
        Self::from_config(&RegistryConfig::from_toml_str(s)?)
    }

    /// Read, parse and validate the TOML registry document at `path`.
    pub fn from_file(path: &Path) -> GuardResult<Self> {
        Self::from_config(&RegistryConfig::from_file(path)?)
    }

    /// Load `base`, layer each file in `overrides` on top in order, then validate.
    pub fn from_files(base: &Path, overrides: &[&Path]) -> GuardResult<Self> {
        let mut config = RegistryConfig::from_file(base)?;
        for path in overrides {
            config = config.with_overrides(RegistryConfig::from_file(path)?);
        }
        Self::from_config(&config)
    }

    /// Rules in priority order.
    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The rule that guards `path`, if any.
    pub fn matching_rule(&self, path: &str) -> Option<&RouteRule> {
        let rule = self.rules.iter().find(|rule| rule.matches(path));
        match rule {
            Some(rule) => debug!(path = %path, pattern = %rule.pattern, "rule matched"),
            None => debug!(path = %path, "no rule matched; route is unguarded"),
        }
        rule
    }
}

impl RouteResolver for PermissionRegistry {
    fn resolve(&self, path: &str) -> Option<&RequiredSet> {
        self.matching_rule(path).map(|rule| &rule.required)
    }

    fn unauthorized_path(&self) -> &str {
        &self.unauthorized_path
    }
}
