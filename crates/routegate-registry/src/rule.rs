//! Route rule types and registry configuration schema.
//!
//! A `RegistryConfig` is deserialized from TOML and holds an ordered list of
//! `RuleEntry`s.  `RegistryConfig::validate` turns the entries into
//! `RouteRule`s, rejecting anything that would make lookups ambiguous or
//! could send a denied caller into a redirect loop.
//!
//! Precedence is declaration order: the first rule whose pattern matches a
//! path wins.  A rule that an earlier rule already covers could never fire,
//! so it is rejected instead of silently ignored.  Declare specific routes
//! before broad ones.

use std::path::Path;

use serde::{Deserialize, Serialize};

use routegate_contracts::{
    capability::{Capability, RequiredSet},
    error::{GuardError, GuardResult},
    path::is_normalized,
};

/// Where denied callers are sent when the document does not say otherwise.
pub const DEFAULT_UNAUTHORIZED_PATH: &str = "/unauthorized";

/// Return true if `path` is `pattern` itself or lies beneath it.
///
/// `/dashboard/users` matches `/dashboard/users` and `/dashboard/users/42`
/// but not `/dashboard/users-archive`.  Case-sensitive; no normalization.
pub fn pattern_matches(pattern: &str, path: &str) -> bool {
    match path.strip_prefix(pattern) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// A rule as written in the registry document, before validation.
///
/// Example in TOML:
/// ```toml
/// [[rules]]
/// pattern = "/dashboard/users"
/// required = ["users.manage"]
/// description = "User management"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Literal route path, absolute, without a trailing slash.
    pub pattern: String,

    /// Capabilities that grant access; holding any one is enough.
    #[serde(default)]
    pub required: Vec<Capability>,

    /// Shown in listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RuleEntry {
    pub fn new<I, S>(pattern: impl Into<String>, required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pattern: pattern.into(),
            required: required.into_iter().map(Capability::new).collect(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A validated rule: a pattern and the non-empty set of capabilities it asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRule {
    pub pattern: String,
    pub required: RequiredSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RouteRule {
    /// Return true if this rule guards `path`.
    pub fn matches(&self, path: &str) -> bool {
        pattern_matches(&self.pattern, path)
    }
}

/// The top-level structure deserialized from a TOML registry document.
///
/// Rules are matched in the order they appear in the `rules` array.
///
/// ```toml
/// unauthorized_path = "/unauthorized"
///
/// [[rules]]
/// pattern = "/dashboard/parties"
/// required = ["parties:read"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Redirect target for denied callers. Defaults to `/unauthorized`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unauthorized_path: Option<String>,

    /// Ordered list of rules.  First match wins.
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

impl RegistryConfig {
    /// Parse `s` as a TOML registry document.
    ///
    /// Returns `GuardError::ConfigError` if the TOML is malformed or does
    /// not match the `RegistryConfig` schema.  The document is not validated;
    /// see `validate`.
    pub fn from_toml_str(s: &str) -> GuardResult<Self> {
        toml::from_str(s).map_err(|e| GuardError::ConfigError {
            reason: format!("failed to parse registry TOML: {}", e),
        })
    }

    /// Read and parse the TOML registry document at `path`.
    pub fn from_file(path: &Path) -> GuardResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| GuardError::ConfigError {
            reason: format!("failed to read registry file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The configured redirect target, or `DEFAULT_UNAUTHORIZED_PATH`.
    pub fn unauthorized_path(&self) -> &str {
        self.unauthorized_path
            .as_deref()
            .unwrap_or(DEFAULT_UNAUTHORIZED_PATH)
    }

    /// Layer `overrides` on top of this document.
    ///
    /// - An override for an existing pattern replaces its capabilities (and
    ///   its description, if the override has one) in place, keeping the
    ///   original priority.
    /// - A new pattern is inserted just before the first existing rule that
    ///   would otherwise shadow it, or appended if none would.
    /// - `unauthorized_path` is replaced when the override sets it.
    pub fn with_overrides(mut self, overrides: RegistryConfig) -> Self {
        if overrides.unauthorized_path.is_some() {
            self.unauthorized_path = overrides.unauthorized_path;
        }

        for entry in overrides.rules {
            if let Some(existing) = self.rules.iter_mut().find(|r| r.pattern == entry.pattern) {
                existing.required = entry.required;
                if entry.description.is_some() {
                    existing.description = entry.description;
                }
                continue;
            }

            let position = self
                .rules
                .iter()
                .position(|r| pattern_matches(&r.pattern, &entry.pattern))
                .unwrap_or(self.rules.len());
            self.rules.insert(position, entry);
        }

        self
    }

    /// Check every entry and produce the validated rule list.
    ///
    /// Rejects, in declaration order:
    /// - patterns that are empty, relative, carry a trailing slash, a query
    ///   or fragment, or repeated slashes (`InvalidPattern`).  The root
    ///   pattern `/` is allowed and guards the home page only.
    /// - duplicate patterns (`DuplicatePattern`)
    /// - rules with no capabilities (`EmptyRequiredSet`) or with an empty
    ///   capability name (`InvalidCapability`); names are otherwise opaque
    /// - rules an earlier rule already covers (`ShadowedRule`)
    /// - an unauthorized destination that is not a normalized absolute path
    ///   (`ConfigError`) or that a rule guards (`RedirectLoop`)
    pub fn validate(&self) -> GuardResult<Vec<RouteRule>> {
        let mut rules: Vec<RouteRule> = Vec::with_capacity(self.rules.len());

        for entry in &self.rules {
            validate_pattern(&entry.pattern)?;

            if let Some(earlier) = rules.iter().find(|r| r.matches(&entry.pattern)) {
                return Err(if earlier.pattern == entry.pattern {
                    GuardError::DuplicatePattern {
                        pattern: entry.pattern.clone(),
                    }
                } else {
                    GuardError::ShadowedRule {
                        pattern: entry.pattern.clone(),
                        shadowed_by: earlier.pattern.clone(),
                    }
                });
            }

            for cap in &entry.required {
                validate_capability(&entry.pattern, cap)?;
            }

            let required = RequiredSet::new(entry.required.iter().cloned()).ok_or_else(|| {
                GuardError::EmptyRequiredSet {
                    pattern: entry.pattern.clone(),
                }
            })?;

            rules.push(RouteRule {
                pattern: entry.pattern.clone(),
                required,
                description: entry.description.clone(),
            });
        }

        let unauthorized = self.unauthorized_path();
        if !unauthorized.starts_with('/') || !is_normalized(unauthorized) {
            return Err(GuardError::ConfigError {
                reason: format!(
                    "unauthorized_path '{}' must be a normalized absolute path",
                    unauthorized
                ),
            });
        }
        if let Some(guard) = rules.iter().find(|r| r.matches(unauthorized)) {
            return Err(GuardError::RedirectLoop {
                path: unauthorized.to_string(),
                pattern: guard.pattern.clone(),
            });
        }

        Ok(rules)
    }
}

fn validate_pattern(pattern: &str) -> GuardResult<()> {
    let reason = if pattern.is_empty() {
        Some("pattern is empty")
    } else if !pattern.starts_with('/') {
        Some("pattern must start with '/'")
    } else if pattern != "/" && pattern.ends_with('/') {
        Some("pattern must not end with '/'")
    } else if pattern.contains(['?', '#']) {
        Some("pattern must not contain a query or fragment")
    } else if pattern.contains("//") {
        Some("pattern must not contain empty segments")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(GuardError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

fn validate_capability(pattern: &str, cap: &Capability) -> GuardResult<()> {
    let name = cap.as_str();
    if name.is_empty() {
        return Err(GuardError::InvalidCapability {
            pattern: pattern.to_string(),
            reason: "capability name is empty".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_matches_exact_and_nested() {
        assert!(pattern_matches("/dashboard/users", "/dashboard/users"));
        assert!(pattern_matches("/dashboard/users", "/dashboard/users/42"));
        assert!(pattern_matches("/dashboard/users", "/dashboard/users/42/edit"));
    }

    #[test]
    fn pattern_does_not_match_sibling_with_shared_prefix() {
        assert!(!pattern_matches("/dashboard/users", "/dashboard/users-archive"));
        assert!(!pattern_matches("/dashboard/users", "/dashboard"));
        assert!(!pattern_matches("/dashboard/users", "/Dashboard/users"));
    }

    #[test]
    fn pattern_is_compared_without_normalization() {
        assert!(pattern_matches("/dashboard/users", "/dashboard/users/"));
        assert!(!pattern_matches("/dashboard/users", "/dashboard/users?tab=1"));
    }

    #[test]
    fn overrides_replace_in_place() {
        let base = RegistryConfig {
            unauthorized_path: None,
            rules: vec![
                RuleEntry::new("/dashboard/users", ["users.manage"]).with_description("Users"),
                RuleEntry::new("/dashboard/blog", ["blog.write"]),
            ],
        };
        let overrides = RegistryConfig {
            unauthorized_path: Some("/denied".to_string()),
            rules: vec![RuleEntry::new("/dashboard/users", ["users.manage", "users.read"])],
        };

        let merged = base.with_overrides(overrides);
        assert_eq!(merged.unauthorized_path(), "/denied");
        assert_eq!(merged.rules[0].pattern, "/dashboard/users");
        assert_eq!(merged.rules[0].required.len(), 2);
        assert_eq!(merged.rules[0].description.as_deref(), Some("Users"));
        assert_eq!(merged.rules[1].pattern, "/dashboard/blog");
    }

    #[test]
    fn overrides_insert_specific_rules_before_broad_ones() {
        let base = RegistryConfig {
            unauthorized_path: None,
            rules: vec![
                RuleEntry::new("/dashboard/blog", ["blog.write"]),
                RuleEntry::new("/dashboard", ["dashboard.view"]),
            ],
        };
        let overrides = RegistryConfig {
            unauthorized_path: None,
            rules: vec![
                RuleEntry::new("/dashboard/contracts", ["contracts:read"]),
                RuleEntry::new("/settings", ["settings.manage"]),
            ],
        };

        let merged = base.with_overrides(overrides);
        let patterns: Vec<&str> = merged.rules.iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(
            patterns,
            vec!["/dashboard/blog", "/dashboard/contracts", "/dashboard", "/settings"]
        );
        assert!(merged.validate().is_ok());
    }

    #[test]
    fn default_unauthorized_path() {
        assert_eq!(RegistryConfig::default().unauthorized_path(), DEFAULT_UNAUTHORIZED_PATH);
    }
}
