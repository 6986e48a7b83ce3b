//! The dashboard route table and the roles the back-office hands out.
//!
//! Role → capability assignments stand in for the identity service, which
//! is out of scope here.  All data is fixed.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use routegate_contracts::{
    capability::CapabilitySet,
    error::{GuardError, GuardResult},
};
use routegate_registry::PermissionRegistry;

/// The dashboard's route permission table.
pub const DASHBOARD_POLICY: &str = include_str!("../policies/dashboard.toml");

/// Load and validate the dashboard table, ready to share between gates.
pub fn dashboard_registry() -> GuardResult<Arc<PermissionRegistry>> {
    Ok(Arc::new(PermissionRegistry::from_toml_str(DASHBOARD_POLICY)?))
}

/// A back-office role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Everything, including user management.
    Admin,
    /// About-Us, blog and work content.
    Editor,
    /// Parties, quotations and contracts.
    Sales,
    /// Signed in, but no role assigned yet.
    Guest,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Editor, Role::Sales, Role::Guest];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Sales => "sales",
            Role::Guest => "guest",
        }
    }

    /// Capability names granted to this role.
    pub fn capability_names(&self) -> &'static [&'static str] {
        match self {
            Role::Admin => &[
                "dashboard.view",
                "users.manage",
                "cms.manage",
                "parties:read",
                "parties:write",
                "quotations:read",
                "quotations:write",
                "contracts:read",
                "contracts:write",
            ],
            Role::Editor => &[
                "dashboard.view",
                "cms.about.write",
                "cms.blog.write",
                "cms.work.write",
            ],
            Role::Sales => &[
                "dashboard.view",
                "parties:read",
                "quotations:read",
                "quotations:write",
                "contracts:read",
            ],
            Role::Guest => &[],
        }
    }

    pub fn capabilities(&self) -> CapabilitySet {
        self.capability_names().iter().copied().collect()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| GuardError::ConfigError {
                reason: format!(
                    "unknown role '{}' (expected one of: admin, editor, sales, guest)",
                    s
                ),
            })
    }
}

#[cfg(test)]
mod tests {
    use routegate_contracts::capability::Capability;
    use routegate_core::{is_authorized, traits::RouteResolver};

    use super::*;

    #[test]
    fn dashboard_policy_loads() {
        let registry = dashboard_registry().unwrap();
        assert_eq!(registry.len(), 8);
        assert_eq!(registry.unauthorized_path(), "/unauthorized");
    }

    #[test]
    fn public_pages_are_unguarded() {
        let registry = dashboard_registry().unwrap();
        for path in ["/", "/services", "/work", "/work/abc123", "/team", "/contact", "/unauthorized"] {
            assert!(registry.resolve(path).is_none(), "{path} should be public");
        }
    }

    #[test]
    fn catch_all_covers_unlisted_sections() {
        let registry = dashboard_registry().unwrap();
        let required = registry.resolve("/dashboard/reports").unwrap();
        assert!(required.contains(&Capability::new("dashboard.view")));
    }

    #[test]
    fn admin_reaches_every_rule() {
        let registry = dashboard_registry().unwrap();
        let admin = Role::Admin.capabilities();
        for rule in registry.rules() {
            assert!(
                is_authorized(&admin, Some(&rule.required)),
                "admin should reach {}",
                rule.pattern
            );
        }
    }

    #[test]
    fn guest_reaches_no_rule() {
        let registry = dashboard_registry().unwrap();
        let guest = Role::Guest.capabilities();
        assert!(guest.is_empty());
        for rule in registry.rules() {
            assert!(!is_authorized(&guest, Some(&rule.required)));
        }
    }

    #[test]
    fn role_round_trips_through_its_name() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!(matches!("owner".parse::<Role>(), Err(GuardError::ConfigError { .. })));
    }
}
