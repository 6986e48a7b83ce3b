//! Fixture collaborators for the navigation driver.
//!
//! `FixtureSession` plays the identity provider and `RecordingNavigator`
//! plays the router.  Both are cheap to clone; clones share state, so a
//! scenario can keep a handle after moving a copy into the driver.

use std::sync::{Arc, Mutex};

use routegate_contracts::{
    capability::CapabilitySet,
    error::{GuardError, GuardResult},
};
use routegate_core::traits::{CapabilitySource, Navigator};

use crate::fixtures::Role;

/// A session whose capabilities the scenario controls.
///
/// `None` models a visitor with no session at all: `current()` fails and
/// the driver falls back to an empty set.
#[derive(Clone)]
pub struct FixtureSession {
    held: Arc<Mutex<Option<CapabilitySet>>>,
}

impl FixtureSession {
    pub fn signed_in(role: Role) -> Self {
        Self::with_capabilities(role.capabilities())
    }

    pub fn with_capabilities(held: CapabilitySet) -> Self {
        Self {
            held: Arc::new(Mutex::new(Some(held))),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            held: Arc::new(Mutex::new(None)),
        }
    }

    /// Replace the session's capabilities, as a role change would.
    pub fn switch_role(&self, role: Role) -> GuardResult<()> {
        let mut held = self.held.lock().map_err(|e| GuardError::IdentityUnavailable {
            reason: format!("session lock poisoned: {}", e),
        })?;
        *held = Some(role.capabilities());
        Ok(())
    }
}

impl CapabilitySource for FixtureSession {
    fn current(&self) -> GuardResult<CapabilitySet> {
        let held = self.held.lock().map_err(|e| GuardError::IdentityUnavailable {
            reason: format!("session lock poisoned: {}", e),
        })?;
        held.clone().ok_or_else(|| GuardError::IdentityUnavailable {
            reason: "no active session".to_string(),
        })
    }
}

/// A router that only remembers where it was told to go.
#[derive(Clone, Default)]
pub struct RecordingNavigator {
    redirects: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Redirect targets in the order they were issued.
    pub fn redirects(&self) -> GuardResult<Vec<String>> {
        let redirects = self.redirects.lock().map_err(|e| GuardError::NavigationFailed {
            to: String::new(),
            reason: format!("navigator lock poisoned: {}", e),
        })?;
        Ok(redirects.clone())
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, to: &str) -> GuardResult<()> {
        let mut redirects = self.redirects.lock().map_err(|e| GuardError::NavigationFailed {
            to: to.to_string(),
            reason: format!("navigator lock poisoned: {}", e),
        })?;
        redirects.push(to.to_string());
        Ok(())
    }
}
