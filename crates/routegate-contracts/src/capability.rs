//! Capability types.
//!
//! A capability is an opaque permission name such as `"users.manage"` or
//! `"parties:read"`.  Routes declare a `RequiredSet`; callers hold a
//! `CapabilitySet` supplied by the identity provider.  Holding any single
//! member of a route's required set is enough to enter it.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An opaque capability token.
///
/// No structure is assumed beyond equality.  Names are compared
/// case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capability(pub String);

impl Capability {
    /// Construct a capability from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Capability {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// The capabilities held by the current caller.
///
/// Produced per session by the identity provider and treated as a read-only
/// snapshot by the gate.  An empty set means "holds nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilitySet {
    inner: HashSet<Capability>,
}

impl CapabilitySet {
    /// Grant a capability to this set.
    pub fn grant(&mut self, capability: Capability) {
        self.inner.insert(capability);
    }

    /// Return true if the set contains the given capability.
    pub fn has(&self, capability: &Capability) -> bool {
        self.inner.contains(capability)
    }

    /// Return true if at least one member of `required` is held.
    pub fn intersects(&self, required: &RequiredSet) -> bool {
        required.iter().any(|cap| self.has(cap))
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Return an iterator over all granted capabilities.
    pub fn all(&self) -> impl Iterator<Item = &Capability> {
        self.inner.iter()
    }

    /// Granted capabilities in sorted order, for stable display.
    pub fn sorted(&self) -> Vec<&Capability> {
        let mut caps: Vec<&Capability> = self.inner.iter().collect();
        caps.sort();
        caps
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(Capability::new).collect()
    }
}

/// Returned when a `RequiredSet` would be built from an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("a required capability set must list at least one capability")]
pub struct EmptyRequiredSet;

/// The capabilities a route asks for.  Never empty.
///
/// Order is preserved from the registry declaration so that listings and
/// deny messages read the same way the table was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Capability>", into = "Vec<Capability>")]
pub struct RequiredSet(Vec<Capability>);

impl RequiredSet {
    /// Build a required set, or `None` if `caps` is empty.
    ///
    /// Duplicate entries are dropped, keeping the first occurrence.
    pub fn new(caps: impl IntoIterator<Item = Capability>) -> Option<Self> {
        let mut unique: Vec<Capability> = Vec::new();
        for cap in caps {
            if !unique.contains(&cap) {
                unique.push(cap);
            }
        }
        if unique.is_empty() {
            None
        } else {
            Some(Self(unique))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, capability: &Capability) -> bool {
        self.0.contains(capability)
    }
}

impl TryFrom<Vec<Capability>> for RequiredSet {
    type Error = EmptyRequiredSet;

    fn try_from(caps: Vec<Capability>) -> Result<Self, Self::Error> {
        Self::new(caps).ok_or(EmptyRequiredSet)
    }
}

impl From<RequiredSet> for Vec<Capability> {
    fn from(set: RequiredSet) -> Self {
        set.0
    }
}

impl fmt::Display for RequiredSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Capability::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
