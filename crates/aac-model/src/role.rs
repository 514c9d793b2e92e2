//! Realm role model.

use serde::{Deserialize, Serialize};

/// A `(realm, role)` pair assigned to a subject or a group.
///
/// Roles are value objects with set semantics: the same pair assigned
/// directly and through a group collapses into one entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RealmRole {
    /// Realm the role is scoped to.
    pub realm: String,
    /// Role name within the realm.
    pub role: String,
}

impl RealmRole {
    /// Creates a new realm role.
    #[must_use]
    pub fn new(realm: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            realm: realm.into(),
            role: role.into(),
        }
    }

    /// Returns the authority string form, `realm:role`.
    #[must_use]
    pub fn authority(&self) -> String {
        format!("{}:{}", self.realm, self.role)
    }
}
