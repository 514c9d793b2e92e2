//! Realm domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tenant namespace partitioning users, providers, roles and groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Realm {
    /// URL-safe unique slug identifying the realm.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Whether the realm is discoverable by non-members.
    pub public: bool,
    /// When the realm was created.
    pub create_date: DateTime<Utc>,
}

impl Realm {
    /// Creates a new private realm.
    #[must_use]
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            public: false,
            create_date: Utc::now(),
        }
    }

    /// Marks the realm as public.
    #[must_use]
    pub const fn with_public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }
}

/// Pattern a realm slug must match.
pub const SLUG_PATTERN: &str = "^[a-zA-Z0-9_-]+$";

/// Checks whether a string is a valid realm slug.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
