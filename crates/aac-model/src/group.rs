//! Group domain model.
//!
//! Groups are realm-scoped collections of subjects and may form a
//! single-parent tree. Acyclicity is maintained by the group storage, not
//! re-checked here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A realm-scoped named collection of subjects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier; also the role-assignment target id.
    pub id: Uuid,
    /// Realm the group belongs to.
    pub realm: String,
    /// Group name, unique within the realm.
    pub name: String,
    /// Parent group, if nested.
    pub parent_id: Option<Uuid>,
    /// When the group was created.
    pub create_date: DateTime<Utc>,
}

impl Group {
    /// Creates a new top-level group.
    #[must_use]
    pub fn new(realm: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            realm: realm.into(),
            name: name.into(),
            parent_id: None,
            create_date: Utc::now(),
        }
    }

    /// Creates a child of an existing group.
    #[must_use]
    pub fn new_child(realm: impl Into<String>, parent_id: Uuid, name: impl Into<String>) -> Self {
        let mut group = Self::new(realm, name);
        group.parent_id = Some(parent_id);
        group
    }

    /// Checks if this is a top-level group.
    #[must_use]
    pub const fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl PartialEq for Group {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Group {}

impl std::hash::Hash for Group {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
