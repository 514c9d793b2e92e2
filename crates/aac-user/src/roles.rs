//! Role and group resolution traits.
//!
//! Role storage and role inheritance are kept separate: `get_roles` returns
//! direct assignments only, and the aggregation engine composes the
//! group-to-member inheritance by unioning each group's own roles into the
//! subject's set.

use std::collections::HashSet;

use async_trait::async_trait;
use uuid::Uuid;

use aac_model::group::Group;
use aac_model::role::RealmRole;

use crate::error::UserResult;

/// Resolves realm-scoped role assignments.
#[async_trait]
pub trait RoleService: Send + Sync {
    /// Returns the roles directly assigned to an entity (subject or group)
    /// in a realm. No inheritance is applied here.
    async fn get_roles(&self, entity_id: Uuid, realm: &str) -> UserResult<HashSet<RealmRole>>;
}

/// Resolves group memberships.
#[async_trait]
pub trait GroupService: Send + Sync {
    /// Returns the groups a subject directly belongs to in a realm.
    ///
    /// Membership does not recurse into parent groups: a member of a child
    /// group is not considered a member of its parent, and only the child
    /// group's own roles apply during role resolution.
    async fn get_subject_groups(&self, subject_id: Uuid, realm: &str)
        -> UserResult<HashSet<Group>>;

    /// Removes every group membership of a subject, across realms.
    ///
    /// Called during user deletion, after provider cleanup and before the
    /// subject record is removed.
    async fn delete_subject_memberships(&self, subject_id: Uuid) -> UserResult<()>;
}
