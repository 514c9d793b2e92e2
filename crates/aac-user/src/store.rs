//! Subject and realm store traits.
//!
//! The aggregation engine reads subjects and realms through these traits;
//! persistence implementations live elsewhere and own the stored records.

use async_trait::async_trait;
use uuid::Uuid;

use aac_model::realm::Realm;
use aac_model::subject::Subject;

use crate::error::UserResult;

/// Storage access for subject records.
#[async_trait]
pub trait SubjectStore: Send + Sync {
    /// Gets a subject by id.
    ///
    /// ## Errors
    ///
    /// Returns [`crate::UserError::NoSuchUser`] if the subject does not
    /// exist.
    async fn get(&self, subject_id: Uuid) -> UserResult<Subject>;

    /// Finds a subject by id, returning None when absent.
    async fn find(&self, subject_id: Uuid) -> UserResult<Option<Subject>>;

    /// Lists the subjects homed in a realm.
    async fn list(&self, realm: &str) -> UserResult<Vec<Subject>>;

    /// Counts the subjects homed in a realm.
    async fn count(&self, realm: &str) -> UserResult<u64>;

    /// Deletes a subject record.
    ///
    /// Called last during user deletion, after provider-side cleanup.
    async fn delete(&self, subject_id: Uuid) -> UserResult<()>;
}

/// Storage access for realm records.
#[async_trait]
pub trait RealmStore: Send + Sync {
    /// Gets a realm by slug.
    ///
    /// ## Errors
    ///
    /// Returns [`crate::UserError::NoSuchRealm`] if the realm does not
    /// exist.
    async fn get(&self, slug: &str) -> UserResult<Realm>;
}
