//! Provider traits for identity and attribute authorities.

use std::fmt::Debug;

use async_trait::async_trait;
use uuid::Uuid;

use aac_model::attributes::{UserAttributes, UserAuthenticatedPrincipal};
use aac_model::identity::{Authority, UserIdentity};

use crate::error::ProviderResult;

/// Common metadata of a configured provider instance.
///
/// One instance exists per authority, per realm, per configuration. The
/// `provider_id` is unique across the whole registry.
pub trait ConfiguredProvider: Send + Sync + Debug {
    /// The authority family this provider implements.
    fn authority(&self) -> Authority;

    /// Unique id of this configured instance.
    fn provider_id(&self) -> &str;

    /// Realm this instance is configured for.
    fn realm(&self) -> &str;
}

/// A configured identity provider instance.
///
/// Implementations talk to a specific external protocol or internal store.
/// They must be thread-safe; calls are bounded by the aggregation engine's
/// per-provider timeout.
#[async_trait]
pub trait IdentityProvider: ConfiguredProvider {
    /// Lists the identities this provider has registered for a subject.
    ///
    /// An unknown subject yields an empty list, not an error.
    async fn list_identities(&self, subject_id: Uuid) -> ProviderResult<Vec<UserIdentity>>;

    /// Deletes every identity this provider holds for a subject.
    async fn delete_identities(&self, subject_id: Uuid) -> ProviderResult<()>;
}

/// A configured attribute provider instance.
///
/// Maps provider-specific claims into normalized attribute sets. Within one
/// response, set identifiers are unique. Providers may persist the sets
/// they produce; the aggregation engine only reads and merges.
#[async_trait]
pub trait AttributeProvider: ConfiguredProvider {
    /// Fetches the attribute sets this provider holds for a subject.
    ///
    /// Providers that do not persist attributes may return an empty list.
    async fn get_user_attributes(&self, subject_id: Uuid) -> ProviderResult<Vec<UserAttributes>>;

    /// Converts raw principal claims captured at login into normalized
    /// attribute sets for the subject.
    async fn convert_principal_attributes(
        &self,
        principal: &UserAuthenticatedPrincipal,
        subject_id: Uuid,
    ) -> ProviderResult<Vec<UserAttributes>>;

    /// Deletes every attribute set this provider holds for a subject.
    async fn delete_user_attributes(&self, subject_id: Uuid) -> ProviderResult<()>;
}
