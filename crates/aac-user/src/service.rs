//! The user aggregation engine.
//!
//! [`UserService`] materializes a [`User`] view for a `(subject, realm)`
//! pair by fanning out to every configured identity and attribute provider,
//! resolving groups and roles, and applying cross-realm translation policy.
//!
//! Fan-out is fail-soft: a single provider failing or timing out
//! contributes an empty result and a warning, never an error to the
//! caller. The aggregate is freshly built per call; if the caller drops the
//! resolve future, in-flight provider calls are abandoned with it and no
//! partial aggregate becomes visible.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tokio::time::timeout;
use tracing::{debug, warn};
use uuid::Uuid;

use aac_authority::{
    AttributeAuthorityRegistry, AttributeProvider, IdentityAuthorityRegistry, IdentityProvider,
    ProviderResult,
};
use aac_model::attributes::{UserAttributes, UserAuthenticatedPrincipal};
use aac_model::group::Group;
use aac_model::identity::UserIdentity;
use aac_model::role::RealmRole;
use aac_model::user::{GrantedAuthority, User};

use crate::config::FanOutConfig;
use crate::error::{UserError, UserResult};
use crate::roles::{GroupService, RoleService};
use crate::store::{RealmStore, SubjectStore};
use crate::translator::UserTranslator;

/// The cross-realm user aggregation engine.
///
/// Owns the lifecycle of the `User` aggregate per call; subjects,
/// identities and attributes stay owned by their stores and providers.
pub struct UserService {
    subjects: Arc<dyn SubjectStore>,
    realms: Arc<dyn RealmStore>,
    identity_authorities: Arc<IdentityAuthorityRegistry>,
    attribute_authorities: Arc<AttributeAuthorityRegistry>,
    role_service: Arc<dyn RoleService>,
    group_service: Arc<dyn GroupService>,
    translator: Option<Arc<dyn UserTranslator>>,
    config: FanOutConfig,
}

impl UserService {
    /// Creates an engine over the given stores, registries and services.
    ///
    /// No translator is configured initially, so cross-realm resolution
    /// fails closed until [`Self::with_translator`] is called.
    #[must_use]
    pub fn new(
        subjects: Arc<dyn SubjectStore>,
        realms: Arc<dyn RealmStore>,
        identity_authorities: Arc<IdentityAuthorityRegistry>,
        attribute_authorities: Arc<AttributeAuthorityRegistry>,
        role_service: Arc<dyn RoleService>,
        group_service: Arc<dyn GroupService>,
    ) -> Self {
        Self {
            subjects,
            realms,
            identity_authorities,
            attribute_authorities,
            role_service,
            group_service,
            translator: None,
            config: FanOutConfig::default(),
        }
    }

    /// Configures the cross-realm translator.
    #[must_use]
    pub fn with_translator(mut self, translator: Arc<dyn UserTranslator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Overrides the fan-out configuration.
    #[must_use]
    pub fn with_config(mut self, config: FanOutConfig) -> Self {
        self.config = config;
        self
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Materializes the `User` view of a subject for the requesting realm.
    ///
    /// For a same-realm request the view is complete. For a cross-realm
    /// request the identity-derived fields pass through the translator
    /// first, then realm-scoped data (attributes, groups, roles) is layered
    /// on using the requesting realm.
    ///
    /// ## Errors
    ///
    /// - [`UserError::NoSuchRealm`] when the requested realm is unknown.
    /// - [`UserError::NoSuchUser`] when the subject does not exist.
    /// - [`UserError::CrossRealmDenied`] when the subject is homed
    ///   elsewhere and no translator is configured.
    ///
    /// Provider failures during fan-out are absorbed and only observable as
    /// missing data.
    pub async fn resolve(&self, subject_id: Uuid, realm: &str) -> UserResult<User> {
        self.realms.get(realm).await?;
        let subject = self.subjects.get(subject_id).await?;
        let home_realm = subject.realm.clone();

        debug!(%subject_id, realm, home_realm, "resolving user");

        let mut user = User::from_subject(&subject, &home_realm);

        // Identity fan-out: home realm always, requested realm additionally
        // when different (the subject may also be registered there).
        for identity in self.fetch_identities(subject_id, &home_realm).await {
            user.add_identity(identity);
        }
        if home_realm != realm {
            for identity in self.fetch_identities(subject_id, realm).await {
                user.add_identity(identity);
            }
        }

        // Translation comes before realm-scoped layering: the translator
        // redacts identity-derived fields, then attributes, groups and
        // roles are resolved against the requested realm.
        if home_realm != realm {
            user = match &self.translator {
                Some(translator) => translator.translate(user, realm),
                None => return Err(UserError::CrossRealmDenied(realm.to_string())),
            };
        }

        for attributes in self.fetch_attributes(subject_id, realm).await {
            user.add_attributes(attributes);
        }

        let groups = self.group_service.get_subject_groups(subject_id, realm).await?;
        user.realm_roles = self.fetch_realm_roles(subject_id, realm, &groups).await?;
        user.groups = groups;

        user.authorities.insert(GrantedAuthority::user());

        Ok(user)
    }

    /// Lists the users homed in a realm, each resolved with the same
    /// semantics as [`Self::resolve`].
    ///
    /// Subjects deleted between the listing and their resolve are skipped.
    pub async fn list_users(&self, realm: &str) -> UserResult<Vec<User>> {
        self.realms.get(realm).await?;
        let subjects = self.subjects.list(realm).await?;

        let mut users = Vec::with_capacity(subjects.len());
        for subject in subjects {
            match self.resolve(subject.id, realm).await {
                Ok(user) => users.push(user),
                Err(UserError::NoSuchUser(_)) => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(users)
    }

    /// Finds a subject and returns a shallow view: base record and baseline
    /// authority, no identities, attributes, groups or roles.
    pub async fn find_user(&self, subject_id: Uuid) -> UserResult<Option<User>> {
        let Some(subject) = self.subjects.find(subject_id).await? else {
            return Ok(None);
        };

        let mut user = User::from_subject(&subject, &subject.realm);
        user.authorities.insert(GrantedAuthority::user());
        Ok(Some(user))
    }

    /// Returns the home realm of a subject.
    pub async fn get_user_realm(&self, subject_id: Uuid) -> UserResult<String> {
        Ok(self.subjects.get(subject_id).await?.realm)
    }

    /// Counts the users homed in a realm.
    pub async fn count_users(&self, realm: &str) -> UserResult<u64> {
        self.realms.get(realm).await?;
        self.subjects.count(realm).await
    }

    // ========================================================================
    // Attributes
    // ========================================================================

    /// Fetches every attribute set for a subject as seen from a realm.
    pub async fn get_user_attributes(
        &self,
        subject_id: Uuid,
        realm: &str,
    ) -> UserResult<Vec<UserAttributes>> {
        self.realms.get(realm).await?;
        self.subjects.get(subject_id).await?;
        Ok(self.fetch_attributes(subject_id, realm).await)
    }

    /// Fetches the attribute sets a single provider holds for a subject.
    ///
    /// ## Errors
    ///
    /// - [`UserError::NoSuchProvider`] when no provider has the given id.
    /// - [`UserError::RealmMismatch`] when the provider is configured for a
    ///   different realm than the invocation realm.
    pub async fn get_provider_attributes(
        &self,
        subject_id: Uuid,
        realm: &str,
        provider_id: &str,
    ) -> UserResult<Vec<UserAttributes>> {
        self.subjects.get(subject_id).await?;

        let provider = self
            .attribute_authorities
            .get(provider_id)
            .ok_or_else(|| UserError::NoSuchProvider(provider_id.to_string()))?;
        if provider.realm() != realm {
            return Err(UserError::realm_mismatch(provider.realm(), realm));
        }

        // An explicit per-provider fetch is not fan-out: failures surface.
        provider
            .get_user_attributes(subject_id)
            .await
            .map_err(|err| UserError::storage(err.to_string()))
    }

    /// Converts raw login claims into normalized attribute sets by fanning
    /// out over the attribute providers of the principal's realm.
    ///
    /// Fail-soft like any fan-out: a failing converter contributes nothing.
    pub async fn convert_principal_attributes(
        &self,
        principal: &UserAuthenticatedPrincipal,
        subject_id: Uuid,
    ) -> UserResult<Vec<UserAttributes>> {
        self.subjects.get(subject_id).await?;

        let providers = self.attribute_authorities.realm_providers(&principal.realm);
        let results = self
            .run_fan_out(providers, |provider| {
                let principal = principal.clone();
                async move {
                    provider
                        .convert_principal_attributes(&principal, subject_id)
                        .await
                }
            })
            .await;

        let mut merged: Vec<UserAttributes> = Vec::new();
        for attributes in results.into_iter().flatten() {
            merged.retain(|a| a.attributes_id() != attributes.attributes_id());
            merged.push(attributes);
        }
        Ok(merged)
    }

    // ========================================================================
    // Deletion
    // ========================================================================

    /// Deletes a user: provider-side cleanup first (identities, then
    /// attributes, both best-effort), then group memberships, then the
    /// subject record last.
    ///
    /// The reverse of creation order, so no dangling provider-side state
    /// references a vanished subject mid-deletion. A provider failing its
    /// delete is logged and does not prevent subject removal.
    pub async fn delete_user(&self, subject_id: Uuid) -> UserResult<()> {
        let subject = self.subjects.get(subject_id).await?;
        let home_realm = subject.realm;

        for provider in self.identity_authorities.realm_providers(&home_realm) {
            let call = timeout(
                self.config.provider_timeout,
                provider.delete_identities(subject_id),
            );
            match call.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(
                    provider = provider.provider_id(),
                    %subject_id,
                    error = %err,
                    "identity cleanup failed, continuing"
                ),
                Err(_) => warn!(
                    provider = provider.provider_id(),
                    %subject_id,
                    "identity cleanup timed out, continuing"
                ),
            }
        }

        for provider in self.attribute_authorities.realm_providers(&home_realm) {
            let call = timeout(
                self.config.provider_timeout,
                provider.delete_user_attributes(subject_id),
            );
            match call.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => warn!(
                    provider = provider.provider_id(),
                    %subject_id,
                    error = %err,
                    "attribute cleanup failed, continuing"
                ),
                Err(_) => warn!(
                    provider = provider.provider_id(),
                    %subject_id,
                    "attribute cleanup timed out, continuing"
                ),
            }
        }

        self.group_service.delete_subject_memberships(subject_id).await?;
        self.subjects.delete(subject_id).await
    }

    /// Removes a user through a realm-scoped admin call.
    ///
    /// ## Errors
    ///
    /// Returns [`UserError::RealmMismatch`] when the invocation realm is
    /// not the subject's home realm; cross-realm removal is a caller error.
    pub async fn remove_user(&self, subject_id: Uuid, realm: &str) -> UserResult<()> {
        let subject = self.subjects.get(subject_id).await?;
        if subject.realm != realm {
            return Err(UserError::realm_mismatch(&subject.realm, realm));
        }
        self.delete_user(subject_id).await
    }

    // ========================================================================
    // Fan-out internals
    // ========================================================================

    async fn fetch_identities(&self, subject_id: Uuid, realm: &str) -> Vec<UserIdentity> {
        let providers = self.identity_authorities.realm_providers(realm);
        let results = self
            .run_fan_out(providers, |provider| async move {
                provider.list_identities(subject_id).await
            })
            .await;
        results.into_iter().flatten().collect()
    }

    async fn fetch_attributes(&self, subject_id: Uuid, realm: &str) -> Vec<UserAttributes> {
        let providers = self.attribute_authorities.realm_providers(realm);
        let results = self
            .run_fan_out(providers, |provider| async move {
                provider.get_user_attributes(subject_id).await
            })
            .await;
        results.into_iter().flatten().collect()
    }

    /// Runs one call per provider, bounded by the configured timeout, and
    /// absorbs every failure into an empty contribution.
    ///
    /// Providers are independent and results merge via set union, so the
    /// calls run concurrently when configured; a failed call never cancels
    /// its siblings.
    async fn run_fan_out<P, F, Fut, T>(&self, providers: Vec<Arc<P>>, call: F) -> Vec<Vec<T>>
    where
        P: aac_authority::ConfiguredProvider + ?Sized,
        F: Fn(Arc<P>) -> Fut,
        Fut: std::future::Future<Output = ProviderResult<Vec<T>>>,
    {
        if self.config.parallel {
            let tasks = providers
                .into_iter()
                .map(|provider| self.guarded_call(provider, &call));
            join_all(tasks).await
        } else {
            let mut results = Vec::new();
            for provider in providers {
                results.push(self.guarded_call(provider, &call).await);
            }
            results
        }
    }

    async fn guarded_call<P, F, Fut, T>(&self, provider: Arc<P>, call: &F) -> Vec<T>
    where
        P: aac_authority::ConfiguredProvider + ?Sized,
        F: Fn(Arc<P>) -> Fut,
        Fut: std::future::Future<Output = ProviderResult<Vec<T>>>,
    {
        let provider_id = provider.provider_id().to_string();
        match timeout(self.config.provider_timeout, call(provider)).await {
            Ok(Ok(items)) => items,
            Ok(Err(err)) => {
                warn!(provider = %provider_id, error = %err, "provider failed, skipping");
                Vec::new()
            }
            Err(_) => {
                warn!(provider = %provider_id, "provider timed out, skipping");
                Vec::new()
            }
        }
    }

    /// Unions the subject's direct roles with the roles of every group the
    /// subject belongs to in the realm. Duplicate pairs collapse.
    async fn fetch_realm_roles(
        &self,
        subject_id: Uuid,
        realm: &str,
        groups: &HashSet<Group>,
    ) -> UserResult<HashSet<RealmRole>> {
        let mut roles = self.role_service.get_roles(subject_id, realm).await?;
        for group in groups {
            roles.extend(self.role_service.get_roles(group.id, realm).await?);
        }
        Ok(roles)
    }
}

impl std::fmt::Debug for UserService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("identity_providers", &self.identity_authorities.len())
            .field("attribute_providers", &self.attribute_authorities.len())
            .field("translator", &self.translator.is_some())
            .finish()
    }
}
