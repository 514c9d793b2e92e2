//! Cross-realm user translation.
//!
//! When a subject homed in realm A is viewed from realm B, the aggregate
//! passes through a translator that applies B's visibility policy. Fields
//! not explicitly permitted for cross-realm exposure are cleared, never
//! defaulted to a stale or fabricated value. Translation is opt-in: with no
//! translator configured, cross-realm resolution fails closed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use aac_model::user::User;

/// The policy component controlling what a subject's data looks like when
/// viewed from a non-home realm.
///
/// Implementations must be pure over the input user and their policy: no
/// provider calls, no persistence.
pub trait UserTranslator: Send + Sync {
    /// Translates a user aggregate into a view for the target realm.
    ///
    /// The returned aggregate's `realm` is the target realm. Realm-scoped
    /// collections (groups, roles, authorities, attributes) are cleared
    /// here and re-layered by the engine using the target realm afterwards.
    fn translate(&self, user: User, target_realm: &str) -> User;
}

/// Field-level visibility for one target realm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationPolicy {
    /// Expose the home-realm username.
    pub share_username: bool,
    /// Expose the email address and its verification state.
    pub share_email: bool,
    /// Expose provider-asserted identities.
    pub share_identities: bool,
    /// Expose login audit fields (login date, ip, provider).
    pub share_audit: bool,
}

impl Default for TranslationPolicy {
    fn default() -> Self {
        // Cross-realm default: expose the username, redact the rest.
        Self {
            share_username: true,
            share_email: false,
            share_identities: false,
            share_audit: false,
        }
    }
}

impl TranslationPolicy {
    /// Policy exposing every field (for trusted realm pairs).
    #[must_use]
    pub const fn share_all() -> Self {
        Self {
            share_username: true,
            share_email: true,
            share_identities: true,
            share_audit: true,
        }
    }
}

/// A translator driven by per-realm field allow-lists.
///
/// Realms without an explicit entry fall back to the default policy.
#[derive(Debug, Clone, Default)]
pub struct PolicyTranslator {
    default_policy: TranslationPolicy,
    realm_policies: HashMap<String, TranslationPolicy>,
}

impl PolicyTranslator {
    /// Creates a translator with the default (redacting) policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fallback policy.
    #[must_use]
    pub fn with_default_policy(mut self, policy: TranslationPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    /// Sets the policy for one target realm.
    #[must_use]
    pub fn with_realm_policy(mut self, realm: impl Into<String>, policy: TranslationPolicy) -> Self {
        self.realm_policies.insert(realm.into(), policy);
        self
    }

    fn policy_for(&self, realm: &str) -> &TranslationPolicy {
        self.realm_policies.get(realm).unwrap_or(&self.default_policy)
    }
}

impl UserTranslator for PolicyTranslator {
    fn translate(&self, mut user: User, target_realm: &str) -> User {
        let policy = self.policy_for(target_realm);

        user.realm = target_realm.to_string();

        if !policy.share_username {
            user.username = String::new();
        }
        if !policy.share_email {
            user.email = None;
            user.email_verified = false;
        }
        if !policy.share_identities {
            user.identities.clear();
        }
        if !policy.share_audit {
            user.login_date = None;
            user.login_ip = None;
            user.login_provider = None;
        }

        // Realm-scoped data never crosses realms; the engine re-layers it
        // for the target realm after translation.
        user.attributes.clear();
        user.groups.clear();
        user.realm_roles.clear();
        user.authorities.clear();

        user
    }
}
