//! Authority registries.
//!
//! Registries map `(authority, realm)` to the configured provider
//! instances currently enabled for that realm. They are read-mostly:
//! registration and deregistration build a fresh snapshot and swap it in
//! atomically, so in-flight readers see either the old or the new provider
//! set, never a partially-updated one.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use aac_model::identity::Authority;

use crate::provider::{AttributeProvider, ConfiguredProvider, IdentityProvider};

/// Registry of identity provider instances.
pub type IdentityAuthorityRegistry = AuthorityRegistry<dyn IdentityProvider>;

/// Registry of attribute provider instances.
pub type AttributeAuthorityRegistry = AuthorityRegistry<dyn AttributeProvider>;

struct Snapshot<P: ?Sized> {
    by_key: HashMap<(Authority, String), Vec<Arc<P>>>,
    by_id: HashMap<String, Arc<P>>,
}

impl<P: ?Sized> Snapshot<P> {
    fn empty() -> Self {
        Self {
            by_key: HashMap::new(),
            by_id: HashMap::new(),
        }
    }

    fn duplicate(&self) -> Self {
        Self {
            by_key: self.by_key.clone(),
            by_id: self.by_id.clone(),
        }
    }
}

/// A registry of configured provider instances keyed by authority and realm.
///
/// Lookups never fail for unconfigured realms: a realm with no providers of
/// an authority yields an empty list, absence is not an error.
pub struct AuthorityRegistry<P: ConfiguredProvider + ?Sized> {
    snapshot: RwLock<Arc<Snapshot<P>>>,
}

impl<P: ConfiguredProvider + ?Sized> Default for AuthorityRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ConfiguredProvider + ?Sized> AuthorityRegistry<P> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Snapshot::empty())),
        }
    }

    /// Registers a provider instance, replacing any instance with the same
    /// provider id.
    pub fn register(&self, provider: Arc<P>) {
        let mut guard = self.snapshot.write();
        let mut next = guard.duplicate();

        Self::remove_from(&mut next, provider.provider_id());

        let key = (provider.authority(), provider.realm().to_string());
        next.by_id
            .insert(provider.provider_id().to_string(), Arc::clone(&provider));
        next.by_key.entry(key).or_default().push(provider);

        *guard = Arc::new(next);
    }

    /// Deregisters a provider instance by id.
    ///
    /// Returns true if the provider was registered.
    pub fn deregister(&self, provider_id: &str) -> bool {
        let mut guard = self.snapshot.write();
        if !guard.by_id.contains_key(provider_id) {
            return false;
        }

        let mut next = guard.duplicate();
        Self::remove_from(&mut next, provider_id);
        *guard = Arc::new(next);
        true
    }

    fn remove_from(snapshot: &mut Snapshot<P>, provider_id: &str) {
        if let Some(existing) = snapshot.by_id.remove(provider_id) {
            let key = (existing.authority(), existing.realm().to_string());
            if let Some(list) = snapshot.by_key.get_mut(&key) {
                list.retain(|p| p.provider_id() != provider_id);
                if list.is_empty() {
                    snapshot.by_key.remove(&key);
                }
            }
        }
    }

    /// Lists the authorities, in stable fan-out order.
    ///
    /// Every returned view is backed by the same snapshot, so iterating the
    /// result observes one consistent provider configuration even while
    /// registrations happen concurrently.
    #[must_use]
    pub fn authorities(&self) -> Vec<AuthorityView<P>> {
        let snapshot = Arc::clone(&self.snapshot.read());
        Authority::ALL
            .iter()
            .map(|&authority| AuthorityView {
                authority,
                snapshot: Arc::clone(&snapshot),
            })
            .collect()
    }

    /// Returns the providers of one authority enabled for a realm.
    #[must_use]
    pub fn providers(&self, authority: Authority, realm: &str) -> Vec<Arc<P>> {
        self.snapshot
            .read()
            .by_key
            .get(&(authority, realm.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Returns every provider enabled for a realm, across all authorities,
    /// in stable authority order.
    #[must_use]
    pub fn realm_providers(&self, realm: &str) -> Vec<Arc<P>> {
        let snapshot = self.snapshot.read();
        Authority::ALL
            .iter()
            .flat_map(|&authority| {
                snapshot
                    .by_key
                    .get(&(authority, realm.to_string()))
                    .into_iter()
                    .flatten()
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Looks up a provider instance by id.
    #[must_use]
    pub fn get(&self, provider_id: &str) -> Option<Arc<P>> {
        self.snapshot.read().by_id.get(provider_id).cloned()
    }

    /// Returns the number of registered provider instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot.read().by_id.len()
    }

    /// Returns true if no providers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshot.read().by_id.is_empty()
    }
}

impl<P: ConfiguredProvider + ?Sized> std::fmt::Debug for AuthorityRegistry<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorityRegistry")
            .field("providers", &self.len())
            .finish()
    }
}

/// A per-authority view over one registry snapshot.
pub struct AuthorityView<P: ?Sized> {
    authority: Authority,
    snapshot: Arc<Snapshot<P>>,
}

impl<P: ConfiguredProvider + ?Sized> AuthorityView<P> {
    /// The authority this view covers.
    #[must_use]
    pub const fn authority(&self) -> Authority {
        self.authority
    }

    /// The providers of this authority enabled for a realm.
    ///
    /// Empty for a realm with no configured providers of this authority.
    #[must_use]
    pub fn providers(&self, realm: &str) -> Vec<Arc<P>> {
        self.snapshot
            .by_key
            .get(&(self.authority, realm.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}

impl<P: ?Sized> std::fmt::Debug for AuthorityView<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorityView")
            .field("authority", &self.authority)
            .finish()
    }
}
