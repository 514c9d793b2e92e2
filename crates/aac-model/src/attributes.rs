//! Attribute sets and authenticated principals.
//!
//! Attribute providers map provider-specific claims into named, normalized
//! [`AttributeSet`]s. Multiple sets may coexist per subject, one per
//! provider and set identifier; within one provider's response set
//! identifiers are unique.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::Authority;

/// A named bag of normalized claims.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AttributeSet {
    /// Set identifier, unique within a provider's response.
    pub identifier: String,
    /// Human-readable set name.
    pub name: Option<String>,
    /// Attribute key to values.
    pub attributes: HashMap<String, Vec<String>>,
}

impl AttributeSet {
    /// Creates a new empty set with the given identifier.
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: None,
            attributes: HashMap::new(),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a single-valued attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), vec![value.into()]);
        self
    }

    /// Adds a multi-valued attribute.
    #[must_use]
    pub fn with_values(mut self, key: impl Into<String>, values: Vec<String>) -> Self {
        self.attributes.insert(key.into(), values);
        self
    }

    /// Gets the first value of an attribute.
    #[must_use]
    pub fn first_value(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// Returns true if the set carries no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// A provider-scoped attribute set bound to a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAttributes {
    /// Authority family of the producing provider.
    pub authority: Authority,
    /// Configured provider instance id.
    pub provider: String,
    /// Realm the provider is configured for.
    pub realm: String,
    /// Subject these attributes belong to.
    pub subject_id: Uuid,
    /// The attribute set payload.
    pub set: AttributeSet,
}

impl UserAttributes {
    /// Creates provider-scoped attributes for a subject.
    #[must_use]
    pub fn new(
        authority: Authority,
        provider: impl Into<String>,
        realm: impl Into<String>,
        subject_id: Uuid,
        set: AttributeSet,
    ) -> Self {
        Self {
            authority,
            provider: provider.into(),
            realm: realm.into(),
            subject_id,
            set,
        }
    }

    /// Set identifier within the producing provider.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.set.identifier
    }

    /// Globally unique key: provider id plus set identifier.
    ///
    /// Providers are disjoint, so this is the merge key used by the
    /// aggregation engine.
    #[must_use]
    pub fn attributes_id(&self) -> String {
        format!("{}:{}", self.provider, self.set.identifier)
    }
}

/// The authenticated principal as asserted by a provider at login time.
///
/// Carries the raw provider claims before conversion into normalized
/// attribute sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAuthenticatedPrincipal {
    /// Authority family of the asserting provider.
    pub authority: Authority,
    /// Configured provider instance id.
    pub provider: String,
    /// Realm the login happened in.
    pub realm: String,
    /// Principal name as asserted by the provider.
    pub name: String,
    /// Raw provider claims.
    pub attributes: HashMap<String, Vec<String>>,
}

impl UserAuthenticatedPrincipal {
    /// Creates a new principal.
    #[must_use]
    pub fn new(
        authority: Authority,
        provider: impl Into<String>,
        realm: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            authority,
            provider: provider.into(),
            realm: realm.into(),
            name: name.into(),
            attributes: HashMap::new(),
        }
    }

    /// Adds a raw claim.
    #[must_use]
    pub fn with_claim(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.attributes.insert(name.into(), values);
        self
    }
}
