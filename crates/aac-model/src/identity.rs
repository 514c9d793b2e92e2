//! Provider-asserted identity model.
//!
//! Each identity provider that has registered a subject asserts one
//! [`UserIdentity`] for it. The variant set is closed and dispatched through
//! an internally-tagged sum type, so serialization carries an explicit
//! `authority` discriminator and matches stay exhaustiveness-checked.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A family of identity/attribute provider implementations.
///
/// Iteration over [`Authority::ALL`] follows declaration order, which is the
/// stable fan-out order used by the registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Authority {
    /// Internal DB-backed accounts (password, webauthn).
    Internal,
    /// Upstream OpenID Connect providers.
    Oidc,
    /// Upstream SAML2 providers.
    Saml,
    /// Sign in with Apple.
    Apple,
    /// SPID (Italian public digital identity).
    Spid,
}

impl Authority {
    /// All authorities, in stable fan-out order.
    pub const ALL: [Self; 5] = [
        Self::Internal,
        Self::Oidc,
        Self::Saml,
        Self::Apple,
        Self::Spid,
    ];

    /// Returns the wire identifier for this authority.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Oidc => "oidc",
            Self::Saml => "saml",
            Self::Apple => "apple",
            Self::Spid => "spid",
        }
    }
}

impl std::fmt::Display for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common capability surface of per-authority account payloads.
pub trait UserAccount {
    /// The username asserted by the provider.
    fn username(&self) -> &str;

    /// The email asserted by the provider, if any.
    fn email_address(&self) -> Option<&str> {
        None
    }
}

/// An internal DB-backed account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalAccount {
    /// Username within the realm.
    pub username: String,
    /// Registered email.
    pub email: Option<String>,
    /// Whether the registration was confirmed.
    pub confirmed: bool,
}

impl UserAccount for InternalAccount {
    fn username(&self) -> &str {
        &self.username
    }

    fn email_address(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// An account asserted by an upstream OIDC provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OidcAccount {
    /// Issuer URL of the upstream provider.
    pub issuer: String,
    /// Subject claim at the upstream provider.
    pub subject: String,
    /// Preferred username claim, falling back to the subject.
    pub username: String,
    /// Email claim.
    pub email: Option<String>,
}

impl UserAccount for OidcAccount {
    fn username(&self) -> &str {
        &self.username
    }

    fn email_address(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// An account asserted by an upstream SAML2 identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamlAccount {
    /// EntityID of the asserting IdP.
    pub idp_entity_id: String,
    /// NameID of the subject at the IdP.
    pub name_id: String,
    /// Username attribute, falling back to the NameID.
    pub username: String,
    /// Email attribute.
    pub email: Option<String>,
}

impl UserAccount for SamlAccount {
    fn username(&self) -> &str {
        &self.username
    }

    fn email_address(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// An account asserted by Sign in with Apple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppleAccount {
    /// Apple subject identifier.
    pub subject: String,
    /// Username derived from the Apple profile.
    pub username: String,
    /// Email, possibly a private relay address.
    pub email: Option<String>,
    /// Whether the email is an Apple private relay address.
    pub private_email: bool,
}

impl UserAccount for AppleAccount {
    fn username(&self) -> &str {
        &self.username
    }

    fn email_address(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// An account asserted by a SPID identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpidAccount {
    /// EntityID of the asserting SPID IdP.
    pub idp_entity_id: String,
    /// SPID code of the subject.
    pub spid_code: String,
    /// Username derived from the SPID attributes.
    pub username: String,
    /// Fiscal number attribute.
    pub fiscal_number: Option<String>,
    /// Email attribute.
    pub email: Option<String>,
}

impl UserAccount for SpidAccount {
    fn username(&self) -> &str {
        &self.username
    }

    fn email_address(&self) -> Option<&str> {
        self.email.as_deref()
    }
}

/// Provider-scoped envelope shared by every identity variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity<A> {
    /// Configured provider instance that asserted this identity.
    pub provider: String,
    /// Realm the provider is configured for.
    pub realm: String,
    /// Back-reference to the owning subject.
    pub subject_id: Uuid,
    /// Resource identifier of this identity registration.
    pub uuid: Uuid,
    /// Authority-specific account payload.
    pub account: A,
    /// Principal attributes captured at registration/login.
    #[serde(default)]
    pub attributes: HashMap<String, Vec<String>>,
}

impl<A> Identity<A> {
    /// Creates a new identity envelope for a subject.
    #[must_use]
    pub fn new(
        provider: impl Into<String>,
        realm: impl Into<String>,
        subject_id: Uuid,
        account: A,
    ) -> Self {
        Self {
            provider: provider.into(),
            realm: realm.into(),
            subject_id,
            uuid: Uuid::now_v7(),
            account,
            attributes: HashMap::new(),
        }
    }

    /// Sets a principal attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, values: Vec<String>) -> Self {
        self.attributes.insert(name.into(), values);
        self
    }
}

/// One provider-asserted external identity linked to a subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "authority", rename_all = "lowercase")]
pub enum UserIdentity {
    /// Internal DB-backed identity.
    Internal(Identity<InternalAccount>),
    /// Upstream OIDC identity.
    Oidc(Identity<OidcAccount>),
    /// Upstream SAML identity.
    Saml(Identity<SamlAccount>),
    /// Sign in with Apple identity.
    Apple(Identity<AppleAccount>),
    /// SPID identity.
    Spid(Identity<SpidAccount>),
}

impl UserIdentity {
    /// The authority family that asserted this identity.
    #[must_use]
    pub const fn authority(&self) -> Authority {
        match self {
            Self::Internal(_) => Authority::Internal,
            Self::Oidc(_) => Authority::Oidc,
            Self::Saml(_) => Authority::Saml,
            Self::Apple(_) => Authority::Apple,
            Self::Spid(_) => Authority::Spid,
        }
    }

    /// The configured provider instance id.
    #[must_use]
    pub fn provider(&self) -> &str {
        match self {
            Self::Internal(i) => &i.provider,
            Self::Oidc(i) => &i.provider,
            Self::Saml(i) => &i.provider,
            Self::Apple(i) => &i.provider,
            Self::Spid(i) => &i.provider,
        }
    }

    /// The realm the asserting provider is configured for.
    #[must_use]
    pub fn realm(&self) -> &str {
        match self {
            Self::Internal(i) => &i.realm,
            Self::Oidc(i) => &i.realm,
            Self::Saml(i) => &i.realm,
            Self::Apple(i) => &i.realm,
            Self::Spid(i) => &i.realm,
        }
    }

    /// Back-reference to the owning subject.
    #[must_use]
    pub const fn subject_id(&self) -> Uuid {
        match self {
            Self::Internal(i) => i.subject_id,
            Self::Oidc(i) => i.subject_id,
            Self::Saml(i) => i.subject_id,
            Self::Apple(i) => i.subject_id,
            Self::Spid(i) => i.subject_id,
        }
    }

    /// Resource identifier of this identity registration.
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        match self {
            Self::Internal(i) => i.uuid,
            Self::Oidc(i) => i.uuid,
            Self::Saml(i) => i.uuid,
            Self::Apple(i) => i.uuid,
            Self::Spid(i) => i.uuid,
        }
    }

    /// The account payload, through its common capability surface.
    #[must_use]
    pub fn account(&self) -> &dyn UserAccount {
        match self {
            Self::Internal(i) => &i.account,
            Self::Oidc(i) => &i.account,
            Self::Saml(i) => &i.account,
            Self::Apple(i) => &i.account,
            Self::Spid(i) => &i.account,
        }
    }

    /// Principal attributes captured with this identity.
    #[must_use]
    pub fn attributes(&self) -> &HashMap<String, Vec<String>> {
        match self {
            Self::Internal(i) => &i.attributes,
            Self::Oidc(i) => &i.attributes,
            Self::Saml(i) => &i.attributes,
            Self::Apple(i) => &i.attributes,
            Self::Spid(i) => &i.attributes,
        }
    }
}
