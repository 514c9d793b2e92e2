//! The materialized `User` aggregate.
//!
//! A `User` is a per-request view of a subject from the perspective of one
//! realm. It is freshly built by the aggregation engine on every call and
//! never cached or shared across requests.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attributes::UserAttributes;
use crate::group::Group;
use crate::identity::UserIdentity;
use crate::role::RealmRole;
use crate::subject::Subject;

/// Account status of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Account is active and can authenticate.
    Active,
    /// Account exists but cannot authenticate.
    Inactive,
    /// Account is administratively locked.
    Locked,
    /// Account is blocked pending review.
    Blocked,
}

/// An authority granted to a user, optionally scoped to a realm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrantedAuthority {
    /// Realm scope, None for global authorities.
    pub realm: Option<String>,
    /// Authority name.
    pub role: String,
}

impl GrantedAuthority {
    /// The baseline authority every resolved user carries.
    pub const ROLE_USER: &'static str = "ROLE_USER";

    /// Creates a global authority.
    #[must_use]
    pub fn global(role: impl Into<String>) -> Self {
        Self {
            realm: None,
            role: role.into(),
        }
    }

    /// Creates a realm-scoped authority.
    #[must_use]
    pub fn realm(realm: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            realm: Some(realm.into()),
            role: role.into(),
        }
    }

    /// The baseline authenticated-user authority.
    #[must_use]
    pub fn user() -> Self {
        Self::global(Self::ROLE_USER)
    }
}

/// The user view materialized for a `(subject, realm)` pair.
///
/// `realm` is the requesting realm's perspective, not necessarily the
/// subject's home realm. A cross-realm view has always passed through the
/// translator before realm-scoped data is layered on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Subject this view describes.
    pub subject_id: Uuid,
    /// Realm perspective of this view.
    pub realm: String,

    /// Username, possibly redacted cross-realm.
    pub username: String,
    /// Email, possibly redacted cross-realm.
    pub email: Option<String>,
    /// Whether the email has been verified.
    pub email_verified: bool,
    /// Account status.
    pub status: UserStatus,

    /// When the subject was created.
    pub create_date: DateTime<Utc>,
    /// When the subject record was last modified.
    pub modified_date: DateTime<Utc>,
    /// Account expiration, if set.
    pub expiration_date: Option<DateTime<Utc>>,
    /// Last successful login time.
    pub login_date: Option<DateTime<Utc>>,
    /// IP address of the last login.
    pub login_ip: Option<String>,
    /// Provider id used for the last login.
    pub login_provider: Option<String>,

    /// Provider-asserted identities, unique by registration uuid.
    pub identities: Vec<UserIdentity>,
    /// Provider-scoped attribute sets, unique by provider and set id.
    pub attributes: Vec<UserAttributes>,
    /// Groups the subject directly belongs to in the view realm.
    pub groups: HashSet<Group>,
    /// Realm roles, direct and group-inherited.
    pub realm_roles: HashSet<RealmRole>,
    /// Granted authorities; always contains the baseline user authority
    /// on a resolved aggregate.
    pub authorities: HashSet<GrantedAuthority>,
}

impl User {
    /// Creates an empty user shell for a subject viewed from a realm.
    #[must_use]
    pub fn new(subject_id: Uuid, realm: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            subject_id,
            realm: realm.into(),
            username: String::new(),
            email: None,
            email_verified: false,
            status: UserStatus::Active,
            create_date: now,
            modified_date: now,
            expiration_date: None,
            login_date: None,
            login_ip: None,
            login_provider: None,
            identities: Vec::new(),
            attributes: Vec::new(),
            groups: HashSet::new(),
            realm_roles: HashSet::new(),
            authorities: HashSet::new(),
        }
    }

    /// Builds the base shell from a subject's stored record, viewed from
    /// the given realm.
    ///
    /// Copies the identity-independent fields (profile, status, audit
    /// timestamps); identities, attributes, groups and roles are layered on
    /// by the aggregation engine.
    #[must_use]
    pub fn from_subject(subject: &Subject, realm: impl Into<String>) -> Self {
        let mut user = Self::new(subject.id, realm);
        user.username = subject.username.clone();
        user.email = subject.email.clone();
        user.email_verified = subject.email_verified;
        user.status = subject.status;
        user.create_date = subject.create_date;
        user.modified_date = subject.modified_date;
        user.expiration_date = subject.expiration_date;
        user.login_date = subject.login_date;
        user.login_ip = subject.login_ip.clone();
        user.login_provider = subject.login_provider.clone();
        user
    }

    /// Adds an identity, ignoring duplicates of the same registration.
    pub fn add_identity(&mut self, identity: UserIdentity) {
        if !self.identities.iter().any(|i| i.uuid() == identity.uuid()) {
            self.identities.push(identity);
        }
    }

    /// Adds an attribute set, replacing a previous set with the same
    /// provider and identifier.
    pub fn add_attributes(&mut self, attributes: UserAttributes) {
        let id = attributes.attributes_id();
        self.attributes.retain(|a| a.attributes_id() != id);
        self.attributes.push(attributes);
    }

    /// Finds an identity by provider instance id.
    #[must_use]
    pub fn identity_for_provider(&self, provider: &str) -> Option<&UserIdentity> {
        self.identities.iter().find(|i| i.provider() == provider)
    }

    /// Checks whether the aggregate carries a given realm role.
    #[must_use]
    pub fn has_realm_role(&self, realm: &str, role: &str) -> bool {
        self.realm_roles
            .contains(&RealmRole::new(realm, role))
    }

    /// Checks whether the aggregate carries a given authority.
    #[must_use]
    pub fn has_authority(&self, authority: &GrantedAuthority) -> bool {
        self.authorities.contains(authority)
    }
}
