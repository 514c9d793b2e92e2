//! Subject domain model.
//!
//! A subject is the realm-homed anchor for an identity. It is created on
//! first registration through any identity provider and keeps the same
//! home realm for its whole lifetime; it is not itself an authentication
//! method.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::UserStatus;

/// The kind of entity a subject anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectType {
    /// A human user.
    User,
    /// An OAuth2/OIDC client.
    Client,
    /// A group acting as a role-assignment target.
    Group,
}

/// A realm-scoped unique identity anchor.
///
/// The home realm is set at creation and never changes; providers link
/// identities to the subject by id, they never own it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    /// Globally unique, immutable identifier.
    pub id: Uuid,
    /// Home realm slug, immutable after creation.
    pub realm: String,
    /// What kind of entity this subject anchors.
    pub subject_type: SubjectType,

    /// Username within the home realm.
    pub username: String,
    /// Email address, if registered.
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
}

impl Subject {
    /// Creates a new user subject homed in the given realm.
    #[must_use]
    pub fn new(realm: impl Into<String>, username: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            realm: realm.into(),
            subject_type: SubjectType::User,
            username: username.into(),
            email: None,
            email_verified: false,
            status: UserStatus::Active,
            create_date: now,
            modified_date: now,
            expiration_date: None,
            login_date: None,
            login_ip: None,
            login_provider: None,
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the account status.
    #[must_use]
    pub const fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the subject type.
    #[must_use]
    pub const fn with_type(mut self, subject_type: SubjectType) -> Self {
        self.subject_type = subject_type;
        self
    }

    /// Records a successful login.
    pub fn record_login(&mut self, provider: impl Into<String>, ip: Option<String>) {
        self.login_date = Some(Utc::now());
        self.login_provider = Some(provider.into());
        self.login_ip = ip;
    }

    /// Checks whether the subject is homed in the given realm.
    #[must_use]
    pub fn is_homed_in(&self, realm: &str) -> bool {
        self.realm == realm
    }
}
