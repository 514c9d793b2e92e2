//! Error taxonomy for user aggregation.
//!
//! Only three classes exist: fatal lookups (subject, realm, explicit
//! provider), policy violations (realm mismatch, cross-realm without a
//! translator), and absorbed provider failures. The last class never
//! appears here: fan-out failures are logged and contribute empty results,
//! they do not cross the aggregation boundary.

use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the user aggregation engine.
#[derive(Debug, Error)]
pub enum UserError {
    /// The subject does not exist. Fatal, never retried.
    #[error("no such user: {0}")]
    NoSuchUser(Uuid),

    /// A realm passed by the caller does not exist. Fatal.
    #[error("no such realm: {0}")]
    NoSuchRealm(String),

    /// An explicit provider lookup by id failed. Fatal.
    #[error("no such provider: {0}")]
    NoSuchProvider(String),

    /// The invocation realm does not match the entity's realm.
    ///
    /// A caller/programming error, never a transient condition.
    #[error("realm mismatch: expected {expected}, got {actual}")]
    RealmMismatch {
        /// The entity's actual realm.
        expected: String,
        /// The realm the caller passed.
        actual: String,
    },

    /// A cross-realm view was requested but no translator is configured.
    ///
    /// Cross-realm identity views are opt-in via explicit translator
    /// policy; without one the resolve fails closed instead of leaking a
    /// same-realm-complete view.
    #[error("cross-realm access denied: no translator configured for realm {0}")]
    CrossRealmDenied(String),

    /// Internal storage error from the subject/realm stores.
    #[error("storage error: {0}")]
    Storage(String),
}

impl UserError {
    /// Creates a realm mismatch error.
    #[must_use]
    pub fn realm_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::RealmMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Creates a storage error.
    #[must_use]
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Checks if this is a not-found class error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NoSuchUser(_) | Self::NoSuchRealm(_) | Self::NoSuchProvider(_)
        )
    }

    /// Checks if this is a policy violation (caller error).
    #[must_use]
    pub const fn is_policy_violation(&self) -> bool {
        matches!(self, Self::RealmMismatch { .. } | Self::CrossRealmDenied(_))
    }
}

/// Result type for user aggregation operations.
pub type UserResult<T> = Result<T, UserError>;
