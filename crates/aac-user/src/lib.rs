//! # aac-user
//!
//! Cross-realm user aggregation engine.
//!
//! Given a subject known to one realm, [`UserService`] materializes a
//! consistent [`aac_model::User`] view for another realm: it fans out to
//! every configured identity provider, merges attribute sets from every
//! attribute provider, resolves roles and groups, and applies the
//! realm-translation policy when the requesting realm differs from the
//! subject's home realm.
//!
//! Provider failures during fan-out are absorbed (fail-soft): a broken
//! upstream integration degrades the aggregate, it never makes the subject
//! unresolvable. Only subject-not-found, realm-not-found and explicit
//! provider lookups are fatal.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod roles;
pub mod service;
pub mod store;
pub mod translator;

pub use config::FanOutConfig;
pub use error::{UserError, UserResult};
pub use roles::{GroupService, RoleService};
pub use service::UserService;
pub use store::{RealmStore, SubjectStore};
pub use translator::{PolicyTranslator, TranslationPolicy, UserTranslator};
