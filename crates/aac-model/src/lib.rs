//! # aac-model
//!
//! Domain models for the AAC identity broker.
//!
//! This crate defines the realm-scoped identity model shared across the
//! workspace: the [`Subject`] anchor, provider-asserted [`UserIdentity`]
//! variants, provider-scoped [`UserAttributes`] bags, realm roles and
//! groups, and the materialized [`User`] aggregate.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod attributes;
pub mod group;
pub mod identity;
pub mod realm;
pub mod role;
pub mod subject;
pub mod user;

pub use attributes::{AttributeSet, UserAttributes, UserAuthenticatedPrincipal};
pub use group::Group;
pub use identity::{UserAccount, UserIdentity};
pub use realm::Realm;
pub use role::RealmRole;
pub use subject::{Subject, SubjectType};
pub use user::{GrantedAuthority, User, UserStatus};
