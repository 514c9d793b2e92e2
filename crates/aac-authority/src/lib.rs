//! # aac-authority
//!
//! Provider SPI and authority registries for the AAC identity broker.
//!
//! An *authority* is a family of provider implementations (internal, OIDC,
//! SAML, Apple, SPID); a *provider* is one configured instance of an
//! authority for a realm. This crate defines the provider traits
//! ([`IdentityProvider`], [`AttributeProvider`]), the fail-soft
//! [`ProviderError`] type, and the snapshot-swapped registries that map
//! `(authority, realm)` to the currently enabled provider instances.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod error;
pub mod provider;
pub mod registry;

pub use aac_model::identity::Authority;
pub use error::{ProviderError, ProviderResult};
pub use provider::{AttributeProvider, ConfiguredProvider, IdentityProvider};
pub use registry::{
    AttributeAuthorityRegistry, AuthorityRegistry, AuthorityView, IdentityAuthorityRegistry,
};
