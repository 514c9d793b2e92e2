//! Provider error types.
//!
//! Provider failures are absorbed by the aggregation engine during fan-out
//! (fail-soft), so these errors describe the failure for logging rather
//! than for propagation to callers.

use thiserror::Error;

/// Errors raised by an individual identity or attribute provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider configuration is invalid or incomplete.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Connection to the external system failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// The external protocol exchange failed.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The provider call exceeded its time budget.
    #[error("operation timed out: {0}")]
    Timeout(String),

    /// The subject is unknown to this provider.
    ///
    /// Not an error condition for aggregation: it contributes an empty
    /// result just like any other absorbed failure.
    #[error("subject not registered: {0}")]
    NotRegistered(String),

    /// Internal provider error.
    #[error("internal provider error: {0}")]
    Internal(String),
}

impl ProviderError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Checks if this error is likely transient (connectivity or timeout).
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout(_))
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;
