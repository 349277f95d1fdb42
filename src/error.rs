//! Error types for extension negotiation.
//!
//! Every variant here is fatal for the handshake that produced it. Declined
//! or unsupported extensions are not errors; they surface as `Ok(None)` or
//! as an absent entry in the negotiated set.

use thiserror::Error;

/// Result type alias for negotiation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a registry or negotiating extensions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A requested extension string could not be parsed.
    #[error("Invalid extension token: {0}")]
    InvalidExtensionToken(String),

    /// A provider rejected the peer's request as a protocol violation.
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    /// Two providers were registered under the same extension name.
    #[error("Duplicate extension provider: {0}")]
    DuplicateProvider(String),

    /// A provider was configured with invalid settings.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The peer offered more extensions than the configured limit.
    #[error("Too many extensions offered: {count} (max: {max})")]
    TooManyExtensions {
        /// Number of offered extensions.
        count: usize,
        /// Maximum allowed offers.
        max: usize,
    },
}

impl Error {
    /// Shorthand for [`Error::ProtocolViolation`], intended for provider
    /// implementations.
    pub fn protocol_violation(reason: impl Into<String>) -> Self {
        Error::ProtocolViolation(reason.into())
    }

    /// Shorthand for [`Error::InvalidExtensionToken`].
    pub fn invalid_token(reason: impl Into<String>) -> Self {
        Error::InvalidExtensionToken(reason.into())
    }
}
