//! Configuration and limits for extension negotiation.

/// Limits applied to peer-supplied extension offers.
///
/// These limits bound the work a single handshake can cause before any
/// provider is consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of extension offers accepted in one handshake.
    ///
    /// Default: 32
    pub max_offers: usize,

    /// Maximum length in bytes of a single raw extension offer.
    ///
    /// Default: 256
    pub max_token_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_offers: 32,
            max_token_len: 256,
        }
    }
}

impl Limits {
    /// Create new limits with custom values.
    #[must_use]
    pub const fn new(max_offers: usize, max_token_len: usize) -> Self {
        Self {
            max_offers,
            max_token_len,
        }
    }

    /// Create limits for unrestricted use.
    ///
    /// Warning: Use only in trusted environments.
    #[must_use]
    pub const fn unrestricted() -> Self {
        Self {
            max_offers: usize::MAX,
            max_token_len: usize::MAX,
        }
    }

    /// Validate that the number of offers is within limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooManyExtensions`](crate::Error::TooManyExtensions) if `count` exceeds the configured maximum.
    pub const fn check_offer_count(&self, count: usize) -> Result<(), crate::Error> {
        if count > self.max_offers {
            Err(crate::Error::TooManyExtensions {
                count,
                max: self.max_offers,
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a raw offer is within the length limit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidExtensionToken`](crate::Error::InvalidExtensionToken) if `raw` is too long.
    pub fn check_token_len(&self, raw: &str) -> Result<(), crate::Error> {
        if raw.len() > self.max_token_len {
            Err(crate::Error::InvalidExtensionToken(format!(
                "offer is {} bytes (max: {})",
                raw.len(),
                self.max_token_len
            )))
        } else {
            Ok(())
        }
    }
}

/// How the registry treats two providers declaring the same name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DuplicatePolicy {
    /// Fail registry construction with
    /// [`Error::DuplicateProvider`](crate::Error::DuplicateProvider).
    #[default]
    Reject,
    /// The provider registered last replaces the earlier one.
    LastWins,
}

/// Negotiation configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Offer limits.
    pub limits: Limits,

    /// Duplicate provider handling at registry construction.
    ///
    /// Default: [`DuplicatePolicy::Reject`]
    pub duplicate_policy: DuplicatePolicy,
}

impl Config {
    /// Create a new configuration with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the duplicate provider policy.
    #[must_use]
    pub const fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}
