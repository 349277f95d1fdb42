//! Per-handshake extension negotiation.
//!
//! The negotiator is stateless between calls. Each call parses the peer's
//! offers, keeps the supported ones in the peer's order, and asks each
//! matching provider whether it accepts. Any parse failure or provider
//! error aborts the whole call.

use crate::config::{Config, Limits};
use crate::error::Result;
use crate::extensions::active::ActiveExtensionSet;
use crate::extensions::header::{ExtensionHeader, split_header_value};
use crate::extensions::provider::{NegotiatedExtension, NegotiationContext};
use crate::extensions::registry::ExtensionRegistry;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Negotiates requested extensions against a shared registry.
///
/// Cheap to clone; clones share the same registry.
#[derive(Debug, Clone)]
pub struct Negotiator {
    registry: Arc<ExtensionRegistry>,
    limits: Limits,
}

impl Negotiator {
    /// Create a negotiator with default limits.
    pub fn new(registry: ExtensionRegistry) -> Self {
        Self::from_shared(Arc::new(registry))
    }

    /// Create a negotiator over an already shared registry.
    pub fn from_shared(registry: Arc<ExtensionRegistry>) -> Self {
        Self {
            registry,
            limits: Limits::default(),
        }
    }

    /// Use the limits from `config`.
    #[must_use]
    pub fn with_config(mut self, config: &Config) -> Self {
        self.limits = config.limits.clone();
        self
    }

    /// The registry this negotiator consults.
    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    /// Negotiate a single candidate.
    ///
    /// Returns `Ok(None)` if the token is not registered or the provider
    /// declines.
    ///
    /// # Errors
    ///
    /// Propagates the provider's error unmodified.
    pub fn negotiate(
        &self,
        candidate: &ExtensionHeader,
        context: &NegotiationContext,
    ) -> Result<Option<Box<dyn NegotiatedExtension>>> {
        match self.registry.lookup(candidate.token()) {
            Some(provider) => provider.negotiate(candidate, context),
            None => Ok(None),
        }
    }

    /// Negotiate the peer's full list of requested extensions.
    ///
    /// `raw_offers` holds one entry per requested extension, already split
    /// on commas. `None` or an empty list yields the empty set without
    /// consulting any provider.
    ///
    /// # Errors
    ///
    /// - [`Error::TooManyExtensions`](crate::Error::TooManyExtensions) if the offer count exceeds limits.
    /// - [`Error::InvalidExtensionToken`](crate::Error::InvalidExtensionToken) if any offer fails to parse.
    /// - Any error returned by a provider.
    pub fn negotiate_all<S>(
        &self,
        raw_offers: Option<&[S]>,
        context: &NegotiationContext,
    ) -> Result<ActiveExtensionSet>
    where
        S: AsRef<str>,
    {
        let raw_offers = match raw_offers {
            Some(offers) if !offers.is_empty() => offers,
            _ => return Ok(ActiveExtensionSet::empty()),
        };

        let candidates = self.parse_offers(raw_offers).inspect_err(|err| {
            warn!(address = %context.address, error = %err, "rejecting extension offers");
        })?;

        let mut accepted = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !self.registry.contains(candidate.token()) {
                trace!(extension = candidate.token(), "dropping unsupported extension");
                continue;
            }

            match self.negotiate(&candidate, context) {
                Ok(Some(negotiated)) => accepted.push((candidate, negotiated)),
                Ok(None) => {
                    debug!(extension = candidate.token(), "extension declined by provider");
                }
                Err(err) => {
                    warn!(
                        extension = candidate.token(),
                        address = %context.address,
                        error = %err,
                        "extension negotiation failed"
                    );
                    return Err(err);
                }
            }
        }

        debug!(
            accepted = accepted.len(),
            offered = raw_offers.len(),
            role = %context.role,
            initiator = context.role.is_initiator(),
            peer = %context.role.peer(),
            "extension negotiation complete"
        );
        Ok(ActiveExtensionSet::new(accepted, context.role))
    }

    /// Negotiate from a raw `Sec-WebSocket-Extensions` header value.
    ///
    /// # Errors
    ///
    /// See [`negotiate_all`](Self::negotiate_all).
    pub fn negotiate_header(
        &self,
        header_value: Option<&str>,
        context: &NegotiationContext,
    ) -> Result<ActiveExtensionSet> {
        let offers = header_value.map(split_header_value).unwrap_or_default();
        self.negotiate_all(Some(offers.as_slice()), context)
    }

    /// Parse every offer, failing on the first invalid one.
    ///
    /// # Errors
    ///
    /// - [`Error::TooManyExtensions`](crate::Error::TooManyExtensions) if there are too many offers.
    /// - [`Error::InvalidExtensionToken`](crate::Error::InvalidExtensionToken) for an oversized or malformed offer.
    pub fn parse_offers<S>(&self, raw_offers: &[S]) -> Result<Vec<ExtensionHeader>>
    where
        S: AsRef<str>,
    {
        self.limits.check_offer_count(raw_offers.len())?;
        raw_offers
            .iter()
            .map(|raw| {
                let raw = raw.as_ref();
                self.limits.check_token_len(raw)?;
                ExtensionHeader::parse(raw)
            })
            .collect()
    }
}
