//! Extension provider contract.
//!
//! A provider implements the handshake side of exactly one extension. The
//! negotiator only ever calls [`ExtensionProvider::negotiate`]; what the
//! extension does with frames afterwards is up to the transport.

use crate::error::Result;
use crate::extensions::header::{ExtensionHeader, ExtensionParam};
use crate::role::Role;
use std::fmt;

/// Outcome of a successful provider negotiation.
///
/// Ownership passes to the caller, which applies it to the connection.
pub trait NegotiatedExtension: fmt::Debug + Send + Sync {
    /// Token of the extension this result belongs to.
    fn token(&self) -> &str;

    /// Parameters to echo back to the peer for this extension.
    ///
    /// Default returns empty (accepted with no parameters).
    fn response_params(&self) -> Vec<ExtensionParam> {
        Vec::new()
    }
}

/// Handshake-time capability for a single extension token.
///
/// # Thread Safety
///
/// Providers are shared by every connection and may be called concurrently,
/// so `negotiate` takes `&self` and implementations must be `Send + Sync`.
///
/// # Example Implementation
///
/// ```rust
/// use wsext::extensions::{ExtensionHeader, ExtensionProvider, NegotiatedExtension, NegotiationContext};
///
/// #[derive(Debug)]
/// struct Accepted;
///
/// impl NegotiatedExtension for Accepted {
///     fn token(&self) -> &str { "x-noop" }
/// }
///
/// struct NoOpProvider;
///
/// impl ExtensionProvider for NoOpProvider {
///     fn name(&self) -> &str { "x-noop" }
///
///     fn negotiate(
///         &self,
///         _candidate: &ExtensionHeader,
///         _context: &NegotiationContext,
///     ) -> wsext::Result<Option<Box<dyn NegotiatedExtension>>> {
///         Ok(Some(Box::new(Accepted)))
///     }
/// }
/// ```
pub trait ExtensionProvider: Send + Sync {
    /// The extension token this provider handles.
    ///
    /// Must be a valid HTTP token and is matched case-sensitively.
    fn name(&self) -> &str;

    /// Decide whether to accept the peer's request for this extension.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(_))` - Extension accepted
    /// * `Ok(None)` - Extension declined (e.g. unsupported parameter combination)
    ///
    /// # Errors
    ///
    /// Returns [`Error::ProtocolViolation`](crate::Error::ProtocolViolation)
    /// when the request breaks the extension's rules. This fails the whole
    /// handshake.
    fn negotiate(
        &self,
        candidate: &ExtensionHeader,
        context: &NegotiationContext,
    ) -> Result<Option<Box<dyn NegotiatedExtension>>>;
}

/// Address of the resource the handshake targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceAddress {
    /// Host header value.
    pub host: String,
    /// Request path (e.g., "/chat").
    pub path: String,
    /// Whether the connection is `wss://`.
    pub secure: bool,
    /// Origin header value, if any.
    pub origin: Option<String>,
}

impl ResourceAddress {
    /// Create an address from host and path.
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            secure: false,
            origin: None,
        }
    }

    /// Mark the address as secure.
    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set the origin.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

impl fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = if self.secure { "wss" } else { "ws" };
        write!(f, "{}://{}{}", scheme, self.host, self.path)
    }
}

/// Per-handshake data handed to providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiationContext {
    /// Resource the handshake targets.
    pub address: ResourceAddress,
    /// Role of the side performing negotiation.
    pub role: Role,
}

impl NegotiationContext {
    /// Create a context.
    pub fn new(address: ResourceAddress, role: Role) -> Self {
        Self { address, role }
    }

    /// Context for the accepting side.
    pub fn server(address: ResourceAddress) -> Self {
        Self::new(address, Role::Server)
    }

    /// Context for the initiating side.
    pub fn client(address: ResourceAddress) -> Self {
        Self::new(address, Role::Client)
    }
}
