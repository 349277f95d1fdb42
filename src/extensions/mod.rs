//! WebSocket extension negotiation (RFC 6455 Section 9).
//!
//! Providers are registered once at startup into an immutable
//! [`ExtensionRegistry`]. For every handshake, a [`Negotiator`] turns the
//! peer's `Sec-WebSocket-Extensions` offers into an [`ActiveExtensionSet`].
//!
//! # Example
//!
//! ```rust
//! use wsext::extensions::{
//!     ExtensionRegistry, NegotiationContext, Negotiator, PerMessageDeflateProvider,
//!     ResourceAddress,
//! };
//!
//! let registry = ExtensionRegistry::builder()
//!     .register(PerMessageDeflateProvider::default())
//!     .build()?;
//! let negotiator = Negotiator::new(registry);
//!
//! let context = NegotiationContext::server(ResourceAddress::new("example.com", "/chat"));
//! let offers = ["x-unknown", "permessage-deflate; client_max_window_bits"];
//! let active = negotiator.negotiate_all(Some(&offers[..]), &context)?;
//!
//! assert_eq!(active.response_header(), "permessage-deflate");
//! # Ok::<(), wsext::Error>(())
//! ```

mod active;
#[cfg(feature = "compression")]
pub mod deflate;
mod header;
mod negotiator;
mod provider;
mod registry;

#[cfg(test)]
pub(crate) mod testing;

pub use active::ActiveExtensionSet;
#[cfg(feature = "compression")]
pub use deflate::{DeflateParams, NegotiatedDeflate, PerMessageDeflateProvider};
pub use header::{ExtensionHeader, ExtensionHeaderBuilder, ExtensionParam, split_header_value};
pub use negotiator::Negotiator;
pub use provider::{ExtensionProvider, NegotiatedExtension, NegotiationContext, ResourceAddress};
pub use registry::{ExtensionRegistry, RegistryBuilder};
