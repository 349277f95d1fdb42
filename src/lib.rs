//! # wsext - WebSocket extension negotiation
//!
//! `wsext` decides which `Sec-WebSocket-Extensions` offers become active for
//! a connection during the upgrade handshake.
//!
//! ## Features
//!
//! - **Explicit provider registration** into an immutable, shareable registry
//! - **Peer-order preserving** negotiation with silent declines
//! - **All-or-nothing** failure on malformed offers or protocol violations
//! - **permessage-deflate** parameter negotiation (feature `compression`)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wsext::{ExtensionRegistry, Negotiator, NegotiationContext, ResourceAddress};
//!
//! let registry = ExtensionRegistry::builder()
//!     .register(MyProvider::new())
//!     .build()?;
//! let negotiator = Negotiator::new(registry);
//!
//! let context = NegotiationContext::server(ResourceAddress::new(host, path));
//! let active = negotiator.negotiate_all(Some(&request.extensions[..]), &context)?;
//! ```

pub mod config;
pub mod error;
pub mod extensions;
pub mod role;

pub use config::{Config, DuplicatePolicy, Limits};
pub use error::{Error, Result};
pub use extensions::{
    ActiveExtensionSet, ExtensionHeader, ExtensionHeaderBuilder, ExtensionParam,
    ExtensionProvider, ExtensionRegistry, NegotiatedExtension, NegotiationContext, Negotiator,
    RegistryBuilder, ResourceAddress,
};
pub use role::Role;
