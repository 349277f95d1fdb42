//! Result of one negotiation round.

use crate::extensions::header::ExtensionHeader;
use crate::extensions::provider::NegotiatedExtension;
use crate::role::Role;
use std::fmt;

/// Extensions accepted for one connection, in the peer's preference order.
///
/// Each accepted header is paired with the provider's negotiated result at
/// the same index.
pub struct ActiveExtensionSet {
    extensions: Vec<ExtensionHeader>,
    negotiated: Vec<Box<dyn NegotiatedExtension>>,
    role: Role,
}

impl ActiveExtensionSet {
    /// The empty set. The role of an empty set carries no meaning.
    pub fn empty() -> Self {
        Self {
            extensions: Vec::new(),
            negotiated: Vec::new(),
            role: Role::Client,
        }
    }

    pub(crate) fn new(
        accepted: Vec<(ExtensionHeader, Box<dyn NegotiatedExtension>)>,
        role: Role,
    ) -> Self {
        let (extensions, negotiated): (Vec<_>, Vec<_>) = accepted.into_iter().unzip();
        Self {
            extensions,
            negotiated,
            role,
        }
    }

    /// Role of the side that produced this set.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Accepted headers, as requested by the peer.
    pub fn headers(&self) -> &[ExtensionHeader] {
        &self.extensions
    }

    /// Negotiated results, index-aligned with [`headers`](Self::headers).
    pub fn negotiated(&self) -> &[Box<dyn NegotiatedExtension>] {
        &self.negotiated
    }

    /// Iterate accepted headers with their negotiated results.
    pub fn iter(&self) -> impl Iterator<Item = (&ExtensionHeader, &dyn NegotiatedExtension)> {
        self.extensions
            .iter()
            .zip(self.negotiated.iter().map(|n| n.as_ref()))
    }

    /// Take ownership of the negotiated results.
    pub fn into_negotiated(self) -> Vec<Box<dyn NegotiatedExtension>> {
        self.negotiated
    }

    /// Get the number of active extensions.
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Check if no extension is active.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Check if `token` is active.
    pub fn contains(&self, token: &str) -> bool {
        self.extensions.iter().any(|h| h.token() == token)
    }

    /// Format the agreed extensions as a `Sec-WebSocket-Extensions` response value.
    ///
    /// Each entry is the negotiated token followed by the parameters the
    /// provider agreed to, not the ones the peer offered.
    pub fn response_header(&self) -> String {
        self.negotiated
            .iter()
            .map(|n| {
                let mut entry = n.token().to_string();
                for param in n.response_params() {
                    entry.push_str("; ");
                    entry.push_str(&param.to_string());
                }
                entry
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Format the accepted offers exactly as the peer requested them.
    pub fn requested_header(&self) -> String {
        self.extensions
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for ActiveExtensionSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for ActiveExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.response_header())
    }
}

impl fmt::Debug for ActiveExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveExtensionSet")
            .field(
                "extensions",
                &self.extensions.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            )
            .field("role", &self.role)
            .finish()
    }
}
