//! Permessage-deflate parameter negotiation (RFC 7692).
//!
//! Only the handshake half lives here: the provider validates the peer's
//! offer and agrees on window sizes and context takeover. Compressing
//! frames is left to the transport.

use crate::error::{Error, Result};
use crate::extensions::header::{ExtensionHeader, ExtensionParam};
use crate::extensions::provider::{ExtensionProvider, NegotiatedExtension, NegotiationContext};
use tracing::debug;

/// Registered extension token.
pub const PERMESSAGE_DEFLATE: &str = "permessage-deflate";

const MIN_WINDOW_BITS: u8 = 8;
const MAX_WINDOW_BITS: u8 = 15;

const SERVER_NO_CONTEXT_TAKEOVER: &str = "server_no_context_takeover";
const CLIENT_NO_CONTEXT_TAKEOVER: &str = "client_no_context_takeover";
const SERVER_MAX_WINDOW_BITS: &str = "server_max_window_bits";
const CLIENT_MAX_WINDOW_BITS: &str = "client_max_window_bits";

/// Deflate settings, either the local limits or the agreed result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeflateParams {
    pub server_no_context_takeover: bool,
    pub client_no_context_takeover: bool,
    pub server_max_window_bits: u8,
    pub client_max_window_bits: u8,
}

impl Default for DeflateParams {
    fn default() -> Self {
        Self {
            server_no_context_takeover: false,
            client_no_context_takeover: false,
            server_max_window_bits: MAX_WINDOW_BITS,
            client_max_window_bits: MAX_WINDOW_BITS,
        }
    }
}

impl DeflateParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn server_no_context_takeover(mut self, value: bool) -> Self {
        self.server_no_context_takeover = value;
        self
    }

    pub fn client_no_context_takeover(mut self, value: bool) -> Self {
        self.client_no_context_takeover = value;
        self
    }

    pub fn server_max_window_bits(mut self, bits: u8) -> Result<Self> {
        if !(MIN_WINDOW_BITS..=MAX_WINDOW_BITS).contains(&bits) {
            return Err(Error::InvalidConfig(format!(
                "server_max_window_bits must be {}-{}, got {}",
                MIN_WINDOW_BITS, MAX_WINDOW_BITS, bits
            )));
        }
        self.server_max_window_bits = bits;
        Ok(self)
    }

    pub fn client_max_window_bits(mut self, bits: u8) -> Result<Self> {
        if !(MIN_WINDOW_BITS..=MAX_WINDOW_BITS).contains(&bits) {
            return Err(Error::InvalidConfig(format!(
                "client_max_window_bits must be {}-{}, got {}",
                MIN_WINDOW_BITS, MAX_WINDOW_BITS, bits
            )));
        }
        self.client_max_window_bits = bits;
        Ok(self)
    }
}

/// Accepted permessage-deflate configuration for one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiatedDeflate {
    params: DeflateParams,
    /// Whether the response must carry `client_max_window_bits`.
    announce_client_window: bool,
}

impl NegotiatedDeflate {
    /// The agreed parameters.
    pub fn params(&self) -> &DeflateParams {
        &self.params
    }
}

impl NegotiatedExtension for NegotiatedDeflate {
    fn token(&self) -> &str {
        PERMESSAGE_DEFLATE
    }

    fn response_params(&self) -> Vec<ExtensionParam> {
        let mut params = Vec::new();

        if self.params.server_no_context_takeover {
            params.push(ExtensionParam::flag(SERVER_NO_CONTEXT_TAKEOVER));
        }
        if self.params.client_no_context_takeover {
            params.push(ExtensionParam::flag(CLIENT_NO_CONTEXT_TAKEOVER));
        }
        if self.params.server_max_window_bits != MAX_WINDOW_BITS {
            params.push(ExtensionParam::new(
                SERVER_MAX_WINDOW_BITS,
                self.params.server_max_window_bits.to_string(),
            ));
        }
        if self.announce_client_window {
            params.push(ExtensionParam::new(
                CLIENT_MAX_WINDOW_BITS,
                self.params.client_max_window_bits.to_string(),
            ));
        }

        params
    }
}

/// Server-side provider for `permessage-deflate`.
///
/// Malformed or repeated parameters are protocol violations. Parameters
/// this provider does not know make it decline the offer instead, so a
/// later offer from the peer can still be accepted.
#[derive(Debug, Clone, Default)]
pub struct PerMessageDeflateProvider {
    local: DeflateParams,
}

impl PerMessageDeflateProvider {
    pub fn new(local: DeflateParams) -> Self {
        Self { local }
    }

    fn parse_window_bits(name: &str, value: &str) -> Result<u8> {
        let bits: u8 = value.parse().map_err(|_| {
            Error::protocol_violation(format!("invalid {} value: {}", name, value))
        })?;
        if !(MIN_WINDOW_BITS..=MAX_WINDOW_BITS).contains(&bits) {
            return Err(Error::protocol_violation(format!(
                "{} must be {}-{}, got {}",
                name, MIN_WINDOW_BITS, MAX_WINDOW_BITS, bits
            )));
        }
        Ok(bits)
    }

    fn expect_flag(param: &ExtensionParam) -> Result<()> {
        match &param.value {
            None => Ok(()),
            Some(v) => Err(Error::protocol_violation(format!(
                "{} must not have a value, got {}",
                param.name, v
            ))),
        }
    }
}

impl ExtensionProvider for PerMessageDeflateProvider {
    fn name(&self) -> &str {
        PERMESSAGE_DEFLATE
    }

    fn negotiate(
        &self,
        candidate: &ExtensionHeader,
        _context: &NegotiationContext,
    ) -> Result<Option<Box<dyn NegotiatedExtension>>> {
        let mut agreed = self.local.clone();
        let mut announce_client_window = false;
        let mut seen: Vec<&str> = Vec::with_capacity(candidate.params().len());

        for param in candidate.params() {
            if seen.contains(&param.name.as_str()) {
                return Err(Error::protocol_violation(format!(
                    "duplicate parameter: {}",
                    param.name
                )));
            }
            seen.push(&param.name);

            match param.name.as_str() {
                SERVER_NO_CONTEXT_TAKEOVER => {
                    Self::expect_flag(param)?;
                    agreed.server_no_context_takeover = true;
                }
                CLIENT_NO_CONTEXT_TAKEOVER => {
                    Self::expect_flag(param)?;
                    agreed.client_no_context_takeover = true;
                }
                SERVER_MAX_WINDOW_BITS => {
                    let value = param.value.as_deref().ok_or_else(|| {
                        Error::protocol_violation("server_max_window_bits requires a value")
                    })?;
                    let bits = Self::parse_window_bits(SERVER_MAX_WINDOW_BITS, value)?;
                    agreed.server_max_window_bits = bits.min(self.local.server_max_window_bits);
                }
                CLIENT_MAX_WINDOW_BITS => {
                    let offered = match param.value.as_deref() {
                        Some(value) => Self::parse_window_bits(CLIENT_MAX_WINDOW_BITS, value)?,
                        None => MAX_WINDOW_BITS,
                    };
                    agreed.client_max_window_bits = offered.min(self.local.client_max_window_bits);
                    announce_client_window = param.value.is_some()
                        || agreed.client_max_window_bits != MAX_WINDOW_BITS;
                }
                other => {
                    debug!(parameter = other, "declining permessage-deflate offer");
                    return Ok(None);
                }
            }
        }

        // Without client_max_window_bits in the offer the client cannot be
        // asked for a smaller window.
        if !candidate.has_param(CLIENT_MAX_WINDOW_BITS) {
            agreed.client_max_window_bits = MAX_WINDOW_BITS;
        }

        Ok(Some(Box::new(NegotiatedDeflate {
            params: agreed,
            announce_client_window,
        })))
    }
}
