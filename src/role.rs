//! Endpoint role performing negotiation.

/// Which side of the connection produced a negotiation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// The connection initiator.
    Client,
    /// The connection acceptor.
    Server,
}

impl Role {
    /// Check if this role initiated the connection.
    #[inline]
    #[must_use]
    pub const fn is_initiator(&self) -> bool {
        matches!(self, Role::Client)
    }

    /// The role of the remote peer.
    #[inline]
    #[must_use]
    pub const fn peer(&self) -> Role {
        match self {
            Role::Client => Role::Server,
            Role::Server => Role::Client,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Client => write!(f, "Client"),
            Role::Server => write!(f, "Server"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_is_initiator() {
        assert!(Role::Client.is_initiator());
        assert!(!Role::Server.is_initiator());
    }

    #[test]
    fn test_peer_role() {
        assert_eq!(Role::Client.peer(), Role::Server);
        assert_eq!(Role::Server.peer(), Role::Client);
    }

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Client.to_string(), "Client");
        assert_eq!(Role::Server.to_string(), "Server");
    }
}
