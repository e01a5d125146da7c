//! Client origin resolution.
//!
//! Every authentication attempt is attributed to a network origin (normally
//! the client IP). The resolver contract is deliberately infallible: it
//! returns `Some(origin)` or `None`, and the engine treats `None` as a
//! fail-closed condition (the attempt is rejected before any store call).

use std::net::{IpAddr, SocketAddr};

/// Request metadata the resolver works from.
///
/// Carries the raw forwarded-for header value (if any) and the direct peer
/// address of the connection.
#[derive(Debug, Clone, Default)]
pub struct ClientMeta {
    /// Raw `X-Forwarded-For` style header value, comma-separated.
    pub forwarded_for: Option<String>,
    /// Address of the directly connected peer.
    pub peer_addr: Option<SocketAddr>,
}

impl ClientMeta {
    /// Metadata for a direct connection with no proxy headers.
    pub fn from_peer(peer_addr: SocketAddr) -> Self {
        Self {
            forwarded_for: None,
            peer_addr: Some(peer_addr),
        }
    }
}

/// Trait for origin resolver implementations.
pub trait OriginResolver: Send + Sync {
    /// Resolve a stable origin identifier from request metadata.
    ///
    /// Must not fail; `None` is the only failure signal the engine consumes.
    fn resolve(&self, meta: &ClientMeta) -> Option<String>;
}

/// Resolver that prefers a validated forwarded-for entry over the peer
/// address.
///
/// The first comma-separated forwarded-for entry that parses as a valid
/// IPv4/IPv6 address wins; otherwise the direct peer IP is used. Entries
/// that do not parse are ignored rather than trusted, since the header is
/// client-controlled.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardedForResolver;

impl OriginResolver for ForwardedForResolver {
    fn resolve(&self, meta: &ClientMeta) -> Option<String> {
        if let Some(header) = &meta.forwarded_for {
            for entry in header.split(',') {
                if let Ok(ip) = entry.trim().parse::<IpAddr>() {
                    return Some(ip.to_string());
                }
            }
        }

        meta.peer_addr.map(|addr| addr.ip().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(addr: &str) -> SocketAddr {
        addr.parse().unwrap()
    }

    #[test]
    fn test_forwarded_for_preferred() {
        let meta = ClientMeta {
            forwarded_for: Some("203.0.113.7, 10.0.0.1".to_string()),
            peer_addr: Some(peer("192.0.2.1:443")),
        };
        assert_eq!(
            ForwardedForResolver.resolve(&meta),
            Some("203.0.113.7".to_string())
        );
    }

    #[test]
    fn test_invalid_forwarded_entries_skipped() {
        let meta = ClientMeta {
            forwarded_for: Some("unknown, not-an-ip, 198.51.100.9".to_string()),
            peer_addr: Some(peer("192.0.2.1:443")),
        };
        assert_eq!(
            ForwardedForResolver.resolve(&meta),
            Some("198.51.100.9".to_string())
        );
    }

    #[test]
    fn test_falls_back_to_peer_addr() {
        let meta = ClientMeta {
            forwarded_for: Some("garbage".to_string()),
            peer_addr: Some(peer("192.0.2.1:443")),
        };
        assert_eq!(
            ForwardedForResolver.resolve(&meta),
            Some("192.0.2.1".to_string())
        );
    }

    #[test]
    fn test_ipv6_forwarded_entry() {
        let meta = ClientMeta {
            forwarded_for: Some("2001:db8::1".to_string()),
            peer_addr: None,
        };
        assert_eq!(
            ForwardedForResolver.resolve(&meta),
            Some("2001:db8::1".to_string())
        );
    }

    #[test]
    fn test_no_origin_at_all() {
        assert_eq!(ForwardedForResolver.resolve(&ClientMeta::default()), None);
    }
}
