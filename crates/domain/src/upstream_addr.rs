use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use crate::DomainError;

/// Port appended to upstream addresses that do not name one.
pub const DEFAULT_DNS_PORT: u16 = 53;

/// Address of an upstream resolver. Literal IPs are resolved at parse time;
/// hostnames are kept as-is and looked up when a query is sent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpstreamAddr {
    Resolved(SocketAddr),
    Unresolved { hostname: Arc<str>, port: u16 },
}

impl UpstreamAddr {
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        match self {
            UpstreamAddr::Resolved(addr) => Some(*addr),
            UpstreamAddr::Unresolved { .. } => None,
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            UpstreamAddr::Resolved(addr) => addr.port(),
            UpstreamAddr::Unresolved { port, .. } => *port,
        }
    }

    /// Returns (hostname, port) if this address still needs a lookup.
    pub fn unresolved_parts(&self) -> Option<(&str, u16)> {
        match self {
            UpstreamAddr::Unresolved { hostname, port } => Some((hostname, *port)),
            UpstreamAddr::Resolved(_) => None,
        }
    }
}

impl fmt::Display for UpstreamAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamAddr::Resolved(addr) => write!(f, "{}", addr),
            UpstreamAddr::Unresolved { hostname, port } => write!(f, "{}:{}", hostname, port),
        }
    }
}

fn parse_port(s: &str, port_str: &str) -> Result<u16, DomainError> {
    port_str
        .parse::<u16>()
        .map_err(|e| DomainError::InvalidUpstreamAddress(format!("'{}': bad port: {}", s, e)))
}

fn host_with_port(host: &str, port: u16) -> UpstreamAddr {
    match host.parse::<IpAddr>() {
        Ok(ip) => UpstreamAddr::Resolved(SocketAddr::new(ip, port)),
        Err(_) => UpstreamAddr::Unresolved {
            hostname: host.into(),
            port,
        },
    }
}

impl FromStr for UpstreamAddr {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::InvalidUpstreamAddress(
                "empty server address".to_string(),
            ));
        }

        if let Ok(addr) = s.parse::<SocketAddr>() {
            return Ok(UpstreamAddr::Resolved(addr));
        }
        // Bare IPv6 literals contain colons, so try a plain IP before host:port.
        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(UpstreamAddr::Resolved(SocketAddr::new(ip, DEFAULT_DNS_PORT)));
        }

        if let Some(rest) = s.strip_prefix('[') {
            let (host, tail) = rest.split_once(']').ok_or_else(|| {
                DomainError::InvalidUpstreamAddress(format!("'{}': unclosed '['", s))
            })?;
            let port = match tail.strip_prefix(':') {
                Some(port_str) => parse_port(s, port_str)?,
                None if tail.is_empty() => DEFAULT_DNS_PORT,
                None => {
                    return Err(DomainError::InvalidUpstreamAddress(format!(
                        "'{}': unexpected '{}' after ']'",
                        s, tail
                    )))
                }
            };
            return Ok(host_with_port(host, port));
        }

        let (host, port) = match s.rsplit_once(':') {
            Some((host, port_str)) => (host, parse_port(s, port_str)?),
            None => (s, DEFAULT_DNS_PORT),
        };
        if host.is_empty() || host.contains(':') || host.contains(char::is_whitespace) {
            return Err(DomainError::InvalidUpstreamAddress(format!(
                "'{}': invalid host",
                s
            )));
        }
        Ok(host_with_port(host, port))
    }
}
