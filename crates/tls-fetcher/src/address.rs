//! `host:port` parsing

use crate::error::FetchError;
use rustls::pki_types::ServerName;
use std::fmt;

/// A TLS endpoint split into host and port.
///
/// IPv6 literals must be bracketed (`[::1]:443`), the same form accepted by
/// most dialers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostAddress {
    /// Hostname or IP literal, without brackets
    pub host: String,
    /// TCP port
    pub port: u16,
}

impl HostAddress {
    /// Parse a `host:port` string.
    pub fn parse(address: &str) -> Result<Self, FetchError> {
        let invalid = |reason: &str| FetchError::InvalidAddress {
            address: address.to_string(),
            reason: reason.to_string(),
        };

        let (host, port) = address
            .rsplit_once(':')
            .ok_or_else(|| invalid("missing port"))?;

        let host = match host.strip_prefix('[') {
            Some(rest) => rest
                .strip_suffix(']')
                .ok_or_else(|| invalid("unterminated IPv6 literal"))?,
            None if host.contains(':') => return Err(invalid("IPv6 literals must be bracketed")),
            None => host,
        };
        if host.is_empty() {
            return Err(invalid("missing host"));
        }

        let port = port
            .parse::<u16>()
            .map_err(|e| invalid(&format!("invalid port: {e}")))?;

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    /// Server name used for SNI. IP literals produce an IP server name,
    /// for which no SNI extension is sent.
    pub fn server_name(&self) -> Result<ServerName<'static>, FetchError> {
        ServerName::try_from(self.host.clone())
            .map_err(|e| FetchError::InvalidServerName(format!("{}: {e}", self.host)))
    }
}

impl fmt::Display for HostAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hostname() {
        let addr = HostAddress::parse("example.com:443").unwrap();
        assert_eq!(addr.host, "example.com");
        assert_eq!(addr.port, 443);
        assert_eq!(addr.to_string(), "example.com:443");
    }

    #[test]
    fn test_parse_ipv6_literal() {
        let addr = HostAddress::parse("[::1]:8443").unwrap();
        assert_eq!(addr.host, "::1");
        assert_eq!(addr.port, 8443);
        assert_eq!(addr.to_string(), "[::1]:8443");
        assert!(matches!(addr.server_name().unwrap(), ServerName::IpAddress(_)));
    }

    #[test]
    fn test_parse_rejects_missing_port() {
        let err = HostAddress::parse("example.com").unwrap_err();
        assert!(matches!(err, FetchError::InvalidAddress { .. }));
    }

    #[test]
    fn test_parse_rejects_bad_port() {
        assert!(HostAddress::parse("example.com:https").is_err());
        assert!(HostAddress::parse("example.com:70000").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_host_and_bare_ipv6() {
        assert!(HostAddress::parse(":443").is_err());
        assert!(HostAddress::parse("::1:443").is_err());
    }

    #[test]
    fn test_server_name_dns() {
        let addr = HostAddress::parse("registry.internal:5000").unwrap();
        assert!(matches!(addr.server_name().unwrap(), ServerName::DnsName(_)));
    }
}
