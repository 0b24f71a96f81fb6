//! Shared address and port validators used by both codec versions.

use std::net::IpAddr;

use crate::proxy::{Protocol, ProxyError};

/// Parse a decimal port token, bounded to [0, 65535].
pub(crate) fn parse_port(token: &str) -> Result<u16, ProxyError> {
    token
        .parse::<u16>()
        .map_err(|_| ProxyError::InvalidPort(token.to_string()))
}

/// Parse an address literal and check it against the declared protocol
/// family. An address expressible in 4 bytes is only valid under TCP4, a
/// 16-byte address only under TCP6; `Unknown` imposes no family rule.
pub(crate) fn parse_ip(protocol: Protocol, token: &str) -> Result<IpAddr, ProxyError> {
    let addr: IpAddr = token
        .parse()
        .map_err(|_| ProxyError::MalformedHeader(format!("bad address {:?}", token)))?;

    let matches = match protocol {
        Protocol::Tcp4 => addr.is_ipv4(),
        Protocol::Tcp6 => addr.is_ipv6(),
        Protocol::Unknown => true,
    };
    if !matches {
        return Err(ProxyError::AddressFamilyMismatch {
            protocol,
            addr: token.to_string(),
        });
    }
    Ok(addr)
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, Ipv6Addr};

    use test_case::test_case;

    use super::*;

    #[test_case("0", 0)]
    #[test_case("443", 443)]
    #[test_case("65535", 65535)]
    fn port_in_range(token: &str, expected: u16) {
        assert_eq!(parse_port(token).unwrap(), expected);
    }

    #[test_case("65536")]
    #[test_case("-1")]
    #[test_case("80a")]
    #[test_case("")]
    fn port_out_of_range(token: &str) {
        match parse_port(token).unwrap_err() {
            ProxyError::InvalidPort(t) => assert_eq!(t, token),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn ip_family_matches_token() {
        assert_eq!(
            parse_ip(Protocol::Tcp4, "192.168.1.1").unwrap(),
            IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1))
        );
        assert_eq!(
            parse_ip(Protocol::Tcp6, "::1").unwrap(),
            IpAddr::V6(Ipv6Addr::LOCALHOST)
        );
    }

    #[test]
    fn ip_family_mismatch() {
        assert!(matches!(
            parse_ip(Protocol::Tcp6, "192.168.1.1"),
            Err(ProxyError::AddressFamilyMismatch {
                protocol: Protocol::Tcp6,
                ..
            })
        ));
        assert!(matches!(
            parse_ip(Protocol::Tcp4, "::1"),
            Err(ProxyError::AddressFamilyMismatch {
                protocol: Protocol::Tcp4,
                ..
            })
        ));
        // An IPv4 address embedded as IPv6 is still IPv6 on the wire; the
        // family must match exactly, not just be convertible.
        assert!(matches!(
            parse_ip(Protocol::Tcp4, "::ffff:10.0.0.1"),
            Err(ProxyError::AddressFamilyMismatch { .. })
        ));
    }

    #[test]
    fn unknown_protocol_accepts_any_family() {
        assert!(parse_ip(Protocol::Unknown, "10.0.0.1").is_ok());
        assert!(parse_ip(Protocol::Unknown, "fe80::1").is_ok());
        assert!(matches!(
            parse_ip(Protocol::Unknown, "not-an-ip"),
            Err(ProxyError::MalformedHeader(_))
        ));
    }
}
