//! Parsed PROXY header data model.

use std::fmt;
use std::net::SocketAddr;

/// Transport protocol family carried by a PROXY header.
///
/// `Unknown` exists only as a v1 parse result: a line whose protocol token
/// is neither `TCP4` nor `TCP6` is accepted with no address-family
/// guarantee. The v2 binary format has no such escape hatch; an
/// unrecognized protocol code there is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// TCP over IPv4
    Tcp4,
    /// TCP over IPv6
    Tcp6,
    /// Unsupported or unknown protocol
    Unknown,
}

impl Protocol {
    /// The v1 wire token for this protocol.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp4 => "TCP4",
            Protocol::Tcp6 => "TCP6",
            Protocol::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Original connection endpoints recovered from a PROXY header.
///
/// When `protocol` is [`Protocol::Tcp4`] both addresses are IPv4, when
/// [`Protocol::Tcp6`] both are IPv6; the decoders enforce this and callers
/// populating a line for encoding are expected to uphold it. A `ProxyLine`
/// is built fresh per connection attempt and not mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyLine {
    /// Protocol family of both endpoints
    pub protocol: Protocol,

    /// Original client address (source from the PROXY header)
    pub source: SocketAddr,

    /// Address the client originally connected to
    pub destination: SocketAddr,
}
