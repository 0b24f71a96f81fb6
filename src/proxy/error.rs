//! Classified PROXY header decode errors.

use std::io;

use crate::proxy::Protocol;

/// Errors that can occur while decoding a PROXY protocol header.
///
/// Every variant carries the offending field so callers can log without
/// re-parsing. Nothing is retried internally; any decode error is fatal to
/// the stream position (some prefix of the header may already be consumed).
#[derive(Debug)]
pub enum ProxyError {
    /// Stream ended or failed before the expected number of bytes was
    /// available: line terminator search, fixed header read, address block
    /// read, or TLV discard.
    Framing(io::Error),
    /// v2 magic prefix mismatch; carries the 12 bytes actually read.
    BadSignature([u8; 12]),
    /// v2 header version nibble is not 2.
    UnsupportedVersion(u8),
    /// v2 command nibble is neither LOCAL nor PROXY.
    UnsupportedCommand(u8),
    /// v2 protocol code is neither TCP4 (0x11) nor TCP6 (0x21).
    UnsupportedProtocol(u8),
    /// v1 line is structurally invalid (token count, terminator, encoding,
    /// or an address token that does not parse at all).
    MalformedHeader(String),
    /// Declared protocol family disagrees with the address literal's family.
    AddressFamilyMismatch {
        /// Family claimed by the protocol token
        protocol: Protocol,
        /// Offending address literal
        addr: String,
    },
    /// Non-numeric or out-of-range port text.
    InvalidPort(String),
}

impl std::fmt::Display for ProxyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProxyError::Framing(e) => write!(f, "truncated PROXY header: {}", e),
            ProxyError::BadSignature(sig) => {
                write!(f, "unrecognized PROXY v2 signature ")?;
                for b in sig {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            ProxyError::UnsupportedVersion(v) => {
                write!(f, "unsupported PROXY protocol version {}", v)
            }
            ProxyError::UnsupportedCommand(c) => {
                write!(f, "unsupported PROXY v2 command {}", c)
            }
            ProxyError::UnsupportedProtocol(p) => {
                write!(f, "unsupported PROXY v2 protocol {:#04x}", p)
            }
            ProxyError::MalformedHeader(msg) => write!(f, "malformed PROXY line: {}", msg),
            ProxyError::AddressFamilyMismatch { protocol, addr } => {
                write!(f, "address {:?} does not match protocol {}", addr, protocol)
            }
            ProxyError::InvalidPort(port) => {
                write!(f, "port {:?} not in supported range [0..65535]", port)
            }
        }
    }
}

impl std::error::Error for ProxyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProxyError::Framing(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ProxyError {
    fn from(e: io::Error) -> Self {
        ProxyError::Framing(e)
    }
}
