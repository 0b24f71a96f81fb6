//! PROXY protocol version 2: the binary form.
//!
//! A 12-byte signature, one version/command byte (high nibble = version,
//! low nibble = command), one protocol code byte, and a big-endian length
//! covering the address block plus any TLV extension bytes. Address blocks
//! are serialized field-by-field; nothing here relies on struct layout.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::trace;

use crate::proxy::{Protocol, ProxyError, ProxyLine};

/// PROXY v2 signature (12 bytes)
pub const SIGNATURE: [u8; 12] = *b"\r\n\r\n\x00\r\nQUIT\n";

const VERSION: u8 = 2;
const COMMAND_LOCAL: u8 = 0;
const COMMAND_PROXY: u8 = 1;
const PROTOCOL_TCP4: u8 = 0x11;
const PROTOCOL_TCP6: u8 = 0x21;

/// TCP4 address block: 4+4 byte addresses, 2+2 byte ports.
const ADDRESS_BLOCK_TCP4: usize = 12;
/// TCP6 address block: 16+16 byte addresses, 2+2 byte ports.
const ADDRESS_BLOCK_TCP6: usize = 36;

/// Read one PROXY v2 header from the stream.
///
/// Returns `Ok(None)` for the LOCAL command: the connection was not
/// proxied and the caller must keep the addresses it observed itself. Any
/// payload a LOCAL header declares is still consumed so the stream stays
/// framed for the application bytes that follow. Declared length beyond
/// the fixed address block is TLV extension data and is discarded
/// unread.
pub async fn decode<R: AsyncRead + Unpin>(
    stream: &mut R,
) -> Result<Option<ProxyLine>, ProxyError> {
    let mut header = [0u8; 16];
    stream.read_exact(&mut header).await?;

    if header[..12] != SIGNATURE {
        let mut signature = [0u8; 12];
        signature.copy_from_slice(&header[..12]);
        return Err(ProxyError::BadSignature(signature));
    }

    let version = header[12] >> 4;
    let command = header[12] & 0x0F;
    let declared = u16::from_be_bytes([header[14], header[15]]);

    if version != VERSION {
        return Err(ProxyError::UnsupportedVersion(version));
    }

    if command == COMMAND_LOCAL {
        // Not proxied; skip whatever the header declares and keep the
        // connection's real observed addresses.
        if declared > 0 {
            trace!(length = declared, "skipping PROXY v2 LOCAL payload");
            discard(stream, u64::from(declared)).await?;
        }
        return Ok(None);
    }
    if command != COMMAND_PROXY {
        return Err(ProxyError::UnsupportedCommand(command));
    }

    let (line, block_len) = match header[13] {
        PROTOCOL_TCP4 => {
            let mut block = [0u8; ADDRESS_BLOCK_TCP4];
            stream.read_exact(&mut block).await?;

            let source = SocketAddr::new(
                IpAddr::V4(Ipv4Addr::new(block[0], block[1], block[2], block[3])),
                u16::from_be_bytes([block[8], block[9]]),
            );
            let destination = SocketAddr::new(
                IpAddr::V4(Ipv4Addr::new(block[4], block[5], block[6], block[7])),
                u16::from_be_bytes([block[10], block[11]]),
            );
            (
                ProxyLine {
                    protocol: Protocol::Tcp4,
                    source,
                    destination,
                },
                ADDRESS_BLOCK_TCP4,
            )
        }
        PROTOCOL_TCP6 => {
            let mut block = [0u8; ADDRESS_BLOCK_TCP6];
            stream.read_exact(&mut block).await?;

            let mut source_octets = [0u8; 16];
            source_octets.copy_from_slice(&block[..16]);
            let mut destination_octets = [0u8; 16];
            destination_octets.copy_from_slice(&block[16..32]);

            let source = SocketAddr::new(
                IpAddr::V6(Ipv6Addr::from(source_octets)),
                u16::from_be_bytes([block[32], block[33]]),
            );
            let destination = SocketAddr::new(
                IpAddr::V6(Ipv6Addr::from(destination_octets)),
                u16::from_be_bytes([block[34], block[35]]),
            );
            (
                ProxyLine {
                    protocol: Protocol::Tcp6,
                    source,
                    destination,
                },
                ADDRESS_BLOCK_TCP6,
            )
        }
        other => return Err(ProxyError::UnsupportedProtocol(other)),
    };

    // Anything declared beyond the fixed block is TLV extension data.
    if usize::from(declared) > block_len {
        let extra = u64::from(declared) - block_len as u64;
        trace!(length = extra, "skipping PROXY v2 extension bytes");
        discard(stream, extra).await?;
    }

    Ok(Some(line))
}

/// Consume exactly `count` bytes from the stream without keeping them.
async fn discard<R: AsyncRead + Unpin>(stream: &mut R, count: u64) -> Result<(), ProxyError> {
    let copied = tokio::io::copy(&mut stream.take(count), &mut tokio::io::sink()).await?;
    if copied < count {
        return Err(ProxyError::Framing(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stream ended inside declared PROXY v2 payload",
        )));
    }
    Ok(())
}

/// Render the on-the-wire v2 PROXY header for `line`.
///
/// The length field always covers exactly the address block; this encoder
/// never emits TLVs. Addresses are narrowed or widened to the protocol's
/// width: a v4-mapped IPv6 address under [`Protocol::Tcp4`] contributes
/// its embedded 4 bytes, an IPv4 address under [`Protocol::Tcp6`] is
/// emitted in v4-mapped form. Passing [`Protocol::Unknown`] is a caller
/// error; debug builds assert, release builds fall back to an AF_UNSPEC
/// header with no address block.
pub fn encode(line: &ProxyLine) -> Bytes {
    debug_assert!(
        line.protocol != Protocol::Unknown,
        "PROXY v2 cannot carry an UNKNOWN protocol"
    );

    let mut buf = BytesMut::with_capacity(16 + ADDRESS_BLOCK_TCP6);
    buf.put_slice(&SIGNATURE);
    buf.put_u8((VERSION << 4) | COMMAND_PROXY);

    match line.protocol {
        Protocol::Tcp4 => {
            buf.put_u8(PROTOCOL_TCP4);
            buf.put_u16(ADDRESS_BLOCK_TCP4 as u16);
            buf.put_slice(&ipv4_octets(line.source.ip()));
            buf.put_slice(&ipv4_octets(line.destination.ip()));
            buf.put_u16(line.source.port());
            buf.put_u16(line.destination.port());
        }
        Protocol::Tcp6 => {
            buf.put_u8(PROTOCOL_TCP6);
            buf.put_u16(ADDRESS_BLOCK_TCP6 as u16);
            buf.put_slice(&ipv6_octets(line.source.ip()));
            buf.put_slice(&ipv6_octets(line.destination.ip()));
            buf.put_u16(line.source.port());
            buf.put_u16(line.destination.port());
        }
        Protocol::Unknown => {
            buf.put_u8(0x00);
            buf.put_u16(0);
        }
    }

    buf.freeze()
}

fn ipv4_octets(ip: IpAddr) -> [u8; 4] {
    match ip {
        IpAddr::V4(v4) => v4.octets(),
        IpAddr::V6(v6) => v6.to_ipv4().map(|v4| v4.octets()).unwrap_or([0u8; 4]),
    }
}

fn ipv6_octets(ip: IpAddr) -> [u8; 16] {
    match ip {
        IpAddr::V4(v4) => v4.to_ipv6_mapped().octets(),
        IpAddr::V6(v6) => v6.octets(),
    }
}
