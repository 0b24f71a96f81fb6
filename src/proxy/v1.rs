//! PROXY protocol version 1: the human-readable text form.
//!
//! One ASCII line, CRLF-terminated, space-separated:
//! `PROXY <proto> <src-ip> <dst-ip> <src-port> <dst-port>\r\n`

use std::io;
use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::proxy::validate::{parse_ip, parse_port};
use crate::proxy::{Protocol, ProxyError, ProxyLine};

/// Maximum v1 line length including the CRLF terminator.
const MAX_LINE_LENGTH: usize = 107;

/// Read one PROXY v1 line from the stream.
///
/// Reads a single byte at a time so that exactly one CRLF-terminated line
/// is consumed and nothing beyond it; the bytes following the terminator
/// belong to the proxied application protocol. The leading `PROXY` token is
/// not re-validated here: the caller has already matched it when deciding
/// to hand this stream to the v1 decoder.
pub async fn decode<R: AsyncRead + Unpin>(stream: &mut R) -> Result<ProxyLine, ProxyError> {
    let mut line = Vec::with_capacity(64);

    loop {
        let mut byte = [0u8; 1];
        let n = stream.read(&mut byte).await?;
        if n == 0 {
            return Err(ProxyError::Framing(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stream ended before PROXY line terminator",
            )));
        }
        line.push(byte[0]);
        if byte[0] == b'\n' {
            break;
        }
        if line.len() >= MAX_LINE_LENGTH {
            return Err(ProxyError::MalformedHeader(format!(
                "PROXY line exceeds {} bytes",
                MAX_LINE_LENGTH
            )));
        }
    }

    if !line.ends_with(b"\r\n") {
        return Err(ProxyError::MalformedHeader(
            "line feed without preceding carriage return".to_string(),
        ));
    }

    let text = std::str::from_utf8(&line[..line.len() - 2])
        .map_err(|_| ProxyError::MalformedHeader("line is not valid UTF-8".to_string()))?;

    // Single-space separators; consecutive spaces yield empty tokens and
    // fail the field checks below rather than being collapsed.
    let tokens: Vec<&str> = text.split(' ').collect();
    if tokens.len() < 6 {
        return Err(ProxyError::MalformedHeader(format!(
            "expected 6 fields, got {} in {:?}",
            tokens.len(),
            text
        )));
    }

    let protocol = match tokens[1] {
        "TCP4" => Protocol::Tcp4,
        "TCP6" => Protocol::Tcp6,
        _ => Protocol::Unknown,
    };

    let source_ip = parse_ip(protocol, tokens[2])?;
    let destination_ip = parse_ip(protocol, tokens[3])?;
    let source_port = parse_port(tokens[4])?;
    let destination_port = parse_port(tokens[5])?;

    Ok(ProxyLine {
        protocol,
        source: SocketAddr::new(source_ip, source_port),
        destination: SocketAddr::new(destination_ip, destination_port),
    })
}

/// Render the on-the-wire v1 line for `line`, CRLF included.
///
/// No validation beyond the type system: a line with
/// [`Protocol::Unknown`] is emitted with the literal `UNKNOWN` token.
/// Re-decoding such a line only succeeds if its address tokens are
/// themselves parseable; that asymmetry is part of the wire format.
pub fn encode(line: &ProxyLine) -> String {
    format!(
        "PROXY {} {} {} {} {}\r\n",
        line.protocol,
        line.source.ip(),
        line.destination.ip(),
        line.source.port(),
        line.destination.port()
    )
}
