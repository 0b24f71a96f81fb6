//! PROXY Protocol Codec
//!
//! Handles HAProxy PROXY protocol v1/v2 headers for all listeners.
//! Version 1 is a CRLF-terminated ASCII line, version 2 a fixed binary
//! header with a 12-byte signature. Both decode into the same [`ProxyLine`]
//! data model; the v2 LOCAL command decodes to `None` (no translation).

mod error;
mod line;
mod validate;

pub mod v1;
pub mod v2;

pub use error::ProxyError;
pub use line::{Protocol, ProxyLine};
