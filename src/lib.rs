//! HAProxy PROXY Protocol Codec
//!
//! Encodes and decodes PROXY protocol v1 (text) and v2 (binary) headers so
//! a listener behind one or more intermediating proxies can recover the
//! original client and destination addresses of a TCP connection.
//!
//! The caller decides which wire format is present (typically by peeking
//! leading bytes) and invokes exactly one of the decode entry points; the
//! codec consumes exactly the bytes belonging to the framed header and
//! nothing beyond it.

pub mod config;
pub mod proxy;

pub use config::ProxyProtocolConfig;
pub use proxy::{Protocol, ProxyError, ProxyLine};
