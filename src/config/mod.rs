//! Configuration Types
//!
//! Listener-facing configuration for the PROXY protocol codec.

mod proxy;

pub use proxy::ProxyProtocolConfig;
