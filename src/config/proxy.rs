//! PROXY Protocol Configuration
//!
//! Configuration types for HAProxy PROXY protocol v1/v2 support on a
//! listener. The codec itself applies no deadlines; the timeout here is
//! for the accepting side to arm on the connection before it starts
//! decoding.

use serde::Deserialize;
use std::time::Duration;

/// PROXY protocol configuration for a listener
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProxyProtocolConfig {
    /// Accept and decode PROXY protocol headers on this listener
    pub enabled: bool,

    /// Prepend a PROXY protocol header when dialing the upstream,
    /// forwarding the original client addresses another hop.
    pub send: bool,

    /// Timeout for receiving the PROXY header in seconds.
    /// Default: 5 seconds
    pub timeout: u64,
}

impl Default for ProxyProtocolConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            send: false,
            timeout: 5,
        }
    }
}

impl ProxyProtocolConfig {
    /// Get timeout as Duration
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
