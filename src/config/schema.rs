//! Configuration schema definitions.
//!
//! The settings file is flat: every key lives at the top level.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeout applied when `http_timeout` is absent or zero.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Root configuration for the proxy process.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProxyConfig {
    /// Port the HTTP listener binds to. Required.
    pub http_port: Option<u16>,

    /// Upstream round-trip deadline in seconds (0 = default).
    pub http_timeout: u64,

    /// Basic auth identifier sent upstream.
    pub username: String,

    /// Basic auth secret sent upstream.
    pub password: String,
}

impl ProxyConfig {
    /// Effective upstream timeout.
    pub fn timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Address the listener binds to.
    pub fn bind_address(&self) -> Option<String> {
        self.http_port.map(|port| format!("0.0.0.0:{}", port))
    }
}
