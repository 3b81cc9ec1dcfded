//! Polling configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the poll scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Delay between poll cycles (milliseconds).
    #[serde(default = "default_interval")]
    pub interval_ms: u64,

    /// Start polling as soon as the client is up.
    #[serde(default = "default_autostart")]
    pub autostart: bool,
}

fn default_interval() -> u64 {
    10_000 // 10 seconds
}

fn default_autostart() -> bool {
    true
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
            autostart: default_autostart(),
        }
    }
}
