//! Types for the poll scheduler.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PollError {
    /// Interval must be a positive number of milliseconds.
    #[error("invalid polling interval: {0} ms")]
    InvalidInterval(u64),
}

/// Current status of the poll scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollStatus {
    /// Whether the timer is armed.
    pub running: bool,
    /// Interval used by the next `start`.
    pub interval_ms: u64,
    /// Current generation; bumped every time polling stops.
    pub generation: u64,
    /// Error that stopped polling, cleared on the next start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}
