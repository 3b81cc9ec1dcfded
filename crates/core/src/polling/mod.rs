//! Fixed-interval catalog polling.
//!
//! Lifecycle: Idle -> Running -> Idle. A fetch failure stops polling until
//! the next explicit `start`/`restart`; there is no retry or backoff.

mod config;
mod scheduler;
mod types;

pub use config::PollingConfig;
pub use scheduler::PollScheduler;
pub use types::{PollError, PollStatus};
