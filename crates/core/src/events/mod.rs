//! In-process publish/subscribe bus.
//!
//! Every event has a fixed wire name (`polling:result`, `medialist:updated`,
//! ...) and a statically typed payload. Dispatch is synchronous and happens
//! on the publisher's call stack, in registration order.

mod bus;
mod types;

pub use bus::{EventBus, EventHandler, Subscription};
pub use types::*;
