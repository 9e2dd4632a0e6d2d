//! Boundary-state registries.
//!
//! The layout algorithm is pure; everything stateful lives here, owned by
//! explicit registry objects constructed once at startup and passed by
//! handle. No ambient globals.

mod instances;
mod timers;

pub use instances::{InstanceKey, InstanceRegistry, InstanceState};
pub use timers::{TimerKey, TimerRegistry};
