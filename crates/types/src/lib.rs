//! Core types for the machine-repair simulation.
//!
//! This crate holds the plain data shared between the simulation engine and
//! anything that drives or inspects it:
//!
//! - [`Event`] / [`EventKind`]: scheduled occurrences that drive the engine
//! - [`Snapshot`]: a read-only record of the observable state after an event
//! - [`SimTime`]: simulated time, a non-negative real

mod event;
mod snapshot;
mod time;

pub use event::{Event, EventKind};
pub use snapshot::Snapshot;
pub use time::{is_valid_duration, SimTime};
