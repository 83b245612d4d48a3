//! Scheduled simulation events.

use crate::SimTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What happens when an event fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// An operating unit fails.
    Breakdown,

    /// The repair server finishes the unit in service.
    RepairComplete,
}

impl EventKind {
    /// Get a human-readable name for this event kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            EventKind::Breakdown => "Breakdown",
            EventKind::RepairComplete => "RepairComplete",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A single scheduled occurrence.
///
/// Events are immutable once created. The queue orders them by `time`;
/// see the simulation crate for how exact ties are broken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Absolute simulated time at which the event fires.
    pub time: SimTime,

    /// What happens when it fires.
    pub kind: EventKind,
}

impl Event {
    /// Create a new event.
    pub fn new(time: SimTime, kind: EventKind) -> Self {
        Self { time, kind }
    }

    /// Create a breakdown event at `time`.
    pub fn breakdown(time: SimTime) -> Self {
        Self::new(time, EventKind::Breakdown)
    }

    /// Create a repair-complete event at `time`.
    pub fn repair_complete(time: SimTime) -> Self {
        Self::new(time, EventKind::RepairComplete)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.kind, self.time)
    }
}
