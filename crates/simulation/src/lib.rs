//! Discrete-event simulation of a machine-repair system.
//!
//! A fixed population of operating units fails at random intervals. Failed
//! units are repaired one at a time by a single repair server in FIFO order.
//! Spare units absorb failures until more units are down than there are
//! spares, at which point the system has failed. One run answers "how long
//! until the spares run out?".
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                   RepairSimulation                      │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Event Queue (BTreeMap<EventKey, EventKind>)    │ │
//! │  │     Ordered by: time, sequence                     │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │ pop earliest                │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     RepairState (down, queue, server)              │ │
//! │  │     Draws times from Clocks, returns new events    │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     SnapshotRecorder → Vec<Snapshot>               │ │
//! │  │     then stop once down > n_spares                 │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use repairsim_simulation::{RepairConfig, RepairSimulation};
//!
//! let config = RepairConfig::new(1, 0).with_capture_states(true);
//! let sim = RepairSimulation::new(config, || 2.5, || 1.0).unwrap();
//! let report = sim.run().unwrap();
//!
//! assert_eq!(report.failure_time(), Some(2.5));
//! assert_eq!(report.snapshots.len(), 2);
//! ```

mod config;
mod error;
mod event_queue;
mod generator;
mod recorder;
mod runner;
mod state;

pub use config::RepairConfig;
pub use error::{ConfigError, DrawSource, SimulationError};
pub use event_queue::{EventKey, EventQueue};
pub use generator::{Clocks, TimeGenerator};
pub use recorder::SnapshotRecorder;
pub use runner::{RepairSimulation, RunOutcome, RunReport, StepOutcome};
pub use state::RepairState;

pub use repairsim_types::{Event, EventKind, SimTime, Snapshot};
