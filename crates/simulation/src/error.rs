//! Error types for the simulation engine.

use repairsim_types::SimTime;
use std::fmt;
use thiserror::Error;

/// Invalid run configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// At least one unit must be operating.
    #[error("n_operating must be positive")]
    NoOperatingUnits,

    /// Horizon must be a finite, non-negative time.
    #[error("Invalid horizon: {0}")]
    InvalidHorizon(f64),
}

/// Which time generator produced a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawSource {
    /// `time_to_breakdown`.
    Breakdown,
    /// `time_to_repair`.
    Repair,
}

impl fmt::Display for DrawSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawSource::Breakdown => f.write_str("time_to_breakdown"),
            DrawSource::Repair => f.write_str("time_to_repair"),
        }
    }
}

/// Errors during a simulation run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// The configuration was rejected before the run started.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A time generator returned a negative or non-finite value.
    #[error("{generator} produced invalid duration {value}")]
    InvalidDraw {
        /// Generator that produced the value.
        generator: DrawSource,
        /// The offending value.
        value: f64,
    },

    /// A repair completed while the server had no unit in service.
    ///
    /// Every `RepairComplete` is scheduled by starting a repair, so this is a
    /// logic defect.
    #[error("Repair completed at time {time} with no unit in service")]
    NoUnitInService {
        /// Simulated time of the stray completion.
        time: SimTime,
    },

    /// No pending events although the system has not failed.
    ///
    /// The transition rules always keep an event pending, so this is a logic
    /// defect rather than a recoverable condition.
    #[error("Event queue exhausted at time {time} before system failure")]
    EventQueueExhausted {
        /// Simulated time at which the queue ran dry.
        time: SimTime,
    },
}
