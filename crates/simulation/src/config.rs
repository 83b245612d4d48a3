//! Configuration for a single repair-system run.

use crate::ConfigError;
use repairsim_types::{is_valid_duration, SimTime};

/// Configuration for one simulation run.
///
/// The time generators are passed separately to
/// [`RepairSimulation::new`](crate::RepairSimulation::new) since they are
/// arbitrary closures or samplers owned by the run.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairConfig {
    /// Units in active service at steady state.
    pub n_operating: usize,

    /// Units that may be down at once before the system fails.
    pub n_spares: usize,

    /// Record a snapshot after every processed event.
    pub capture_states: bool,

    /// Stop once the next event lies beyond this time, even if the system
    /// has not failed.
    ///
    /// `None` runs until failure.
    pub horizon: Option<SimTime>,
}

impl RepairConfig {
    /// Create a new configuration with recording disabled and no horizon.
    pub fn new(n_operating: usize, n_spares: usize) -> Self {
        Self {
            n_operating,
            n_spares,
            capture_states: false,
            horizon: None,
        }
    }

    /// Enable or disable snapshot recording.
    pub fn with_capture_states(mut self, capture_states: bool) -> Self {
        self.capture_states = capture_states;
        self
    }

    /// Bound the run to a simulated-time horizon.
    pub fn with_horizon(mut self, horizon: SimTime) -> Self {
        self.horizon = Some(horizon);
        self
    }

    /// Check the configuration for values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_operating == 0 {
            return Err(ConfigError::NoOperatingUnits);
        }
        if let Some(horizon) = self.horizon {
            if !is_valid_duration(horizon) {
                return Err(ConfigError::InvalidHorizon(horizon));
            }
        }
        Ok(())
    }
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self::new(1, 0)
    }
}
