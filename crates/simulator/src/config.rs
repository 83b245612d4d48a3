//! Configuration types for the simulator.

use crate::{SimulatorError, TimeDistribution};
use repairsim_simulation::RepairConfig;
use repairsim_types::SimTime;

/// Configuration for a batch of replications.
#[derive(Clone, Debug)]
pub struct SimulatorConfig {
    /// Units in active service.
    pub n_operating: usize,

    /// Spare units.
    pub n_spares: usize,

    /// Time from installation to breakdown of one unit.
    pub breakdown: TimeDistribution,

    /// Service time of one repair.
    pub repair: TimeDistribution,

    /// Number of independent runs.
    pub replications: u64,

    /// Random seed for deterministic replication.
    pub seed: u64,

    /// Optional bound on simulated time per run. Runs that reach it are
    /// counted as censored rather than failed.
    pub horizon: Option<SimTime>,

    /// Run replications on the rayon thread pool.
    pub parallel: bool,
}

impl SimulatorConfig {
    /// Create a new simulator configuration.
    pub fn new(n_operating: usize, n_spares: usize) -> Self {
        Self {
            n_operating,
            n_spares,
            breakdown: TimeDistribution::Exponential { mean: 1.0 },
            repair: TimeDistribution::Exponential { mean: 0.125 },
            replications: 1_000,
            seed: 12345,
            horizon: None,
            parallel: true,
        }
    }

    /// Set the breakdown time distribution.
    pub fn with_breakdown(mut self, breakdown: TimeDistribution) -> Self {
        self.breakdown = breakdown;
        self
    }

    /// Set the repair time distribution.
    pub fn with_repair(mut self, repair: TimeDistribution) -> Self {
        self.repair = repair;
        self
    }

    /// Set the number of replications.
    pub fn with_replications(mut self, replications: u64) -> Self {
        self.replications = replications;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Bound every run to a simulated-time horizon.
    pub fn with_horizon(mut self, horizon: SimTime) -> Self {
        self.horizon = Some(horizon);
        self
    }

    /// Run replications sequentially on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Engine configuration for one run.
    pub fn to_repair_config(&self, capture_states: bool) -> RepairConfig {
        let config = RepairConfig::new(self.n_operating, self.n_spares)
            .with_capture_states(capture_states);
        match self.horizon {
            Some(horizon) => config.with_horizon(horizon),
            None => config,
        }
    }

    /// Check every parameter before any run starts.
    pub fn validate(&self) -> Result<(), SimulatorError> {
        if self.replications == 0 {
            return Err(SimulatorError::NoReplications);
        }
        self.breakdown.validate()?;
        self.repair.validate()?;
        self.to_repair_config(false)
            .validate()
            .map_err(|e| SimulatorError::Simulation(e.into()))
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::new(10, 3)
    }
}
