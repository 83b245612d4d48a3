//! Error types for the simulator.

use repairsim_simulation::SimulationError;
use thiserror::Error;

/// Errors from configuring or running replications.
#[derive(Debug, Error)]
pub enum SimulatorError {
    /// A distribution has unusable parameters or could not be parsed.
    #[error("Invalid distribution: {0}")]
    InvalidDistribution(String),

    /// The replication count must be positive.
    #[error("At least one replication is required")]
    NoReplications,

    /// A single run failed.
    #[error("Replication {index} failed: {source}")]
    Replication {
        /// Index of the failing replication.
        index: u64,
        /// Engine error.
        source: SimulationError,
    },

    /// The engine rejected the run configuration.
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    /// Histogram bookkeeping failed.
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
