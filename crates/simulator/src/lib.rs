//! Machine-repair simulator.
//!
//! A Monte Carlo driver built on top of `repairsim-simulation`. The engine
//! takes arbitrary time generators; this crate supplies seeded ones and
//! runs many independent replications.
//!
//! # Architecture
//!
//! The simulator provides:
//!
//! - **Distributions**: fixed, exponential and uniform durations, each
//!   sampled from its own ChaCha stream
//! - **Replication**: independent runs, optionally in parallel, reproducible
//!   from a single seed
//! - **Metrics**: mean, spread and percentiles of the time to failure
//!
//! # Example
//!
//! ```
//! use repairsim_simulator::{Simulator, SimulatorConfig, TimeDistribution};
//!
//! let config = SimulatorConfig::new(3, 2)
//!     .with_breakdown(TimeDistribution::Exponential { mean: 10.0 })
//!     .with_repair(TimeDistribution::Exponential { mean: 2.0 })
//!     .with_replications(100)
//!     .with_seed(7);
//!
//! let report = Simulator::new(config).unwrap().run().unwrap();
//! assert_eq!(report.replications, 100);
//! println!("mean time to failure: {:?}", report.mean_time_to_failure());
//! ```

pub mod config;
pub mod distribution;
pub mod error;
pub mod metrics;
pub mod runner;

pub use config::SimulatorConfig;
pub use distribution::{DistributionSampler, TimeDistribution};
pub use error::SimulatorError;
pub use metrics::{MetricsCollector, ReplicationReport};
pub use runner::Simulator;
