//! Replication runner.

use crate::{
    DistributionSampler, MetricsCollector, ReplicationReport, SimulatorConfig, SimulatorError,
};
use rayon::prelude::*;
use repairsim_simulation::{RepairSimulation, RunReport};
use std::time::Instant;
use tracing::{debug, info};

/// Runs independent replications of the repair system.
///
/// Replication `i` draws breakdown times from ChaCha stream `2i` and repair
/// times from stream `2i + 1` of the configured seed. Results therefore do
/// not depend on whether replications run in parallel or in which order.
pub struct Simulator {
    config: SimulatorConfig,
}

impl Simulator {
    /// Create a simulator after validating the configuration.
    pub fn new(config: SimulatorConfig) -> Result<Self, SimulatorError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The simulator's configuration.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Execute one replication.
    pub fn run_replication(
        &self,
        index: u64,
        capture_states: bool,
    ) -> Result<RunReport, SimulatorError> {
        let (breakdown, repair) = self.samplers(index)?;
        let repair_config = self.config.to_repair_config(capture_states);

        let report = RepairSimulation::new(repair_config, breakdown, repair)
            .and_then(|sim| sim.run())
            .map_err(|source| SimulatorError::Replication { index, source })?;

        debug!(
            index,
            outcome = ?report.outcome,
            end_time = report.end_time,
            events = report.events_processed,
            "Replication finished"
        );
        Ok(report)
    }

    /// Execute every replication and summarize the results.
    pub fn run(&self) -> Result<ReplicationReport, SimulatorError> {
        let start = Instant::now();
        info!(
            replications = self.config.replications,
            n_operating = self.config.n_operating,
            n_spares = self.config.n_spares,
            breakdown = %self.config.breakdown,
            repair = %self.config.repair,
            parallel = self.config.parallel,
            "Starting replications"
        );

        let reports: Vec<RunReport> = if self.config.parallel {
            (0..self.config.replications)
                .into_par_iter()
                .map(|index| self.run_replication(index, false))
                .collect::<Result<_, _>>()?
        } else {
            (0..self.config.replications)
                .map(|index| self.run_replication(index, false))
                .collect::<Result<_, _>>()?
        };

        let mut metrics = MetricsCollector::new()?;
        for report in &reports {
            metrics.record(report)?;
        }
        let summary = metrics.finish();

        info!(
            failures = summary.failures,
            censored = summary.censored,
            mean_time_to_failure = ?summary.mean_time_to_failure(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Replications complete"
        );
        Ok(summary)
    }

    fn samplers(
        &self,
        index: u64,
    ) -> Result<(DistributionSampler, DistributionSampler), SimulatorError> {
        let seed = self.config.seed;
        let breakdown = self.config.breakdown.sampler(seed, 2 * index)?;
        let repair = self.config.repair.sampler(seed, 2 * index + 1)?;
        Ok((breakdown, repair))
    }
}
