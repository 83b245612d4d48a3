//! Aggregation of replication results.

use crate::SimulatorError;
use hdrhistogram::Histogram;
use repairsim_simulation::{RunOutcome, RunReport};
use serde::Serialize;

/// Histogram resolution: failure times are recorded in thousandths of a
/// time unit.
const HISTOGRAM_SCALE: f64 = 1_000.0;

/// Summary of the time to failure over the replications that failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureStats {
    /// Mean time to failure.
    pub mean: f64,
    /// Sample standard deviation.
    pub std_dev: f64,
    /// Earliest failure.
    pub min: f64,
    /// Latest failure.
    pub max: f64,
    /// Median.
    pub p50: f64,
    /// 90th percentile.
    pub p90: f64,
    /// 99th percentile.
    pub p99: f64,
}

/// Result of a batch of replications.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplicationReport {
    /// Runs executed.
    pub replications: u64,

    /// Runs that ended in system failure.
    pub failures: u64,

    /// Runs cut off by the horizon.
    pub censored: u64,

    /// Average number of events processed per run.
    pub mean_events: f64,

    /// Time-to-failure statistics, absent when no run failed.
    pub time_to_failure: Option<FailureStats>,
}

impl ReplicationReport {
    /// Mean time to failure, if any run failed.
    pub fn mean_time_to_failure(&self) -> Option<f64> {
        self.time_to_failure.as_ref().map(|s| s.mean)
    }

    /// Print a human-readable summary to stdout.
    pub fn print(&self) {
        println!("Replications:   {}", self.replications);
        println!("Failures:       {}", self.failures);
        println!("Censored:       {}", self.censored);
        println!("Events per run: {:.1}", self.mean_events);
        match &self.time_to_failure {
            Some(stats) => {
                println!("Time to failure:");
                println!("  mean    {:.4} (std dev {:.4})", stats.mean, stats.std_dev);
                println!("  min     {:.4}", stats.min);
                println!("  p50     {:.4}", stats.p50);
                println!("  p90     {:.4}", stats.p90);
                println!("  p99     {:.4}", stats.p99);
                println!("  max     {:.4}", stats.max);
            }
            None => println!("Time to failure: no run failed"),
        }
    }
}

/// Collects run reports into a [`ReplicationReport`].
///
/// Mean and variance are accumulated with Welford's update so no per-run
/// data is kept beyond the histogram.
pub struct MetricsCollector {
    histogram: Histogram<u64>,
    replications: u64,
    failures: u64,
    total_events: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl MetricsCollector {
    /// Create an empty collector.
    pub fn new() -> Result<Self, SimulatorError> {
        let histogram =
            Histogram::new(3).map_err(|e| SimulatorError::Metrics(e.to_string()))?;
        Ok(Self {
            histogram,
            replications: 0,
            failures: 0,
            total_events: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        })
    }

    /// Add one finished run.
    pub fn record(&mut self, report: &RunReport) -> Result<(), SimulatorError> {
        self.replications += 1;
        self.total_events += report.events_processed;

        if report.outcome != RunOutcome::SystemFailure {
            return Ok(());
        }

        let time = report.end_time;
        self.failures += 1;
        let delta = time - self.mean;
        self.mean += delta / self.failures as f64;
        self.m2 += delta * (time - self.mean);
        self.min = self.min.min(time);
        self.max = self.max.max(time);

        self.histogram
            .record((time * HISTOGRAM_SCALE).round() as u64)
            .map_err(|e| SimulatorError::Metrics(e.to_string()))
    }

    /// Produce the final report.
    pub fn finish(&self) -> ReplicationReport {
        let time_to_failure = (self.failures > 0).then(|| {
            let quantile = |q: f64| self.histogram.value_at_quantile(q) as f64 / HISTOGRAM_SCALE;
            let variance = if self.failures > 1 {
                self.m2 / (self.failures - 1) as f64
            } else {
                0.0
            };
            FailureStats {
                mean: self.mean,
                std_dev: variance.sqrt(),
                min: self.min,
                max: self.max,
                p50: quantile(0.5),
                p90: quantile(0.9),
                p99: quantile(0.99),
            }
        });

        ReplicationReport {
            replications: self.replications,
            failures: self.failures,
            censored: self.replications - self.failures,
            mean_events: if self.replications > 0 {
                self.total_events as f64 / self.replications as f64
            } else {
                0.0
            },
            time_to_failure,
        }
    }
}
