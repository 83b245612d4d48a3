//! Simulation driver.
//!
//! Seeds one breakdown per operating unit, then repeatedly pops the earliest
//! event, hands it to the [`RepairState`], schedules whatever comes back and
//! records a snapshot, until more units are down than there are spares.

use crate::{
    Clocks, EventQueue, RepairConfig, RepairState, SimulationError, SnapshotRecorder,
    TimeGenerator,
};
use repairsim_types::{Event, SimTime, Snapshot};
use tracing::{debug, trace};

/// Result of processing a single event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// The system is still running.
    Continue,

    /// The system failed at the given time. No further events are processed.
    SystemFailure(SimTime),

    /// The next event lay beyond the configured horizon and was discarded.
    HorizonReached(SimTime),
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// More units were down than there are spares.
    SystemFailure,

    /// The horizon passed before the system failed.
    HorizonReached,
}

/// Everything a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// How the run ended.
    pub outcome: RunOutcome,

    /// Failure time, or the horizon for a censored run.
    pub end_time: SimTime,

    /// Events processed, including the one that caused failure.
    pub events_processed: u64,

    /// Snapshot log. Empty unless `capture_states` was enabled.
    pub snapshots: Vec<Snapshot>,
}

impl RunReport {
    /// Elapsed time to system failure, if the system failed.
    pub fn failure_time(&self) -> Option<SimTime> {
        match self.outcome {
            RunOutcome::SystemFailure => Some(self.end_time),
            RunOutcome::HorizonReached => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    NotStarted,
    Running,
    Terminated(StepOutcome),
    Failed(SimulationError),
}

/// One run of the machine-repair system.
///
/// An instance is single-use: [`run`](Self::run) consumes it, and once
/// [`step`](Self::step) has reported termination it processes nothing more.
pub struct RepairSimulation<B, R> {
    config: RepairConfig,
    clocks: Clocks<B, R>,
    queue: EventQueue,
    state: RepairState,
    recorder: SnapshotRecorder,
    phase: Phase,
    events_processed: u64,
}

impl<B: TimeGenerator, R: TimeGenerator> RepairSimulation<B, R> {
    /// Create a simulation from a validated configuration and the two
    /// time generators.
    pub fn new(
        config: RepairConfig,
        time_to_breakdown: B,
        time_to_repair: R,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let recorder = SnapshotRecorder::new(config.capture_states);

        Ok(Self {
            config,
            clocks: Clocks::new(time_to_breakdown, time_to_repair),
            queue: EventQueue::new(),
            state: RepairState::new(),
            recorder,
            phase: Phase::NotStarted,
            events_processed: 0,
        })
    }

    /// The run's configuration.
    pub fn config(&self) -> &RepairConfig {
        &self.config
    }

    /// Current repair state.
    pub fn state(&self) -> &RepairState {
        &self.state
    }

    /// Snapshots recorded so far.
    pub fn snapshots(&self) -> &[Snapshot] {
        self.recorder.snapshots()
    }

    /// Events processed so far.
    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Events still waiting in the queue.
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Whether the run has ended, normally or with an error.
    pub fn is_terminated(&self) -> bool {
        matches!(self.phase, Phase::Terminated(_) | Phase::Failed(_))
    }

    /// Run until the system fails, or until the configured horizon.
    pub fn run(mut self) -> Result<RunReport, SimulationError> {
        let (outcome, end_time) = loop {
            match self.step()? {
                StepOutcome::Continue => {}
                StepOutcome::SystemFailure(time) => break (RunOutcome::SystemFailure, time),
                StepOutcome::HorizonReached(time) => break (RunOutcome::HorizonReached, time),
            }
        };

        Ok(RunReport {
            outcome,
            end_time,
            events_processed: self.events_processed,
            snapshots: self.recorder.into_snapshots(),
        })
    }

    /// Run until the system fails or the next event lies beyond `horizon`.
    pub fn run_until(mut self, horizon: SimTime) -> Result<RunReport, SimulationError> {
        self.config.horizon = Some(horizon);
        self.config.validate()?;
        self.run()
    }

    /// Process the next event.
    ///
    /// The first call seeds the initial breakdowns. After the run has
    /// terminated, further calls return the terminal outcome again without
    /// touching the queue. Any error is fatal: the state may be half
    /// updated, so every later call returns the same error.
    pub fn step(&mut self) -> Result<StepOutcome, SimulationError> {
        match &self.phase {
            Phase::Terminated(outcome) => return Ok(*outcome),
            Phase::Failed(err) => return Err(err.clone()),
            Phase::NotStarted | Phase::Running => {}
        }

        let result = self.advance();
        if let Err(err) = &result {
            debug!(error = %err, "Run aborted");
            self.phase = Phase::Failed(err.clone());
        }
        result
    }

    fn advance(&mut self) -> Result<StepOutcome, SimulationError> {
        if self.phase == Phase::NotStarted {
            self.seed()?;
        }

        let event = self
            .queue
            .pop_min()
            .ok_or(SimulationError::EventQueueExhausted {
                time: self.state.now(),
            })?;

        if let Some(horizon) = self.config.horizon {
            if event.time > horizon {
                debug!(
                    horizon,
                    events = self.events_processed,
                    down = self.state.down(),
                    "Horizon reached before system failure"
                );
                return Ok(self.terminate(StepOutcome::HorizonReached(horizon)));
            }
        }

        self.process(event)?;

        if self.state.has_failed(self.config.n_spares) {
            let time = self.state.now();
            debug!(
                time,
                events = self.events_processed,
                down = self.state.down(),
                n_spares = self.config.n_spares,
                "System failed: spares exhausted"
            );
            return Ok(self.terminate(StepOutcome::SystemFailure(time)));
        }

        Ok(StepOutcome::Continue)
    }

    fn seed(&mut self) -> Result<(), SimulationError> {
        for _ in 0..self.config.n_operating {
            let at = self.clocks.next_breakdown(0.0)?;
            self.queue.push(Event::breakdown(at));
        }
        debug!(
            n_operating = self.config.n_operating,
            n_spares = self.config.n_spares,
            "Seeded initial breakdowns"
        );

        self.recorder.record(&self.state);
        self.phase = Phase::Running;
        Ok(())
    }

    fn process(&mut self, event: Event) -> Result<(), SimulationError> {
        self.state.set_time(event.time);
        let scheduled = self
            .state
            .handle(event.kind, self.config.n_spares, &mut self.clocks)?;
        for next in scheduled {
            self.queue.push(next);
        }
        self.events_processed += 1;

        trace!(
            time = event.time,
            kind = event.kind.type_name(),
            down = self.state.down(),
            waiting = self.state.repair_queue_len(),
            "Processed event"
        );

        self.recorder.record(&self.state);
        Ok(())
    }

    fn terminate(&mut self, outcome: StepOutcome) -> StepOutcome {
        self.phase = Phase::Terminated(outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DrawSource;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_zero_spares_fails_at_first_breakdown() {
        let config = RepairConfig::new(1, 0).with_capture_states(true);
        let sim = RepairSimulation::new(config, || 7.5, || 1.0).unwrap();

        let report = sim.run().unwrap();

        assert_eq!(report.outcome, RunOutcome::SystemFailure);
        assert_eq!(report.failure_time(), Some(7.5));
        assert_eq!(report.events_processed, 1);
        assert_eq!(report.snapshots.len(), 2);
        assert_eq!(report.snapshots[1].down, 1);
        assert!(logs_contain("System failed"));
    }

    #[test]
    fn test_recording_disabled_leaves_log_empty() {
        let config = RepairConfig::new(2, 1);
        let sim = RepairSimulation::new(config, || 1.0, || 3.0).unwrap();

        let report = sim.run().unwrap();

        assert!(report.snapshots.is_empty());
        assert!(report.events_processed > 0);
    }

    #[test]
    fn test_initial_snapshot_is_idle_at_time_zero() {
        let config = RepairConfig::new(2, 1).with_capture_states(true);
        let mut sim = RepairSimulation::new(config, || 1.0, || 3.0).unwrap();

        assert_eq!(sim.pending_events(), 0);
        sim.step().unwrap();

        let first = sim.snapshots()[0];
        assert_eq!(first.time, 0.0);
        assert_eq!(first.down, 0);
        assert_eq!(first.repair_queue_len, 0);
        assert_eq!(first.next_repair_completion, None);
    }

    #[test]
    fn test_step_after_termination_processes_nothing() {
        let config = RepairConfig::new(3, 0);
        let mut sim = RepairSimulation::new(config, || 2.0, || 1.0).unwrap();

        assert_eq!(sim.step().unwrap(), StepOutcome::SystemFailure(2.0));
        assert!(sim.is_terminated());
        let pending = sim.pending_events();
        assert!(pending > 0);

        assert_eq!(sim.step().unwrap(), StepOutcome::SystemFailure(2.0));
        assert_eq!(sim.events_processed(), 1);
        assert_eq!(sim.pending_events(), pending);
    }

    #[test]
    fn test_failed_draw_ends_the_run() {
        let mut repairs = vec![1.0, -1.0].into_iter();
        let config = RepairConfig::new(2, 5);
        let mut sim =
            RepairSimulation::new(config, || 1.0, move || repairs.next().unwrap_or(5.0)).unwrap();

        let err = loop {
            match sim.step() {
                Ok(StepOutcome::Continue) => {}
                Ok(outcome) => panic!("run ended without the bad draw: {outcome:?}"),
                Err(err) => break err,
            }
        };
        assert_eq!(
            err,
            SimulationError::InvalidDraw {
                generator: DrawSource::Repair,
                value: -1.0,
            }
        );
        assert!(sim.is_terminated());

        let processed = sim.events_processed();
        let pending = sim.pending_events();
        let state = sim.state().clone();
        for _ in 0..3 {
            assert_eq!(sim.step(), Err(err.clone()));
        }
        assert_eq!(sim.events_processed(), processed);
        assert_eq!(sim.pending_events(), pending);
        assert_eq!(sim.state(), &state);
    }

    #[test]
    fn test_failed_seed_is_not_retried() {
        let mut breakdowns = vec![1.0, -1.0].into_iter();
        let config = RepairConfig::new(3, 1);
        let mut sim =
            RepairSimulation::new(config, move || breakdowns.next().unwrap_or(1.0), || 1.0)
                .unwrap();

        let err = sim.step().unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidDraw {
                generator: DrawSource::Breakdown,
                ..
            }
        ));
        assert_eq!(sim.pending_events(), 1);

        assert_eq!(sim.step(), Err(err));
        assert_eq!(sim.pending_events(), 1);
        assert_eq!(sim.events_processed(), 0);
    }

    #[traced_test]
    #[test]
    fn test_empty_queue_is_fatal() {
        let config = RepairConfig::new(1, 3);
        let mut sim = RepairSimulation::new(config, || 2.0, || 1.0).unwrap();

        assert_eq!(sim.step().unwrap(), StepOutcome::Continue);
        sim.queue = EventQueue::new();

        let err = sim.step().unwrap_err();
        assert_eq!(err, SimulationError::EventQueueExhausted { time: 2.0 });
        assert!(sim.is_terminated());
        assert_eq!(sim.step(), Err(err));
        assert!(logs_contain("Run aborted"));
    }

    #[test]
    fn test_zero_operating_rejected_at_construction() {
        let result = RepairSimulation::new(RepairConfig::new(0, 3), || 1.0, || 1.0);
        assert!(matches!(
            result,
            Err(SimulationError::Config(crate::ConfigError::NoOperatingUnits))
        ));
    }

    #[test]
    fn test_invalid_seed_draw_fails_fast() {
        let sim = RepairSimulation::new(RepairConfig::new(2, 1), || -3.0, || 1.0).unwrap();
        assert_eq!(
            sim.run().unwrap_err(),
            SimulationError::InvalidDraw {
                generator: DrawSource::Breakdown,
                value: -3.0,
            }
        );
    }

    #[test]
    fn test_horizon_censors_run() {
        let config = RepairConfig::new(1, 2).with_capture_states(true);
        let sim = RepairSimulation::new(config, || 10.0, || 1.0).unwrap();

        let report = sim.run_until(55.0).unwrap();

        assert_eq!(report.outcome, RunOutcome::HorizonReached);
        assert_eq!(report.end_time, 55.0);
        assert_eq!(report.failure_time(), None);
        // Breakdowns at 10..=50 and their repairs at 11..=51.
        assert_eq!(report.events_processed, 10);
        assert!(report.snapshots.iter().all(|s| s.time <= 55.0));
    }

    #[test]
    fn test_run_until_rejects_bad_horizon() {
        let sim = RepairSimulation::new(RepairConfig::new(1, 1), || 1.0, || 1.0).unwrap();
        assert!(matches!(
            sim.run_until(f64::INFINITY),
            Err(SimulationError::Config(_))
        ));
    }
}
