//! Repair-queue state machine.
//!
//! Tracks how many units are down, whether the single repair server is busy,
//! and how many down units wait for it. Each event either starts a repair or
//! queues one, and may schedule follow-up events.
//!
//! # Invariants
//!
//! After every processed event:
//!
//! - `repair_queue_len == down - (1 if the server is busy else 0)`
//! - an idle server has no completion time and no backlog, so `down == 0`
//!
//! The server's busy flag and its completion time are a single
//! `Option<SimTime>`, so "busy without a completion time" is unrepresentable.

use crate::{Clocks, SimulationError, TimeGenerator};
use repairsim_types::{Event, EventKind, SimTime, Snapshot};
use tracing::debug;

/// Counters of the machine population for one run.
///
/// Only aggregate counts are tracked. Breakdown clocks are re-armed from the
/// total `down` counter, not per unit, and waiting units are not
/// individually identified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepairState {
    now: SimTime,
    down: usize,
    repair_queue_len: usize,
    next_repair_completion: Option<SimTime>,
}

impl RepairState {
    /// Create an idle state at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the current time.
    ///
    /// Called by the runner before each `handle()` call.
    pub fn set_time(&mut self, now: SimTime) {
        debug_assert!(
            now >= self.now,
            "Time went backwards: {} < {}",
            now,
            self.now
        );
        self.now = now;
    }

    /// Current simulated time.
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Units currently failed, waiting or in service.
    pub fn down(&self) -> usize {
        self.down
    }

    /// Failed units waiting for the repair server.
    pub fn repair_queue_len(&self) -> usize {
        self.repair_queue_len
    }

    /// Whether the repair server is busy.
    pub fn repair_in_progress(&self) -> bool {
        self.next_repair_completion.is_some()
    }

    /// Completion time of the unit in service, if any.
    pub fn next_repair_completion(&self) -> Option<SimTime> {
        self.next_repair_completion
    }

    /// Whether more units are down than there are spares.
    pub fn has_failed(&self, n_spares: usize) -> bool {
        self.down > n_spares
    }

    /// Capture the observable state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.now,
            down: self.down,
            repair_queue_len: self.repair_queue_len,
            next_repair_completion: self.next_repair_completion,
        }
    }

    /// Apply an event at the current time, returning the events to schedule.
    ///
    /// Durations are drawn from `clocks` in a fixed order: breakdown re-arm
    /// first, then repair start.
    pub fn handle<B, R>(
        &mut self,
        kind: EventKind,
        n_spares: usize,
        clocks: &mut Clocks<B, R>,
    ) -> Result<Vec<Event>, SimulationError>
    where
        B: TimeGenerator,
        R: TimeGenerator,
    {
        match kind {
            EventKind::Breakdown => self.on_breakdown(n_spares, clocks),
            EventKind::RepairComplete => self.on_repair_complete(clocks),
        }
    }

    fn on_breakdown<B, R>(
        &mut self,
        n_spares: usize,
        clocks: &mut Clocks<B, R>,
    ) -> Result<Vec<Event>, SimulationError>
    where
        B: TimeGenerator,
        R: TimeGenerator,
    {
        let mut scheduled = Vec::with_capacity(2);
        self.down += 1;

        // A spare takes the failed unit's place and starts its own clock.
        if self.down <= n_spares {
            scheduled.push(Event::breakdown(clocks.next_breakdown(self.now)?));
        }

        if self.repair_in_progress() {
            self.repair_queue_len += 1;
        } else {
            scheduled.push(self.start_repair(clocks)?);
        }

        Ok(scheduled)
    }

    fn on_repair_complete<B, R>(
        &mut self,
        clocks: &mut Clocks<B, R>,
    ) -> Result<Vec<Event>, SimulationError>
    where
        B: TimeGenerator,
        R: TimeGenerator,
    {
        if !self.repair_in_progress() || self.down == 0 {
            return Err(SimulationError::NoUnitInService { time: self.now });
        }
        self.down -= 1;

        if self.repair_queue_len > 0 {
            self.repair_queue_len -= 1;
            Ok(vec![self.start_repair(clocks)?])
        } else {
            self.next_repair_completion = None;
            debug!(time = self.now, "Repair server idle");
            Ok(vec![])
        }
    }

    fn start_repair<B, R>(&mut self, clocks: &mut Clocks<B, R>) -> Result<Event, SimulationError>
    where
        B: TimeGenerator,
        R: TimeGenerator,
    {
        let completion = clocks.next_repair(self.now)?;
        self.next_repair_completion = Some(completion);
        debug!(
            time = self.now,
            completion,
            waiting = self.repair_queue_len,
            "Repair started"
        );
        Ok(Event::repair_complete(completion))
    }
}
