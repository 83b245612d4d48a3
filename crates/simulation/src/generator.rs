//! Time generators and draw validation.

use crate::{DrawSource, SimulationError};
use repairsim_types::{is_valid_duration, SimTime};

/// A zero-argument producer of non-negative durations.
///
/// Implemented for every `FnMut() -> f64`, so closures capturing an RNG,
/// stateful samplers and constant stubs can all be used directly.
pub trait TimeGenerator {
    /// Draw the next duration.
    fn sample(&mut self) -> f64;
}

impl<F> TimeGenerator for F
where
    F: FnMut() -> f64,
{
    fn sample(&mut self) -> f64 {
        self()
    }
}

/// The pair of time generators owned by one run.
///
/// Every draw is checked before it can reach the event queue: a negative,
/// NaN or infinite duration fails the run immediately instead of being
/// clamped.
pub struct Clocks<B, R> {
    time_to_breakdown: B,
    time_to_repair: R,
}

impl<B: TimeGenerator, R: TimeGenerator> Clocks<B, R> {
    /// Create clocks from a breakdown and a repair generator.
    pub fn new(time_to_breakdown: B, time_to_repair: R) -> Self {
        Self {
            time_to_breakdown,
            time_to_repair,
        }
    }

    /// Absolute time of the next breakdown of a unit installed at `now`.
    pub fn next_breakdown(&mut self, now: SimTime) -> Result<SimTime, SimulationError> {
        let delay = checked(DrawSource::Breakdown, self.time_to_breakdown.sample())?;
        Ok(now + delay)
    }

    /// Absolute completion time of a repair started at `now`.
    pub fn next_repair(&mut self, now: SimTime) -> Result<SimTime, SimulationError> {
        let delay = checked(DrawSource::Repair, self.time_to_repair.sample())?;
        Ok(now + delay)
    }
}

fn checked(generator: DrawSource, value: f64) -> Result<f64, SimulationError> {
    if is_valid_duration(value) {
        Ok(value)
    } else {
        Err(SimulationError::InvalidDraw { generator, value })
    }
}
