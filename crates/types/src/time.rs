//! Simulated time.

/// Simulated time in arbitrary units (hours, days, ...), measured from the
/// start of a run.
pub type SimTime = f64;

/// Check whether a value is usable as a duration or timestamp.
///
/// Negative, NaN and infinite values would corrupt the time order of the
/// event queue, so they are rejected everywhere a time enters the engine.
pub fn is_valid_duration(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
