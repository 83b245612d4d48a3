//! Random-variate generators for breakdown and repair times.

use crate::SimulatorError;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp, Uniform};
use repairsim_simulation::TimeGenerator;
use repairsim_types::is_valid_duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distribution of a duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeDistribution {
    /// Always the same value.
    Fixed {
        /// The duration.
        value: f64,
    },

    /// Exponentially distributed (memoryless failures and repairs).
    Exponential {
        /// Mean duration (the inverse of the rate).
        mean: f64,
    },

    /// Uniform on `[low, high)`.
    Uniform {
        /// Lower bound, inclusive.
        low: f64,
        /// Upper bound, exclusive.
        high: f64,
    },
}

impl TimeDistribution {
    /// Check that the parameters describe a non-negative, finite duration.
    pub fn validate(&self) -> Result<(), SimulatorError> {
        let ok = match *self {
            TimeDistribution::Fixed { value } => is_valid_duration(value),
            TimeDistribution::Exponential { mean } => mean.is_finite() && mean > 0.0,
            TimeDistribution::Uniform { low, high } => {
                is_valid_duration(low) && is_valid_duration(high) && low < high
            }
        };
        if ok {
            Ok(())
        } else {
            Err(SimulatorError::InvalidDistribution(self.to_string()))
        }
    }

    /// Expected value of the distribution.
    pub fn mean(&self) -> f64 {
        match *self {
            TimeDistribution::Fixed { value } => value,
            TimeDistribution::Exponential { mean } => mean,
            TimeDistribution::Uniform { low, high } => (low + high) / 2.0,
        }
    }

    /// Build a sampler drawing from `stream` of the ChaCha generator seeded
    /// with `seed`.
    ///
    /// Distinct streams of the same seed are independent, so every
    /// generator of every replication gets its own.
    pub fn sampler(&self, seed: u64, stream: u64) -> Result<DistributionSampler, SimulatorError> {
        self.validate()?;
        let shape = match *self {
            TimeDistribution::Fixed { value } => Shape::Fixed(value),
            TimeDistribution::Exponential { mean } => Shape::Exponential(
                Exp::new(1.0 / mean)
                    .map_err(|e| SimulatorError::InvalidDistribution(e.to_string()))?,
            ),
            TimeDistribution::Uniform { low, high } => Shape::Uniform(Uniform::new(low, high)),
        };

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Ok(DistributionSampler { shape, rng })
    }
}

impl Default for TimeDistribution {
    fn default() -> Self {
        TimeDistribution::Exponential { mean: 1.0 }
    }
}

impl fmt::Display for TimeDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeDistribution::Fixed { value } => write!(f, "fixed:{}", value),
            TimeDistribution::Exponential { mean } => write!(f, "exp:{}", mean),
            TimeDistribution::Uniform { low, high } => write!(f, "uniform:{}:{}", low, high),
        }
    }
}

/// Parses `fixed:<value>`, `exp:<mean>` or `uniform:<low>:<high>`.
impl FromStr for TimeDistribution {
    type Err = SimulatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SimulatorError::InvalidDistribution(s.to_string());
        let parse = |v: &str| v.trim().parse::<f64>().map_err(|_| invalid());

        let parts: Vec<&str> = s.split(':').collect();
        let dist = match parts.as_slice() {
            [kind, value] if kind.eq_ignore_ascii_case("fixed") => TimeDistribution::Fixed {
                value: parse(value)?,
            },
            [kind, mean] if kind.eq_ignore_ascii_case("exp") => TimeDistribution::Exponential {
                mean: parse(mean)?,
            },
            [kind, low, high] if kind.eq_ignore_ascii_case("uniform") => {
                TimeDistribution::Uniform {
                    low: parse(low)?,
                    high: parse(high)?,
                }
            }
            _ => return Err(invalid()),
        };

        dist.validate()?;
        Ok(dist)
    }
}

#[derive(Debug, Clone)]
enum Shape {
    Fixed(f64),
    Exponential(Exp<f64>),
    Uniform(Uniform<f64>),
}

/// A seeded generator for one [`TimeDistribution`].
#[derive(Debug, Clone)]
pub struct DistributionSampler {
    shape: Shape,
    rng: ChaCha8Rng,
}

impl TimeGenerator for DistributionSampler {
    fn sample(&mut self) -> f64 {
        match &self.shape {
            Shape::Fixed(value) => *value,
            Shape::Exponential(exp) => exp.sample(&mut self.rng),
            Shape::Uniform(uniform) => uniform.sample(&mut self.rng),
        }
    }
}
