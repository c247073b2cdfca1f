//! Run configuration
//!
//! Plain data with defaults; loading it from files is left to the caller
//! (every type derives `serde`). [`SimulationConfig::validate`] runs before
//! any tick so a bad configuration never produces a partial trajectory.

use crate::error::{FireSimError, Result};
use crate::grid::BoundaryCondition;
use crate::metrics::MetricsConfig;
use crate::physics::FireDynamicsParams;
use crate::rules::RulesConfig;
use crate::solver::UpdateStrategy;
use serde::{Deserialize, Serialize};

/// Step length policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeStepConfig {
    /// Fixed step when not adaptive (s)
    pub time_step: f32,
    /// Lower bound of adaptive steps (s)
    pub min_time_step: f32,
    /// Upper bound of adaptive steps, used when nothing burns (s)
    pub max_time_step: f32,
    /// Pick each step from the CFL bound
    pub adaptive: bool,
    /// Fraction of a cell the fastest front may cross per step, in (0, 1]
    pub cfl_number: f32,
}

impl Default for TimeStepConfig {
    fn default() -> Self {
        Self {
            time_step: 1.0,
            min_time_step: 0.1,
            max_time_step: 10.0,
            adaptive: false,
            cfl_number: 0.5,
        }
    }
}

/// Everything that parameterizes one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Maximum number of ticks
    pub max_steps: u64,
    /// Maximum simulated time (s)
    pub max_time: f32,
    pub time: TimeStepConfig,
    pub boundary_condition: BoundaryCondition,
    pub update_strategy: UpdateStrategy,
    /// Global seed; drawn from entropy and logged when absent
    pub random_seed: Option<u64>,
    /// Size of a dedicated worker pool; the global rayon pool when absent
    pub worker_threads: Option<usize>,
    pub rules: RulesConfig,
    pub dynamics: FireDynamicsParams,
    pub metrics: MetricsConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_steps: 1000,
            max_time: 3600.0,
            time: TimeStepConfig::default(),
            boundary_condition: BoundaryCondition::default(),
            update_strategy: UpdateStrategy::default(),
            random_seed: None,
            worker_threads: None,
            rules: RulesConfig::default(),
            dynamics: FireDynamicsParams::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Set the seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Check every field before a run.
    ///
    /// # Errors
    ///
    /// Returns [`FireSimError::InvalidConfig`] for non-positive limits or
    /// steps, `min_time_step > max_time_step`, a CFL number outside (0, 1],
    /// zero worker threads, and anything rejected by the nested configs.
    pub fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(FireSimError::invalid_config("max_steps", "must be positive"));
        }
        if !self.max_time.is_finite() || self.max_time <= 0.0 {
            return Err(FireSimError::invalid_config(
                "max_time",
                format!("must be positive and finite, got {}", self.max_time),
            ));
        }

        let time = &self.time;
        for (field, value) in [
            ("time.time_step", time.time_step),
            ("time.min_time_step", time.min_time_step),
            ("time.max_time_step", time.max_time_step),
            ("time.cfl_number", time.cfl_number),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FireSimError::invalid_config(
                    field,
                    format!("must be positive, got {value}"),
                ));
            }
        }
        if time.cfl_number > 1.0 {
            return Err(FireSimError::invalid_config(
                "time.cfl_number",
                format!(
                    "must be at most 1 so a front crosses at most one cell per step, got {}",
                    time.cfl_number
                ),
            ));
        }
        if time.min_time_step > time.max_time_step {
            return Err(FireSimError::invalid_config(
                "time.min_time_step",
                format!(
                    "{} exceeds max_time_step {}",
                    time.min_time_step, time.max_time_step
                ),
            ));
        }

        if self.worker_threads == Some(0) {
            return Err(FireSimError::invalid_config(
                "worker_threads",
                "must be positive when set",
            ));
        }

        self.update_strategy.validate()?;
        self.rules.validate()?;
        self.dynamics.validate()?;
        self.metrics.validate()
    }
}
