//! Adaptive time stepping
//!
//! With adaptive stepping the step is bounded by the CFL condition
//!
//! ```text
//! dt = cfl × cell_size / max_spread_rate
//! ```
//!
//! so the fastest front crosses at most a fraction of a cell per tick. The
//! result is clamped to `[min_time_step, max_time_step]`, and the last step
//! is truncated to land exactly on `max_time`.

use super::config::TimeStepConfig;

/// Chosen step for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSize {
    /// Step length (s)
    pub dt: f32,
    /// Shortened to hit `max_time` exactly
    pub truncated: bool,
    /// Elapsed time after the step (s)
    pub end_time: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeStepper {
    config: TimeStepConfig,
    cell_size: f32,
    max_time: f32,
}

impl TimeStepper {
    /// # Arguments
    ///
    /// * `config` - Validated step policy
    /// * `cell_size` - Cell size (m)
    /// * `max_time` - End of the run (s)
    #[must_use]
    pub fn new(config: TimeStepConfig, cell_size: f32, max_time: f32) -> Self {
        Self {
            config,
            cell_size,
            max_time,
        }
    }

    /// Untruncated step for the current spread rate
    ///
    /// # Arguments
    ///
    /// * `max_spread_rate` - Fastest spread rate over burning cells (m/s)
    #[must_use]
    pub fn nominal(&self, max_spread_rate: f32) -> f32 {
        let c = &self.config;
        if !c.adaptive {
            return c.time_step;
        }
        if !(max_spread_rate.is_finite() && max_spread_rate > 0.0) {
            return c.max_time_step;
        }
        let cfl = c.cfl_number * self.cell_size / max_spread_rate;
        if cfl.is_nan() {
            c.max_time_step
        } else {
            cfl.clamp(c.min_time_step, c.max_time_step)
        }
    }

    /// Step for a tick starting at `elapsed_time`, or `None` once the run
    /// has reached `max_time`
    #[must_use]
    pub fn next(&self, elapsed_time: f32, max_spread_rate: f32) -> Option<StepSize> {
        let remaining = self.max_time - elapsed_time;
        if remaining <= 0.0 {
            return None;
        }
        let dt = self.nominal(max_spread_rate);
        Some(if dt >= remaining {
            StepSize {
                dt: remaining,
                truncated: dt > remaining,
                end_time: self.max_time,
            }
        } else {
            StepSize {
                dt,
                truncated: false,
                end_time: elapsed_time + dt,
            }
        })
    }

    #[must_use]
    pub fn max_time(&self) -> f32 {
        self.max_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adaptive() -> TimeStepConfig {
        TimeStepConfig {
            adaptive: true,
            min_time_step: 0.5,
            max_time_step: 20.0,
            cfl_number: 0.5,
            ..TimeStepConfig::default()
        }
    }

    #[test]
    fn test_fixed_step() {
        let stepper = TimeStepper::new(TimeStepConfig::default(), 30.0, 100.0);
        assert_eq!(stepper.nominal(1000.0), 1.0);
    }

    #[test]
    fn test_cfl_bound_and_clamping() {
        let stepper = TimeStepper::new(adaptive(), 30.0, 1000.0);
        // 0.5 × 30 / 3 = 5 s
        assert!((stepper.nominal(3.0) - 5.0).abs() < 1e-6);
        assert_eq!(stepper.nominal(1.0e6), 0.5);
        assert_eq!(stepper.nominal(0.0), 20.0);
        assert_eq!(stepper.nominal(f32::NAN), 20.0);
    }

    #[test]
    fn test_final_step_truncated() {
        let stepper = TimeStepper::new(adaptive(), 30.0, 12.0);
        let step = stepper.next(10.0, 0.0).expect("time left");
        assert_eq!(step.dt, 2.0);
        assert!(step.truncated);
        assert_eq!(step.end_time, 12.0);
        assert!(stepper.next(12.0, 0.0).is_none());
    }
}
