//! Simulation driver, per-tick state and run configuration
//!
//! A run is set up once with [`FireSimulation::new`] and then advanced tick
//! by tick. Each tick:
//!
//! 1. Asks the climate provider for the tick's climate
//! 2. Picks `dt` (fixed, or CFL-bounded from the fastest burning cell)
//! 3. Lets the update scheduler build the next grid through the rule engine
//! 4. Recomputes metrics and percolation on the new grid
//!
//! # Example
//!
//! ```rust,ignore
//! use wildfire_core::{Climate, FireSimulation, Grid, SimulationConfig, Terrain};
//!
//! let config = SimulationConfig::default().with_seed(42);
//! let mut sim = FireSimulation::new(config, grid, terrain, Climate::default())?;
//! let last = sim.run_until(|state| state.metrics.percolates)?;
//! ```

pub mod config;
pub mod engine;
pub mod events;
pub mod state;
pub mod time_step;

pub use config::{SimulationConfig, TimeStepConfig};
pub use engine::{FireSimulation, Trajectory};
pub use events::{ExtinctionCause, FireEvent, IgnitionCause, RecoveryCause};
pub use state::SimulationState;
pub use time_step::{StepSize, TimeStepper};
