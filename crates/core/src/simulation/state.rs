//! Immutable per-tick snapshot

use super::events::FireEvent;
use crate::core_types::Climate;
use crate::grid::{Grid, Terrain};
use crate::metrics::SimulationMetrics;
use std::sync::Arc;

/// State of the run after a tick.
///
/// Produced once per tick and never mutated afterwards. Grid and terrain are
/// shared through `Arc`, so keeping a whole trajectory in memory only costs
/// one grid buffer per tick.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub grid: Arc<Grid>,
    /// Climate the tick ran under
    pub climate: Climate,
    pub terrain: Arc<Terrain>,
    /// Length of the tick that produced this state (s), 0 for the initial state
    pub time_step: f32,
    /// Simulated time since the start of the run (s)
    pub elapsed_time: f32,
    /// Number of ticks completed
    pub step: u64,
    pub metrics: SimulationMetrics,
    /// Transition events of the tick that produced this state
    pub event_log: Vec<FireEvent>,
}

impl SimulationState {
    /// Number of ignitions recorded this tick
    #[must_use]
    pub fn ignitions(&self) -> usize {
        self.event_log.iter().filter(|e| e.is_ignition()).count()
    }

    /// Nothing is burning any more
    #[must_use]
    pub fn is_extinguished(&self) -> bool {
        self.metrics.active_fires == 0
    }
}
