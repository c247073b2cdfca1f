//! Update scheduler trait definition

use crate::error::Result;
use crate::grid::Grid;
use crate::rules::{RuleContext, RuleEngine};
use crate::simulation::events::FireEvent;

/// Next grid produced by one scheduler pass
#[derive(Debug, Clone)]
pub struct SchedulerOutput {
    /// Freshly built grid for the next state
    pub grid: Grid,
    /// Transition events in processing order
    pub events: Vec<FireEvent>,
}

/// Strategy for visiting cells within one tick
///
/// Schedulers never mutate the grid they are given; they assemble a new
/// buffer and hand it back with the tick's events.
pub trait UpdateScheduler: Send + Sync {
    /// Advance every cell by one tick
    ///
    /// # Arguments
    ///
    /// * `engine` - Rule engine computing each cell's next contents
    /// * `ctx` - Tick context; `ctx.grid` is the grid at the start of the tick
    ///
    /// # Returns
    ///
    /// The new grid and the events emitted while building it
    ///
    /// # Errors
    ///
    /// Propagates the first rule error in processing order.
    fn advance(&self, engine: &RuleEngine, ctx: &RuleContext<'_>) -> Result<SchedulerOutput>;

    /// Strategy name for logging
    fn name(&self) -> &'static str;

    /// Whether cells are evaluated on the rayon pool
    fn is_parallel(&self) -> bool;
}
