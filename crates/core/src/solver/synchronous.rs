//! Synchronous (double-buffered) update
//!
//! Every cell reads the same snapshot, so the result does not depend on the
//! order cells are processed in and the pass parallelizes freely.

use super::r#trait::{SchedulerOutput, UpdateScheduler};
use crate::core_types::Cell;
use crate::error::Result;
use crate::grid::Grid;
use crate::rules::{CellUpdate, RuleContext, RuleEngine};
use crate::simulation::events::FireEvent;
use rayon::prelude::*;

/// Evaluate `cells` against `ctx` in parallel and return the updates in
/// input order. The first error in input order wins, independent of which
/// thread hit it first.
pub(crate) fn evaluate_parallel(
    engine: &RuleEngine,
    ctx: &RuleContext<'_>,
    cells: &[Cell],
) -> Result<Vec<CellUpdate>> {
    let results: Vec<Result<CellUpdate>> = cells
        .par_iter()
        .map(|cell| engine.evaluate(cell, ctx))
        .collect();
    results.into_iter().collect()
}

/// All cells computed from a read-only snapshot, committed at once
#[derive(Debug, Clone, Copy, Default)]
pub struct SynchronousScheduler;

impl UpdateScheduler for SynchronousScheduler {
    fn advance(&self, engine: &RuleEngine, ctx: &RuleContext<'_>) -> Result<SchedulerOutput> {
        let snapshot = ctx.grid;
        let updates = evaluate_parallel(engine, ctx, snapshot.cells())?;

        let mut events: Vec<FireEvent> = Vec::new();
        let cells = updates
            .into_iter()
            .map(|update| {
                events.extend(update.event);
                update.cell
            })
            .collect();

        Ok(SchedulerOutput {
            grid: Grid::from_cells_unchecked(snapshot.width(), snapshot.height(), cells),
            events,
        })
    }

    fn name(&self) -> &'static str {
        "synchronous"
    }

    fn is_parallel(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{CellRng, CellState, Position, VegetationType};
    use crate::error::FireSimError;
    use crate::grid::BoundaryCondition;
    use crate::rules::scene::{burning_columns, spread_only, Scene};
    use crate::rules::{Rule, RuleCategory, RuleOutcome};
    use crate::simulation::events::IgnitionCause;

    #[test]
    fn test_front_advances_one_cell_per_tick() {
        let scene = Scene::row(6, 0);
        let output = SynchronousScheduler
            .advance(&spread_only(), &scene.ctx())
            .expect("legal");
        assert_eq!(burning_columns(&output.grid), vec![0, 1]);
        assert_eq!(
            output.events,
            vec![FireEvent::Ignition {
                position: Position::new(1, 0),
                cause: IgnitionCause::NeighborSpread,
            }]
        );
        // The snapshot itself is never written
        assert_eq!(burning_columns(&scene.grid), vec![0]);
    }

    #[test]
    fn test_direction_does_not_matter() {
        let scene = Scene::row(6, 5);
        let output = SynchronousScheduler
            .advance(&spread_only(), &scene.ctx())
            .expect("legal");
        assert_eq!(burning_columns(&output.grid), vec![4, 5]);

        let scene = Scene::row(7, 3);
        let output = SynchronousScheduler
            .advance(&spread_only(), &scene.ctx())
            .expect("legal");
        assert_eq!(burning_columns(&output.grid), vec![2, 3, 4]);
        let ignited: Vec<_> = output
            .events
            .iter()
            .map(|event| match event {
                FireEvent::Ignition { position, .. } => position.x,
                other => panic!("unexpected event {other:?}"),
            })
            .collect();
        assert_eq!(ignited, vec![2, 4], "events in row-major order");
    }

    /// Sets empty ground on fire
    #[derive(Debug)]
    struct Firestarter;

    impl Rule for Firestarter {
        fn name(&self) -> &'static str {
            "firestarter"
        }

        fn category(&self) -> RuleCategory {
            RuleCategory::Ignition
        }

        fn apply(&self, cell: &Cell, _ctx: &RuleContext<'_>, _rng: &mut CellRng) -> Option<RuleOutcome> {
            (cell.state == CellState::Empty).then(|| {
                let mut next = *cell;
                next.state = CellState::Burning;
                RuleOutcome::update(next)
            })
        }
    }

    #[test]
    fn test_first_error_in_row_major_order_wins() {
        // Only the last row is empty ground
        let grid = Grid::from_fn(16, 16, |pos| {
            let state = if pos.y == 15 { CellState::Empty } else { CellState::Tree };
            Cell::new(pos, state, VegetationType::Grassland, 0.0, 0.1, 20.0)
        })
        .expect("valid grid");
        let scene = Scene::new(grid, BoundaryCondition::Absorbing);
        let engine = RuleEngine::new(vec![Box::new(Firestarter)]);
        for _ in 0..4 {
            let err = SynchronousScheduler.advance(&engine, &scene.ctx()).unwrap_err();
            assert!(
                matches!(err, FireSimError::IllegalTransition { position, .. } if position == Position::new(0, 15)),
                "{err}"
            );
        }
    }
}
