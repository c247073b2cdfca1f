//! Small hand-built landscapes for rule and scheduler tests

use super::engine::RuleEngine;
use super::ignition::NeighborSpreadRule;
use super::rule::RuleContext;
use crate::core_types::{Cell, CellRng, CellState, Climate, Position, VegetationType};
use crate::grid::{BoundaryCondition, BoundaryTopology, Grid, Terrain};
use crate::physics::FireDynamicsParams;

/// Step long enough that any non-negligible per-reference probability
/// rescales to certainty
pub(crate) const CERTAIN_DT: f32 = 1.0e9;

/// Everything a [`RuleContext`] borrows, owned in one place
pub(crate) struct Scene {
    pub grid: Grid,
    pub topology: BoundaryTopology,
    pub terrain: Terrain,
    pub climate: Climate,
    pub params: FireDynamicsParams,
    pub dt: f32,
    pub tick: u64,
    pub seed: u64,
}

impl Scene {
    pub fn new(grid: Grid, boundary: BoundaryCondition) -> Self {
        let (w, h) = (grid.width(), grid.height());
        Self {
            topology: BoundaryTopology::new(boundary, w, h),
            terrain: Terrain::flat(w, h, 30.0, 0.0).expect("valid terrain"),
            grid,
            climate: Climate::default(),
            params: FireDynamicsParams::default(),
            dt: 1.0,
            tick: 0,
            seed: 42,
        }
    }

    /// Grassland trees, with the listed positions burning
    pub fn forest(width: usize, height: usize, burning: &[Position]) -> Self {
        let grid = Grid::from_fn(width, height, |pos| {
            let state = if burning.contains(&pos) {
                CellState::Burning
            } else {
                CellState::Tree
            };
            Cell::new(pos, state, VegetationType::Grassland, 0.0, 0.1, 30.0)
        })
        .expect("valid grid");
        Self::new(grid, BoundaryCondition::Absorbing)
    }

    /// One row of trees with a single fire at `fire_x`, where every tree
    /// next to a fire ignites
    pub fn row(width: usize, fire_x: usize) -> Self {
        Self::forest(width, 1, &[Position::new(fire_x, 0)]).with_dt(CERTAIN_DT)
    }

    pub fn with_boundary(mut self, boundary: BoundaryCondition) -> Self {
        self.topology = BoundaryTopology::new(boundary, self.grid.width(), self.grid.height());
        self
    }

    pub fn with_dt(mut self, dt: f32) -> Self {
        self.dt = dt;
        self
    }

    pub fn cell(&self, x: usize, y: usize) -> Cell {
        *self.grid.get(Position::new(x, y))
    }

    pub fn put(&mut self, cell: Cell) {
        self.grid.set(cell).expect("inside grid");
    }

    pub fn ctx(&self) -> RuleContext<'_> {
        RuleContext {
            grid: &self.grid,
            topology: &self.topology,
            terrain: &self.terrain,
            climate: &self.climate,
            params: &self.params,
            dt: self.dt,
            tick: self.tick,
            seed: self.seed,
        }
    }

    pub fn rng(&self, position: Position) -> CellRng {
        CellRng::for_cell(self.seed, position, self.tick, 1)
    }
}

/// Neighbor spread and nothing else
pub(crate) fn spread_only() -> RuleEngine {
    RuleEngine::new(vec![Box::new(NeighborSpreadRule)])
}

/// Columns of row 0 that are burning
pub(crate) fn burning_columns(grid: &Grid) -> Vec<usize> {
    grid.iter()
        .filter(|cell| cell.position.y == 0 && cell.state == CellState::Burning)
        .map(|cell| cell.position.x)
        .collect()
}
