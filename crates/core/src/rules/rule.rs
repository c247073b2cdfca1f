//! Rule trait and the read-only context rules evaluate against

use crate::core_types::{Cell, CellRng, CellState, Climate, Position};
use crate::grid::{BoundaryTopology, Grid, Neighbor, NeighborTarget, Terrain};
use crate::physics::{preheat, FireDynamicsParams, HeatSource};
use crate::simulation::events::FireEvent;
use std::fmt;

/// Rule categories, evaluated once per cell per tick in [`RuleCategory::ORDER`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleCategory {
    /// Tree → Burning
    Ignition,
    /// Attribute evolution without state change
    Burning,
    /// Burning → Burnt
    Extinction,
    /// Burnt/Empty → Tree
    Recovery,
}

impl RuleCategory {
    /// Fixed per-tick evaluation order
    pub const ORDER: [RuleCategory; 4] = [
        RuleCategory::Ignition,
        RuleCategory::Burning,
        RuleCategory::Extinction,
        RuleCategory::Recovery,
    ];

    /// Random stream id, so each category draws from its own generator
    #[must_use]
    pub fn stream_id(self) -> u64 {
        match self {
            Self::Ignition => 1,
            Self::Burning => 2,
            Self::Extinction => 3,
            Self::Recovery => 4,
        }
    }

    /// Whether rules of this category may change a cell's discrete state
    #[must_use]
    pub fn changes_state(self) -> bool {
        !matches!(self, Self::Burning)
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Ignition => "ignition",
            Self::Burning => "burning",
            Self::Extinction => "extinction",
            Self::Recovery => "recovery",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved neighbor together with its current contents
#[derive(Debug, Clone, Copy)]
pub struct NeighborCell {
    /// Displacement from the evaluated cell to this neighbor (cells)
    pub offset: (i32, i32),
    /// Neighbor contents; a fixed-boundary sentinel is an Empty, Barren cell
    pub cell: Cell,
    /// True for the fixed-boundary sentinel
    pub is_sentinel: bool,
}

/// Everything a rule may read while updating one cell
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Grid neighbors are read from (snapshot or working grid, depending on
    /// the update strategy)
    pub grid: &'a Grid,
    pub topology: &'a BoundaryTopology,
    pub terrain: &'a Terrain,
    pub climate: &'a Climate,
    pub params: &'a FireDynamicsParams,
    /// Step length of this tick (s)
    pub dt: f32,
    /// Tick index
    pub tick: u64,
    /// Global run seed
    pub seed: u64,
}

impl RuleContext<'_> {
    fn lookup(&self, position: Position, neighbor: Neighbor) -> NeighborCell {
        match neighbor.target {
            NeighborTarget::Cell(p) => NeighborCell {
                offset: neighbor.offset,
                cell: *self.grid.get(p),
                is_sentinel: false,
            },
            NeighborTarget::Sentinel => NeighborCell {
                offset: neighbor.offset,
                cell: Cell::sentinel(position, self.climate.temperature),
                is_sentinel: true,
            },
        }
    }

    /// Moore neighbors of `position` under the active boundary policy
    #[must_use]
    pub fn neighbors(&self, position: Position) -> Vec<NeighborCell> {
        self.topology
            .neighbors(position)
            .into_iter()
            .map(|n| self.lookup(position, n))
            .collect()
    }

    /// Neighbors at an arbitrary offset set; reflected offsets that land on
    /// the same cell are listed once
    #[must_use]
    pub fn neighbors_with(&self, position: Position, offsets: &[(i32, i32)]) -> Vec<NeighborCell> {
        self.topology
            .neighbors_with(position, offsets)
            .into_iter()
            .map(|n| self.lookup(position, n))
            .collect()
    }

    /// Neighbor at an arbitrary offset, `None` if it does not exist
    #[must_use]
    pub fn neighbor_at(&self, position: Position, dx: i32, dy: i32) -> Option<NeighborCell> {
        self.topology
            .resolve(position, dx, dy)
            .map(|n| self.lookup(position, n))
    }

    /// Burning Moore neighbors of `position` as heat sources
    #[must_use]
    pub fn heat_sources(&self, position: Position) -> Vec<HeatSource> {
        self.neighbors(position)
            .into_iter()
            .filter(|n| n.cell.state == CellState::Burning)
            .map(|n| HeatSource {
                intensity: n.cell.intensity,
                offset: (-n.offset.0, -n.offset.1),
            })
            .collect()
    }

    /// Temperature rise of `position` from its burning Moore neighbors (°C)
    #[must_use]
    pub fn preheat(&self, position: Position) -> f32 {
        preheat(self.heat_sources(position), &self.climate.wind, self.params)
    }

    /// Rescale a per-reference-step probability to this tick's `dt`
    #[must_use]
    pub fn per_step(&self, p: f32) -> f32 {
        self.params.per_step(p, self.dt)
    }

    /// Elevation gain from `from` to `to` (m)
    #[must_use]
    pub fn rise(&self, from: Position, to: Position) -> f32 {
        self.terrain.rise(from, to)
    }
}

/// Result of a rule that applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleOutcome {
    /// Cell after the rule
    pub cell: Cell,
    /// Event emitted by a state transition
    pub event: Option<FireEvent>,
}

impl RuleOutcome {
    /// Attribute-only update
    #[must_use]
    pub fn update(cell: Cell) -> Self {
        Self { cell, event: None }
    }

    /// State transition with its event
    #[must_use]
    pub fn transition(cell: Cell, event: FireEvent) -> Self {
        Self {
            cell,
            event: Some(event),
        }
    }
}

/// One local update rule.
///
/// Rules are stateless with respect to the run: coefficients are fixed at
/// construction and all randomness comes from the generator passed in, so the
/// same rule object can be shared across worker threads.
pub trait Rule: Send + Sync + fmt::Debug {
    /// Name reported in errors and logs
    fn name(&self) -> &'static str;

    /// Category the rule belongs to
    fn category(&self) -> RuleCategory;

    /// Try to update `cell`.
    ///
    /// # Arguments
    ///
    /// * `cell` - Cell as updated by earlier categories this tick
    /// * `ctx` - Read-only tick context
    /// * `rng` - Generator for this cell, tick and category
    ///
    /// # Returns
    ///
    /// `None` if the rule does not apply, otherwise the updated cell
    fn apply(&self, cell: &Cell, ctx: &RuleContext<'_>, rng: &mut CellRng) -> Option<RuleOutcome>;
}
