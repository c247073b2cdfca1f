//! Rectangular landscape grid
//!
//! Cells are stored in row-major order (`y * width + x`), one cell per
//! position, following the flat-buffer layout used by the field solvers.
//! Dimensions are fixed at construction. The engine never edits a grid in
//! place during a run: each tick builds a fresh buffer.

use crate::core_types::{Cell, CellState, Position, VegetationType};
use crate::error::{FireSimError, Result};
use serde::{Deserialize, Serialize};

/// Number of cells in each state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounts {
    pub empty: usize,
    pub tree: usize,
    pub burning: usize,
    pub burnt: usize,
}

impl StateCounts {
    /// Total number of counted cells
    #[must_use]
    pub fn total(&self) -> usize {
        self.empty + self.tree + self.burning + self.burnt
    }

    /// Count for one state
    #[must_use]
    pub fn get(&self, state: CellState) -> usize {
        match state {
            CellState::Empty => self.empty,
            CellState::Tree => self.tree,
            CellState::Burning => self.burning,
            CellState::Burnt => self.burnt,
        }
    }

    fn record(&mut self, state: CellState) {
        match state {
            CellState::Empty => self.empty += 1,
            CellState::Tree => self.tree += 1,
            CellState::Burning => self.burning += 1,
            CellState::Burnt => self.burnt += 1,
        }
    }
}

/// Fixed-size grid of cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Cells in row-major order: [y * width + x]
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a grid by evaluating `init` at every position (row-major).
    ///
    /// # Errors
    ///
    /// Returns [`FireSimError::InvalidConfig`] for a zero dimension and
    /// [`FireSimError::InvalidCell`] if `init` returns a cell whose position
    /// does not match the slot it was built for.
    pub fn from_fn(width: usize, height: usize, mut init: impl FnMut(Position) -> Cell) -> Result<Self> {
        check_dimensions(width, height)?;
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(init(Position::new(x, y)));
            }
        }
        Self::from_cells(width, height, cells)
    }

    /// Build a grid from a row-major cell buffer.
    ///
    /// # Errors
    ///
    /// Returns [`FireSimError::DimensionMismatch`] if the buffer length is not
    /// `width * height`, and [`FireSimError::InvalidCell`] if a cell's stored
    /// position disagrees with its slot.
    pub fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Result<Self> {
        check_dimensions(width, height)?;
        if cells.len() != width * height {
            return Err(FireSimError::DimensionMismatch {
                source_name: "cell buffer",
                grid_width: width,
                grid_height: height,
                other_width: cells.len(),
                other_height: 1,
            });
        }
        let grid = Self {
            width,
            height,
            cells,
        };
        for (idx, cell) in grid.cells.iter().enumerate() {
            let expected = grid.position_of(idx);
            if cell.position != expected {
                return Err(FireSimError::InvalidCell {
                    position: expected,
                    reason: format!("cell stores position {}", cell.position),
                });
            }
        }
        Ok(grid)
    }

    /// Grid where every cell shares the same state and vegetation.
    ///
    /// # Errors
    ///
    /// Returns [`FireSimError::InvalidConfig`] for a zero dimension.
    pub fn uniform(
        width: usize,
        height: usize,
        state: CellState,
        vegetation: VegetationType,
        moisture: f32,
        temperature: f32,
    ) -> Result<Self> {
        Self::from_fn(width, height, |pos| {
            Cell::new(pos, state, vegetation, 0.0, moisture, temperature)
        })
    }

    /// Wrap a buffer produced by a scheduler from an existing grid.
    pub(crate) fn from_cells_unchecked(width: usize, height: usize, cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
        }
    }

    /// Grid width in cells
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for a constructed grid; provided for API symmetry
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check whether a position lies inside the grid
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        position.x < self.width && position.y < self.height
    }

    /// Row-major index of a position
    #[inline]
    #[must_use]
    pub fn index_of(&self, position: Position) -> usize {
        position.y * self.width + position.x
    }

    /// Position of a row-major index
    #[inline]
    #[must_use]
    pub fn position_of(&self, index: usize) -> Position {
        Position::new(index % self.width, index / self.width)
    }

    /// Cell at a position
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the grid
    #[inline]
    #[must_use]
    pub fn get(&self, position: Position) -> &Cell {
        assert!(self.contains(position), "Position {position} out of bounds");
        &self.cells[self.index_of(position)]
    }

    /// Cell at a position, or `None` outside the grid
    #[must_use]
    pub fn try_get(&self, position: Position) -> Option<&Cell> {
        self.contains(position)
            .then(|| &self.cells[self.index_of(position)])
    }

    /// Replace one cell before a run starts.
    ///
    /// # Errors
    ///
    /// Returns [`FireSimError::InvalidCell`] if the cell's position lies
    /// outside the grid.
    pub fn set(&mut self, cell: Cell) -> Result<()> {
        if !self.contains(cell.position) {
            return Err(FireSimError::InvalidCell {
                position: cell.position,
                reason: format!("outside {}x{} grid", self.width, self.height),
            });
        }
        let idx = self.index_of(cell.position);
        self.cells[idx] = cell;
        Ok(())
    }

    /// All cells in row-major order
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Iterate over cells in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Count cells per state
    #[must_use]
    pub fn state_counts(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for cell in &self.cells {
            counts.record(cell.state);
        }
        counts
    }

    /// Check whether two grids share the same dimensions
    #[must_use]
    pub fn same_shape(&self, other: &Grid) -> bool {
        self.width == other.width && self.height == other.height
    }

    /// Check every cell against the cell model before a run.
    ///
    /// # Errors
    ///
    /// Returns [`FireSimError::InvalidCell`] if a non-flammable cell is Tree
    /// or Burning, if a bare cell (see [`Cell::is_bare`]) holds fuel,
    /// moisture or intensity, if moisture leaves [0, 1], if fuel or intensity
    /// leave their ranges, or if temperature or elevation are not finite.
    pub fn validate(&self) -> Result<()> {
        for cell in &self.cells {
            let invalid = |reason: String| FireSimError::InvalidCell {
                position: cell.position,
                reason,
            };
            if !cell.is_flammable() && matches!(cell.state, CellState::Tree | CellState::Burning) {
                return Err(invalid(format!(
                    "{} vegetation cannot be {:?}",
                    cell.vegetation, cell.state
                )));
            }
            if cell.is_bare() && (cell.fuel != 0.0 || cell.moisture != 0.0 || cell.intensity != 0.0) {
                return Err(invalid(format!(
                    "bare {:?} {} cell holds fuel {}, moisture {}, intensity {}",
                    cell.state, cell.vegetation, cell.fuel, cell.moisture, cell.intensity
                )));
            }
            if !(0.0..=1.0).contains(&cell.moisture) {
                return Err(invalid(format!("moisture {} outside [0, 1]", cell.moisture)));
            }
            if !(0.0..=1.0).contains(&cell.fuel) || !(0.0..=1.0).contains(&cell.intensity) {
                return Err(invalid(format!(
                    "fuel {} or intensity {} outside [0, 1]",
                    cell.fuel, cell.intensity
                )));
            }
            if !cell.temperature.is_finite() || !cell.elevation.is_finite() {
                return Err(invalid("temperature and elevation must be finite".to_string()));
            }
        }
        Ok(())
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(FireSimError::invalid_config(
            "grid",
            format!("dimensions must be positive, got {width}x{height}"),
        ));
    }
    Ok(())
}
