//! Cell state model
//!
//! A cell is the unit of the cellular automaton. Its discrete [`CellState`]
//! follows a small forward-only state machine:
//!
//! ```text
//!   Empty ──recovery──▶ Tree ──ignition──▶ Burning ──extinction──▶ Burnt
//!                        ▲                                           │
//!                        └─────────────────recovery──────────────────┘
//! ```
//!
//! Continuous attributes (moisture, temperature, fuel, intensity) evolve
//! alongside the discrete state.

use super::vegetation::VegetationType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer grid coordinate. `+x` is east, `+y` is north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Column (0 to width-1)
    pub x: usize,
    /// Row (0 to height-1)
    pub y: usize,
}

impl Position {
    /// Create a new position
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Discrete fire state of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// No vegetation able to burn
    Empty,
    /// Unburnt vegetation
    Tree,
    /// Actively burning
    Burning,
    /// Burnt out
    Burnt,
}

impl CellState {
    /// All states, in their canonical order
    pub const ALL: [CellState; 4] = [
        CellState::Empty,
        CellState::Tree,
        CellState::Burning,
        CellState::Burnt,
    ];

    /// Check whether moving from `self` to `next` within one tick is legal.
    ///
    /// Staying in the same state is always legal. The only state changes are
    /// Tree→Burning, Burning→Burnt and the recovery transitions
    /// Burnt→Tree and Empty→Tree.
    #[must_use]
    pub fn can_transition_to(self, next: CellState) -> bool {
        matches!(
            (self, next),
            (CellState::Tree, CellState::Burning)
                | (CellState::Burning, CellState::Burnt)
                | (CellState::Burnt | CellState::Empty, CellState::Tree)
        ) || self == next
    }

    /// Burning or burnt cells belong to fire clusters
    #[must_use]
    pub fn is_fire_affected(self) -> bool {
        matches!(self, CellState::Burning | CellState::Burnt)
    }
}

/// One cell of the landscape grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Immutable grid coordinate
    pub position: Position,
    /// Discrete fire state
    pub state: CellState,
    /// Terrain elevation at cell center (m)
    pub elevation: f32,
    /// Vegetation cover
    pub vegetation: VegetationType,
    /// Fuel moisture content (0-1)
    pub moisture: f32,
    /// Cell temperature (°C)
    pub temperature: f32,
    /// Remaining fuel (0 to the vegetation's fuel load)
    pub fuel: f32,
    /// Fire intensity of a burning cell (0-1)
    pub intensity: f32,
}

impl Cell {
    /// Create a cell with full fuel for its vegetation.
    ///
    /// Bare cells (Empty state or non-flammable vegetation) always get zero
    /// fuel and zero moisture so they never carry dynamics that could drive
    /// an ignition.
    ///
    /// # Arguments
    ///
    /// * `position` - Grid coordinate
    /// * `state` - Initial fire state
    /// * `vegetation` - Vegetation cover
    /// * `elevation` - Elevation in meters
    /// * `moisture` - Fuel moisture (clamped to 0-1)
    /// * `temperature` - Cell temperature in °C
    #[must_use]
    pub fn new(
        position: Position,
        state: CellState,
        vegetation: VegetationType,
        elevation: f32,
        moisture: f32,
        temperature: f32,
    ) -> Self {
        let flammable = vegetation.is_flammable();
        let intensity = if state == CellState::Burning {
            INITIAL_INTENSITY
        } else {
            0.0
        };
        let fuel = match state {
            CellState::Tree | CellState::Burning if flammable => vegetation.fuel_load(),
            _ => 0.0,
        };
        Self {
            position,
            state,
            elevation,
            vegetation,
            moisture: if flammable && state != CellState::Empty {
                moisture.clamp(0.0, 1.0)
            } else {
                0.0
            },
            temperature,
            fuel,
            intensity,
        }
    }

    /// Sentinel cell used for fixed boundaries: permanently empty and barren.
    #[must_use]
    pub fn sentinel(position: Position, temperature: f32) -> Self {
        Self::new(
            position,
            CellState::Empty,
            VegetationType::Barren,
            0.0,
            0.0,
            temperature,
        )
    }

    /// Fuel remaining as a fraction of the vegetation's fuel load
    #[must_use]
    pub fn fuel_fraction(&self) -> f32 {
        let load = self.vegetation.fuel_load();
        if load > 0.0 {
            (self.fuel / load).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Check if this cell can take part in ignition at all
    #[must_use]
    pub fn is_flammable(&self) -> bool {
        self.vegetation.is_flammable()
    }

    /// Empty ground or non-flammable cover: holds no fuel or moisture
    #[must_use]
    pub fn is_bare(&self) -> bool {
        self.state == CellState::Empty || !self.is_flammable()
    }
}

/// Intensity assigned to a freshly ignited cell
pub const INITIAL_INTENSITY: f32 = 0.5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_transitions() {
        assert!(CellState::Tree.can_transition_to(CellState::Burning));
        assert!(CellState::Burning.can_transition_to(CellState::Burnt));
        assert!(CellState::Burnt.can_transition_to(CellState::Tree));
        assert!(CellState::Empty.can_transition_to(CellState::Tree));
        for state in CellState::ALL {
            assert!(state.can_transition_to(state));
        }
    }

    #[test]
    fn test_illegal_transitions() {
        assert!(!CellState::Empty.can_transition_to(CellState::Burning));
        assert!(!CellState::Burning.can_transition_to(CellState::Tree));
        assert!(!CellState::Tree.can_transition_to(CellState::Burnt));
        assert!(!CellState::Burnt.can_transition_to(CellState::Burning));
        assert!(!CellState::Tree.can_transition_to(CellState::Empty));
    }

    #[test]
    fn test_non_flammable_cells_hold_no_fuel() {
        let water = Cell::new(
            Position::new(0, 0),
            CellState::Empty,
            VegetationType::Water,
            0.0,
            0.8,
            20.0,
        );
        assert_eq!(water.fuel, 0.0);
        assert_eq!(water.moisture, 0.0);
        assert_eq!(water.fuel_fraction(), 0.0);

        let forest = Cell::new(
            Position::new(1, 0),
            CellState::Tree,
            VegetationType::DenseForest,
            0.0,
            1.4,
            20.0,
        );
        assert_eq!(forest.fuel, VegetationType::DenseForest.fuel_load());
        assert_eq!(forest.moisture, 1.0);
        assert_eq!(forest.fuel_fraction(), 1.0);
        assert!(!forest.is_bare());

        let clearing = Cell::new(
            Position::new(2, 0),
            CellState::Empty,
            VegetationType::Grassland,
            0.0,
            0.5,
            20.0,
        );
        assert!(clearing.is_bare());
        assert_eq!(clearing.fuel, 0.0);
        assert_eq!(clearing.moisture, 0.0);
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(3, 9).to_string(), "(3, 9)");
    }
}
