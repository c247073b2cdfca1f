//! Shared fixtures for the integration tests

#![allow(dead_code)]

use tracing_subscriber::{fmt, EnvFilter};
use wildfire_core::{
    Cell, CellState, Climate, FireSimulation, Grid, Position, Season, SimulationConfig, Terrain,
    VegetationType, Wind,
};

/// Install a test subscriber once per binary. `RUST_LOG` overrides the
/// default `warn` filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,wildfire_core=info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// Dry grassland with a burning cross at the center
pub fn burning_forest(width: usize, height: usize) -> Grid {
    let (cx, cy) = (width / 2, height / 2);
    Grid::from_fn(width, height, |pos| {
        let centre = (pos.x == cx && pos.y.abs_diff(cy) <= 1) || (pos.y == cy && pos.x.abs_diff(cx) <= 1);
        let state = if centre { CellState::Burning } else { CellState::Tree };
        Cell::new(pos, state, VegetationType::Grassland, 0.0, 0.08, 30.0)
    })
    .expect("valid grid")
}

/// Mixed landscape: forest, grass, a river of water and a barren patch
pub fn mixed_landscape(width: usize, height: usize) -> Grid {
    Grid::from_fn(width, height, |pos| {
        let (state, vegetation) = if pos.x == width / 3 {
            (CellState::Empty, VegetationType::Water)
        } else if pos.y < 2 && pos.x < 3 {
            (CellState::Empty, VegetationType::Barren)
        } else if pos == Position::new(width * 2 / 3, height / 2) {
            (CellState::Burning, VegetationType::DenseForest)
        } else if (pos.x + pos.y) % 5 == 0 {
            (CellState::Empty, VegetationType::Shrubland)
        } else if pos.y % 2 == 0 {
            (CellState::Tree, VegetationType::DenseForest)
        } else {
            (CellState::Tree, VegetationType::Grassland)
        };
        Cell::new(pos, state, vegetation, 0.0, 0.12, 28.0)
    })
    .expect("valid grid")
}

pub fn hot_dry_climate() -> Climate {
    Climate {
        season: Season::Summer,
        wind: Wind::new(90.0, 6.0),
        humidity: 0.15,
        precipitation: 0.0,
        temperature: 38.0,
    }
}

pub fn sloped_terrain(width: usize, height: usize) -> Terrain {
    Terrain::from_fn(width, height, 30.0, |pos| pos.y as f32 * 5.0).expect("valid terrain")
}

pub fn simulation(config: SimulationConfig, grid: Grid) -> FireSimulation {
    let terrain = sloped_terrain(grid.width(), grid.height());
    FireSimulation::new(config, grid, terrain, hot_dry_climate()).expect("valid run")
}
