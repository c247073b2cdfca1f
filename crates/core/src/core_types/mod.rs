//! Core types and utilities

pub mod cell;
pub mod climate;
pub mod seed;
pub mod vegetation;

pub use cell::{Cell, CellState, Position, INITIAL_INTENSITY};
pub use climate::{Climate, ClimateProvider, ConstantClimate, Season, SeasonalClimate, Wind};
pub use seed::{derive_seed, CellRng, TRAVERSAL_STREAM};
pub use vegetation::{VegetationProperties, VegetationType};
