//! Landscape grid, terrain and boundary topology

pub mod boundary;
pub mod cell_grid;
pub mod terrain;

pub use boundary::{
    BoundaryCondition, BoundaryTopology, Connectivity, Neighbor, NeighborTarget, MOORE_OFFSETS,
};
pub use cell_grid::{Grid, StateCounts};
pub use terrain::Terrain;
