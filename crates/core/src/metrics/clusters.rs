//! Fire cluster labelling
//!
//! Breadth-first flood fill over Burning and Burnt cells. Adjacency follows
//! the boundary topology, so clusters join across a periodic seam. Each
//! visited cell also records its unwrapped coordinate; reaching an already
//! labelled cell of the same cluster at a different unwrapped coordinate
//! means the cluster winds around the torus.

use crate::core_types::Position;
use crate::error::{FireSimError, Result};
use crate::grid::{BoundaryCondition, BoundaryTopology, Connectivity, Grid};
use std::collections::VecDeque;

const UNLABELLED: u32 = u32::MAX;

/// One connected fire-affected region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cluster {
    /// Number of cells
    pub size: usize,
    /// Horizontal extent in cells (at most the grid width)
    pub extent_x: usize,
    /// Vertical extent in cells (at most the grid height)
    pub extent_y: usize,
    /// Connects the west and east boundaries (or winds around a periodic x axis)
    pub spans_x: bool,
    /// Connects the south and north boundaries (or winds around a periodic y axis)
    pub spans_y: bool,
}

impl Cluster {
    #[must_use]
    pub fn spans(&self) -> bool {
        self.spans_x || self.spans_y
    }
}

/// Bounding box over unwrapped coordinates plus winding flags
struct Extent {
    min: (i64, i64),
    max: (i64, i64),
    wraps_x: bool,
    wraps_y: bool,
}

impl Extent {
    fn new(at: (i64, i64)) -> Self {
        Self {
            min: at,
            max: at,
            wraps_x: false,
            wraps_y: false,
        }
    }

    fn include(&mut self, at: (i64, i64)) {
        self.min = (self.min.0.min(at.0), self.min.1.min(at.1));
        self.max = (self.max.0.max(at.0), self.max.1.max(at.1));
    }
}

fn reserve<T: Clone>(buffer: &mut Vec<T>, len: usize, fill: T, resource: &'static str) -> Result<()> {
    buffer
        .try_reserve_exact(len)
        .map_err(|_| FireSimError::ResourceExhausted {
            resource,
            requested: len,
        })?;
    buffer.resize(len, fill);
    Ok(())
}

/// Label all fire-affected clusters of `grid`.
///
/// Clusters are returned in the row-major order of their first cell.
///
/// # Arguments
///
/// * `grid` - Grid to analyse
/// * `topology` - Boundary topology of the run
/// * `connectivity` - 4- or 8-neighborhood adjacency
///
/// # Errors
///
/// Returns [`FireSimError::ResourceExhausted`] if the label buffers cannot be
/// allocated.
pub fn find_clusters(
    grid: &Grid,
    topology: &BoundaryTopology,
    connectivity: Connectivity,
) -> Result<Vec<Cluster>> {
    let n = grid.len();
    let mut labels: Vec<u32> = Vec::new();
    reserve(&mut labels, n, UNLABELLED, "cluster labels")?;
    let mut unwrapped: Vec<(i64, i64)> = Vec::new();
    reserve(&mut unwrapped, n, (0, 0), "cluster coordinates")?;

    let periodic = topology.condition() == BoundaryCondition::Periodic;
    let (width, height) = (grid.width(), grid.height());
    let mut clusters = Vec::new();
    let mut queue: VecDeque<Position> = VecDeque::new();

    for start in 0..n {
        if labels[start] != UNLABELLED || !grid.cells()[start].state.is_fire_affected() {
            continue;
        }
        let label = clusters.len() as u32;
        let origin = grid.position_of(start);
        let origin_at = (origin.x as i64, origin.y as i64);
        labels[start] = label;
        unwrapped[start] = origin_at;

        let mut size = 0usize;
        let mut extent = Extent::new(origin_at);
        queue.push_back(origin);

        while let Some(pos) = queue.pop_front() {
            size += 1;
            let here = unwrapped[grid.index_of(pos)];
            for (next, (dx, dy)) in topology.adjacent(pos, connectivity) {
                let idx = grid.index_of(next);
                if !grid.cells()[idx].state.is_fire_affected() {
                    continue;
                }
                let at = if periodic {
                    (here.0 + i64::from(dx), here.1 + i64::from(dy))
                } else {
                    (next.x as i64, next.y as i64)
                };
                if labels[idx] == UNLABELLED {
                    labels[idx] = label;
                    unwrapped[idx] = at;
                    extent.include(at);
                    queue.push_back(next);
                } else if periodic && labels[idx] == label {
                    let seen = unwrapped[idx];
                    extent.wraps_x |= seen.0 != at.0;
                    extent.wraps_y |= seen.1 != at.1;
                }
            }
        }

        let extent_x = ((extent.max.0 - extent.min.0 + 1) as usize).min(width);
        let extent_y = ((extent.max.1 - extent.min.1 + 1) as usize).min(height);
        let (spans_x, spans_y) = if periodic {
            (extent.wraps_x, extent.wraps_y)
        } else {
            (
                extent.min.0 == 0 && extent.max.0 == width as i64 - 1,
                extent.min.1 == 0 && extent.max.1 == height as i64 - 1,
            )
        };
        clusters.push(Cluster {
            size,
            extent_x,
            extent_y,
            spans_x,
            spans_y,
        });
    }
    Ok(clusters)
}
