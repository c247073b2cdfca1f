//! Neighbor resolution under the four boundary policies
//!
//! Interior cells always see their full Moore neighborhood. At the grid edge
//! the [`BoundaryCondition`] decides what an out-of-range offset means:
//!
//! - Periodic: wrap around both axes (torus)
//! - Absorbing: the neighbor does not exist
//! - Reflective: mirror the coordinate back into the grid
//! - Fixed: a permanently empty, non-flammable sentinel sits outside

use crate::core_types::Position;
use crate::error::{FireSimError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Moore neighborhood offsets in canonical order (row by row, south to north)
pub const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Von Neumann neighborhood offsets
pub const VON_NEUMANN_OFFSETS: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// Boundary policy applied to out-of-range neighbors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryCondition {
    /// Wrap both axes
    Periodic,
    /// Drop out-of-range neighbors
    #[default]
    Absorbing,
    /// Mirror out-of-range coordinates
    Reflective,
    /// Out-of-range neighbors are a fixed Empty/Barren sentinel
    Fixed,
}

impl BoundaryCondition {
    pub const ALL: [BoundaryCondition; 4] = [
        BoundaryCondition::Periodic,
        BoundaryCondition::Absorbing,
        BoundaryCondition::Reflective,
        BoundaryCondition::Fixed,
    ];

    /// Configuration name of the policy
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Periodic => "periodic",
            Self::Absorbing => "absorbing",
            Self::Reflective => "reflective",
            Self::Fixed => "fixed",
        }
    }
}

impl fmt::Display for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BoundaryCondition {
    type Err = FireSimError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|bc| bc.name() == name)
            .ok_or_else(|| FireSimError::UnknownVariant {
                kind: "boundary condition",
                name: s.to_string(),
            })
    }
}

/// Neighborhood used for cluster adjacency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Connectivity {
    /// Edge-sharing neighbors only
    Four,
    /// Edge- and corner-sharing neighbors
    #[default]
    Eight,
}

impl Connectivity {
    /// Offsets making up this neighborhood
    #[must_use]
    pub fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Self::Four => &VON_NEUMANN_OFFSETS,
            Self::Eight => &MOORE_OFFSETS,
        }
    }
}

/// What a neighbor offset resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeighborTarget {
    /// A cell inside the grid
    Cell(Position),
    /// The fixed-boundary sentinel
    Sentinel,
}

/// One resolved neighbor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    /// Displacement from the center cell to the neighbor, in cells.
    /// Periodic neighbors keep the unwrapped offset; reflected neighbors
    /// report the displacement to the mirrored cell.
    pub offset: (i32, i32),
    pub target: NeighborTarget,
}

impl Neighbor {
    /// Center-to-center distance in cells
    #[must_use]
    pub fn distance(&self) -> f32 {
        let (dx, dy) = self.offset;
        ((dx * dx + dy * dy) as f32).sqrt()
    }

    /// True for corner-sharing neighbors
    #[must_use]
    pub fn is_diagonal(&self) -> bool {
        self.offset.0 != 0 && self.offset.1 != 0
    }
}

/// Neighbor resolver for one grid shape and boundary policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryTopology {
    condition: BoundaryCondition,
    width: usize,
    height: usize,
}

impl BoundaryTopology {
    #[must_use]
    pub fn new(condition: BoundaryCondition, width: usize, height: usize) -> Self {
        Self {
            condition,
            width,
            height,
        }
    }

    #[must_use]
    pub fn condition(&self) -> BoundaryCondition {
        self.condition
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Resolve an arbitrary offset from `position`.
    ///
    /// Returns `None` when the neighbor does not exist: dropped by an
    /// absorbing edge, mirrored past the opposite edge, or resolving back
    /// onto `position` itself (possible on one- or two-cell-wide grids).
    #[must_use]
    pub fn resolve(&self, position: Position, dx: i32, dy: i32) -> Option<Neighbor> {
        let w = self.width as i64;
        let h = self.height as i64;
        let x = position.x as i64 + i64::from(dx);
        let y = position.y as i64 + i64::from(dy);
        let inside = (0..w).contains(&x) && (0..h).contains(&y);

        let neighbor = if inside {
            Neighbor {
                offset: (dx, dy),
                target: NeighborTarget::Cell(Position::new(x as usize, y as usize)),
            }
        } else {
            match self.condition {
                BoundaryCondition::Absorbing => return None,
                BoundaryCondition::Fixed => Neighbor {
                    offset: (dx, dy),
                    target: NeighborTarget::Sentinel,
                },
                BoundaryCondition::Periodic => Neighbor {
                    offset: (dx, dy),
                    target: NeighborTarget::Cell(Position::new(
                        x.rem_euclid(w) as usize,
                        y.rem_euclid(h) as usize,
                    )),
                },
                BoundaryCondition::Reflective => {
                    let mx = mirror(x, w)?;
                    let my = mirror(y, h)?;
                    Neighbor {
                        offset: ((mx - position.x as i64) as i32, (my - position.y as i64) as i32),
                        target: NeighborTarget::Cell(Position::new(mx as usize, my as usize)),
                    }
                }
            }
        };

        match neighbor.target {
            NeighborTarget::Cell(p) if p == position => None,
            _ => Some(neighbor),
        }
    }

    /// Moore neighbors of `position` under the boundary policy.
    ///
    /// Reflective neighbors that mirror onto an already listed cell are
    /// removed, so every listed target is distinct.
    #[must_use]
    pub fn neighbors(&self, position: Position) -> Vec<Neighbor> {
        self.neighbors_with(position, &MOORE_OFFSETS)
    }

    /// Neighbors for an arbitrary offset set, deduplicated for reflection
    #[must_use]
    pub fn neighbors_with(&self, position: Position, offsets: &[(i32, i32)]) -> Vec<Neighbor> {
        let mut out: Vec<Neighbor> = Vec::with_capacity(offsets.len());
        for &(dx, dy) in offsets {
            let Some(neighbor) = self.resolve(position, dx, dy) else {
                continue;
            };
            if self.condition == BoundaryCondition::Reflective
                && out.iter().any(|n| n.target == neighbor.target)
            {
                continue;
            }
            out.push(neighbor);
        }
        out
    }

    /// In-grid neighbors for cluster adjacency, with their offsets
    pub fn adjacent(
        &self,
        position: Position,
        connectivity: Connectivity,
    ) -> impl Iterator<Item = (Position, (i32, i32))> + '_ {
        connectivity
            .offsets()
            .iter()
            .filter_map(move |&(dx, dy)| self.resolve(position, dx, dy))
            .filter_map(|n| match n.target {
                NeighborTarget::Cell(p) => Some((p, n.offset)),
                NeighborTarget::Sentinel => None,
            })
    }
}

/// Mirror a coordinate into `[0, n)`, `None` if one reflection is not enough
fn mirror(v: i64, n: i64) -> Option<i64> {
    let m = if v < 0 {
        -v
    } else if v >= n {
        2 * (n - 1) - v
    } else {
        v
    };
    (0..n).contains(&m).then_some(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner_count(condition: BoundaryCondition) -> usize {
        BoundaryTopology::new(condition, 10, 10)
            .neighbors(Position::new(0, 0))
            .len()
    }

    #[test]
    fn test_corner_neighbor_counts() {
        assert_eq!(corner_count(BoundaryCondition::Periodic), 8);
        assert_eq!(corner_count(BoundaryCondition::Absorbing), 3);
        assert_eq!(corner_count(BoundaryCondition::Fixed), 8);
        let reflective = corner_count(BoundaryCondition::Reflective);
        assert!((3..=8).contains(&reflective), "reflective corner: {reflective}");
    }

    #[test]
    fn test_interior_has_full_neighborhood() {
        for condition in BoundaryCondition::ALL {
            let topology = BoundaryTopology::new(condition, 5, 5);
            assert_eq!(topology.neighbors(Position::new(2, 2)).len(), 8, "{condition}");
        }
    }

    #[test]
    fn test_periodic_wraps_with_true_offset() {
        let topology = BoundaryTopology::new(BoundaryCondition::Periodic, 10, 6);
        let n = topology.resolve(Position::new(0, 0), -1, -1).expect("wrapped");
        assert_eq!(n.offset, (-1, -1));
        assert_eq!(n.target, NeighborTarget::Cell(Position::new(9, 5)));
    }

    #[test]
    fn test_reflective_mirrors_and_stays_in_range() {
        let topology = BoundaryTopology::new(BoundaryCondition::Reflective, 10, 10);
        let n = topology.resolve(Position::new(0, 4), -1, 0).expect("mirrored");
        assert_eq!(n.target, NeighborTarget::Cell(Position::new(1, 4)));
        assert_eq!(n.offset, (1, 0));

        let n = topology.resolve(Position::new(9, 4), 1, 0).expect("mirrored");
        assert_eq!(n.target, NeighborTarget::Cell(Position::new(8, 4)));

        for neighbor in topology.neighbors(Position::new(9, 9)) {
            match neighbor.target {
                NeighborTarget::Cell(p) => assert!(p.x < 10 && p.y < 10),
                NeighborTarget::Sentinel => panic!("reflective never yields a sentinel"),
            }
        }
    }

    #[test]
    fn test_fixed_edges_are_sentinels() {
        let topology = BoundaryTopology::new(BoundaryCondition::Fixed, 4, 4);
        let sentinels = topology
            .neighbors(Position::new(0, 0))
            .iter()
            .filter(|n| n.target == NeighborTarget::Sentinel)
            .count();
        assert_eq!(sentinels, 5);
    }

    #[test]
    fn test_distance_two_resolution() {
        let absorbing = BoundaryTopology::new(BoundaryCondition::Absorbing, 5, 5);
        assert!(absorbing.resolve(Position::new(1, 1), -2, 0).is_none());
        let n = absorbing.resolve(Position::new(2, 2), 2, 2).expect("in range");
        assert!((n.distance() - 8f32.sqrt()).abs() < 1e-6);
        assert!(n.is_diagonal());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(
            "Periodic".parse::<BoundaryCondition>().expect("known"),
            BoundaryCondition::Periodic
        );
        assert_eq!(
            " fixed ".parse::<BoundaryCondition>().expect("known"),
            BoundaryCondition::Fixed
        );
        let err = "toroidal".parse::<BoundaryCondition>().unwrap_err();
        assert!(matches!(err, FireSimError::UnknownVariant { .. }));
    }

    #[test]
    fn test_four_connectivity_adjacency() {
        let topology = BoundaryTopology::new(BoundaryCondition::Absorbing, 3, 3);
        assert_eq!(topology.adjacent(Position::new(0, 0), Connectivity::Four).count(), 2);
        assert_eq!(topology.adjacent(Position::new(1, 1), Connectivity::Eight).count(), 8);
    }
}
