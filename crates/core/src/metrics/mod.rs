//! Observables and percolation detection
//!
//! [`compute_metrics`] is a pure function of a grid and its topology,
//! recomputed from scratch every tick.

pub mod clusters;
pub mod percolation;

pub use clusters::{find_clusters, Cluster};
pub use percolation::{percolation_indicator, FirePhase};

use crate::core_types::CellState;
use crate::error::{FireSimError, Result};
use crate::grid::{BoundaryTopology, Connectivity, Grid, StateCounts};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Options of the metrics pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Cluster adjacency
    pub connectivity: Connectivity,
    /// Largest grid the cluster analysis will label
    pub max_cells: usize,
    /// Indicator at or above which a non-spanning fire is classed Critical
    pub critical_threshold: f32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::Eight,
            max_cells: 1 << 26,
            critical_threshold: 0.5,
        }
    }
}

impl MetricsConfig {
    /// # Errors
    ///
    /// Returns [`FireSimError::InvalidConfig`] for a zero cell limit or a
    /// threshold outside (0, 1).
    pub fn validate(&self) -> Result<()> {
        if self.max_cells == 0 {
            return Err(FireSimError::invalid_config("metrics.max_cells", "must be positive"));
        }
        if !(self.critical_threshold > 0.0 && self.critical_threshold < 1.0) {
            return Err(FireSimError::invalid_config(
                "metrics.critical_threshold",
                format!("must be within (0, 1), got {}", self.critical_threshold),
            ));
        }
        Ok(())
    }
}

/// Number of clusters of one size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSizeBin {
    pub size: usize,
    pub count: usize,
}

/// Observables of one grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationMetrics {
    pub state_counts: StateCounts,
    /// Burning cells
    pub active_fires: usize,
    /// Burnt cells
    pub total_burnt_area: usize,
    /// Burning and burnt cells over all cells
    pub burnt_fraction: f32,
    pub largest_fire_cluster_size: usize,
    pub cluster_count: usize,
    /// Cluster-size histogram, ascending by size
    pub cluster_size_distribution: Vec<ClusterSizeBin>,
    pub percolation_indicator: f32,
    pub percolates: bool,
    pub phase: FirePhase,
    /// Tree cells over all cells
    pub tree_density: f32,
    /// Mean moisture over cells carrying fuel dynamics, i.e. flammable and
    /// not Empty (0 if none)
    pub average_moisture: f32,
    /// Mean cell temperature (°C)
    pub average_temperature: f32,
}

/// Summarize a grid.
///
/// # Arguments
///
/// * `grid` - Grid to summarize
/// * `topology` - Boundary topology of the run
/// * `config` - Metrics options
///
/// # Errors
///
/// Returns [`FireSimError::ResourceExhausted`] if the grid exceeds
/// `config.max_cells` or the cluster buffers cannot be allocated.
pub fn compute_metrics(
    grid: &Grid,
    topology: &BoundaryTopology,
    config: &MetricsConfig,
) -> Result<SimulationMetrics> {
    if grid.len() > config.max_cells {
        return Err(FireSimError::ResourceExhausted {
            resource: "cluster analysis cells",
            requested: grid.len(),
        });
    }

    let state_counts = grid.state_counts();
    let total = grid.len() as f32;

    let clusters = find_clusters(grid, topology, config.connectivity)?;
    let mut histogram: FxHashMap<usize, usize> = FxHashMap::default();
    for cluster in &clusters {
        *histogram.entry(cluster.size).or_insert(0) += 1;
    }
    let mut cluster_size_distribution: Vec<ClusterSizeBin> = histogram
        .into_iter()
        .map(|(size, count)| ClusterSizeBin { size, count })
        .collect();
    cluster_size_distribution.sort_unstable_by_key(|bin| bin.size);

    let (indicator, percolates) = percolation_indicator(&clusters, grid.width(), grid.height());

    let (moisture_sum, fuelled) = grid
        .iter()
        .filter(|cell| !cell.is_bare())
        .fold((0.0f64, 0usize), |(sum, n), cell| (sum + f64::from(cell.moisture), n + 1));
    let temperature_sum: f64 = grid.iter().map(|cell| f64::from(cell.temperature)).sum();

    Ok(SimulationMetrics {
        active_fires: state_counts.get(CellState::Burning),
        total_burnt_area: state_counts.get(CellState::Burnt),
        burnt_fraction: (state_counts.burning + state_counts.burnt) as f32 / total,
        largest_fire_cluster_size: clusters.iter().map(|c| c.size).max().unwrap_or(0),
        cluster_count: clusters.len(),
        cluster_size_distribution,
        percolation_indicator: indicator,
        percolates,
        phase: FirePhase::classify(indicator, percolates, config.critical_threshold),
        tree_density: state_counts.tree as f32 / total,
        average_moisture: if fuelled > 0 {
            (moisture_sum / fuelled as f64) as f32
        } else {
            0.0
        },
        average_temperature: (temperature_sum / grid.len() as f64) as f32,
        state_counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Cell, Position, VegetationType};
    use crate::grid::BoundaryCondition;

    #[test]
    fn test_percolation_scenario_block() {
        // 10×10 forest with a 3×3 fire centered on (5, 5)
        let grid = Grid::from_fn(10, 10, |pos| {
            let burning = (4..=6).contains(&pos.x) && (4..=6).contains(&pos.y);
            let state = if burning { CellState::Burning } else { CellState::Tree };
            Cell::new(pos, state, VegetationType::DenseForest, 0.0, 0.2, 20.0)
        })
        .expect("valid grid");
        let topology = BoundaryTopology::new(BoundaryCondition::Absorbing, 10, 10);
        let metrics = compute_metrics(&grid, &topology, &MetricsConfig::default()).expect("fits");

        assert_eq!(metrics.active_fires, 9);
        assert_eq!(metrics.largest_fire_cluster_size, 9);
        assert_eq!(metrics.cluster_count, 1);
        assert_eq!(metrics.cluster_size_distribution, vec![ClusterSizeBin { size: 9, count: 1 }]);
        assert!(metrics.percolation_indicator < 1.0);
        assert!(!metrics.percolates);
        assert_eq!(metrics.phase, FirePhase::SubCritical);
        assert!((metrics.tree_density - 0.91).abs() < 1e-6);
        assert_eq!(metrics.state_counts.total(), 100);
    }

    #[test]
    fn test_spanning_fire_is_supercritical() {
        let grid = Grid::from_fn(8, 8, |pos| {
            let state = if pos.y == 3 { CellState::Burnt } else { CellState::Tree };
            Cell::new(pos, state, VegetationType::Grassland, 0.0, 0.1, 20.0)
        })
        .expect("valid grid");
        let topology = BoundaryTopology::new(BoundaryCondition::Reflective, 8, 8);
        let metrics = compute_metrics(&grid, &topology, &MetricsConfig::default()).expect("fits");
        assert_eq!(metrics.percolation_indicator, 1.0);
        assert!(metrics.percolates);
        assert_eq!(metrics.phase, FirePhase::SuperCritical);
        assert_eq!(metrics.total_burnt_area, 8);
    }

    #[test]
    fn test_max_cells_is_recoverable() {
        let grid = Grid::uniform(10, 10, CellState::Tree, VegetationType::Grassland, 0.1, 20.0)
            .expect("valid grid");
        let topology = BoundaryTopology::new(BoundaryCondition::Absorbing, 10, 10);
        let config = MetricsConfig {
            max_cells: 50,
            ..MetricsConfig::default()
        };
        let err = compute_metrics(&grid, &topology, &config).unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_averages_skip_bare_ground() {
        let grid = Grid::from_fn(3, 1, |pos| match pos.x {
            0 => Cell::new(pos, CellState::Tree, VegetationType::Grassland, 0.0, 0.4, 10.0),
            1 => Cell::new(pos, CellState::Empty, VegetationType::Water, 0.0, 0.9, 30.0),
            _ => Cell::new(pos, CellState::Empty, VegetationType::Grassland, 0.0, 0.9, 20.0),
        })
        .expect("valid grid");
        let topology = BoundaryTopology::new(BoundaryCondition::Absorbing, 3, 1);
        let metrics = compute_metrics(&grid, &topology, &MetricsConfig::default()).expect("fits");
        assert!((metrics.average_moisture - 0.4).abs() < 1e-6);
        assert!((metrics.average_temperature - 20.0).abs() < 1e-6);
    }
}
