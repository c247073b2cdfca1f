//! Percolation indicator and phase classification

use super::clusters::Cluster;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest indicator value a non-spanning cluster can report
const MAX_NON_SPANNING: f32 = 1.0 - f32::EPSILON;

/// Phase of the fire relative to the percolation threshold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FirePhase {
    /// Fire stays local
    #[default]
    SubCritical,
    /// Near the threshold: large but not yet spanning clusters
    Critical,
    /// A cluster spans the landscape
    SuperCritical,
}

impl FirePhase {
    /// Classify from the percolation indicator.
    ///
    /// # Arguments
    ///
    /// * `indicator` - Percolation indicator (0-1)
    /// * `percolates` - Whether a cluster spans the grid
    /// * `critical_threshold` - Indicator above which a non-spanning fire is critical
    #[must_use]
    pub fn classify(indicator: f32, percolates: bool, critical_threshold: f32) -> Self {
        if percolates {
            Self::SuperCritical
        } else if indicator >= critical_threshold {
            Self::Critical
        } else {
            Self::SubCritical
        }
    }
}

impl fmt::Display for FirePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SubCritical => "SubCritical",
            Self::Critical => "Critical",
            Self::SuperCritical => "SuperCritical",
        })
    }
}

/// Percolation indicator of a set of clusters.
///
/// 1.0 when any cluster spans between opposite boundaries. Otherwise the
/// largest cluster's extent ratio `max(extent_x / width, extent_y / height)`,
/// kept strictly below 1. Returns `(indicator, percolates)`.
#[must_use]
pub fn percolation_indicator(clusters: &[Cluster], width: usize, height: usize) -> (f32, bool) {
    if clusters.iter().any(Cluster::spans) {
        return (1.0, true);
    }
    let Some(largest) = clusters
        .iter()
        .reduce(|best, c| if c.size > best.size { c } else { best })
    else {
        return (0.0, false);
    };
    let ratio = (largest.extent_x as f32 / width as f32).max(largest.extent_y as f32 / height as f32);
    (ratio.min(MAX_NON_SPANNING), false)
}
