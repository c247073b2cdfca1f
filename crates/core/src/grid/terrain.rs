//! Terrain elevation and topography
//!
//! Elevation field aligned 1:1 with the cell grid. Slope and aspect are
//! precomputed once with Horn's 3×3 method so rules can query them per cell
//! without touching neighboring samples.

use crate::core_types::Position;
use crate::error::{FireSimError, Result};
use serde::{Deserialize, Serialize};

/// Read-only terrain for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    /// Samples in X direction (matches grid width)
    width: usize,
    /// Samples in Y direction (matches grid height)
    height: usize,
    /// Horizontal cell size in meters
    cell_size: f32,
    /// Elevation in meters (row-major order: [y * width + x])
    elevations: Vec<f32>,
    /// Precomputed slope at each cell (degrees)
    slope: Vec<f32>,
    /// Precomputed aspect at each cell (degrees, downslope bearing)
    aspect: Vec<f32>,
    min_elevation: f32,
    max_elevation: f32,
}

impl Terrain {
    /// Create flat terrain at given elevation
    ///
    /// # Errors
    ///
    /// Returns [`FireSimError::InvalidConfig`] for zero dimensions or a
    /// non-positive cell size.
    pub fn flat(width: usize, height: usize, cell_size: f32, elevation: f32) -> Result<Self> {
        Self::from_elevations(width, height, cell_size, vec![elevation; width * height])
    }

    /// Create terrain by evaluating `elevation` at every cell center.
    ///
    /// # Errors
    ///
    /// Same as [`Terrain::from_elevations`].
    pub fn from_fn(
        width: usize,
        height: usize,
        cell_size: f32,
        mut elevation: impl FnMut(Position) -> f32,
    ) -> Result<Self> {
        let mut elevations = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                elevations.push(elevation(Position::new(x, y)));
            }
        }
        Self::from_elevations(width, height, cell_size, elevations)
    }

    /// Create terrain from a row-major elevation array
    ///
    /// # Arguments
    /// * `width` - Number of samples in X direction
    /// * `height` - Number of samples in Y direction
    /// * `cell_size` - Horizontal spacing between samples (m)
    /// * `elevations` - Elevations in meters, `[y * width + x]`
    ///
    /// # Errors
    ///
    /// Returns [`FireSimError::InvalidConfig`] for zero dimensions, a
    /// non-positive cell size or non-finite elevations, and
    /// [`FireSimError::DimensionMismatch`] if the array length disagrees with
    /// the dimensions.
    pub fn from_elevations(
        width: usize,
        height: usize,
        cell_size: f32,
        elevations: Vec<f32>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FireSimError::invalid_config(
                "terrain",
                format!("dimensions must be positive, got {width}x{height}"),
            ));
        }
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(FireSimError::invalid_config(
                "terrain.cell_size",
                format!("must be positive, got {cell_size}"),
            ));
        }
        if elevations.len() != width * height {
            return Err(FireSimError::DimensionMismatch {
                source_name: "elevation array",
                grid_width: width,
                grid_height: height,
                other_width: elevations.len(),
                other_height: 1,
            });
        }
        if elevations.iter().any(|e| !e.is_finite()) {
            return Err(FireSimError::invalid_config(
                "terrain.elevations",
                "all elevations must be finite",
            ));
        }

        let (min_elevation, max_elevation) = elevations
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &e| (lo.min(e), hi.max(e)));

        let mut terrain = Self {
            width,
            height,
            cell_size,
            elevations,
            slope: Vec::new(),
            aspect: Vec::new(),
            min_elevation,
            max_elevation,
        };
        let (slope, aspect) = (0..width * height)
            .map(|idx| terrain.horn(Position::new(idx % width, idx / width)))
            .unzip();
        terrain.slope = slope;
        terrain.aspect = aspect;
        Ok(terrain)
    }

    /// Elevation sample with indices clamped to the terrain edge
    #[inline]
    fn sample(&self, x: isize, y: isize) -> f32 {
        let cx = x.clamp(0, self.width as isize - 1) as usize;
        let cy = y.clamp(0, self.height as isize - 1) as usize;
        self.elevations[cy * self.width + cx]
    }

    /// Slope (degrees) and aspect (degrees, downslope bearing) using Horn's method
    ///
    /// # Scientific Reference
    /// Horn, B.K.P. (1981). "Hill Shading and the Reflectance Map."
    fn horn(&self, position: Position) -> (f32, f32) {
        let x = position.x as isize;
        let y = position.y as isize;
        let d = self.cell_size;

        // z[0] z[1] z[2]   (NW) (N) (NE)
        // z[3] z[4] z[5]   (W)  (C) (E)
        // z[6] z[7] z[8]   (SW) (S) (SE)
        let z = [
            self.sample(x - 1, y + 1),
            self.sample(x, y + 1),
            self.sample(x + 1, y + 1),
            self.sample(x - 1, y),
            self.sample(x, y),
            self.sample(x + 1, y),
            self.sample(x - 1, y - 1),
            self.sample(x, y - 1),
            self.sample(x + 1, y - 1),
        ];

        let dz_dx = ((z[2] + 2.0 * z[5] + z[8]) - (z[0] + 2.0 * z[3] + z[6])) / (8.0 * d);
        let dz_dy = ((z[0] + 2.0 * z[1] + z[2]) - (z[6] + 2.0 * z[7] + z[8])) / (8.0 * d);

        let slope = (dz_dx * dz_dx + dz_dy * dz_dy).sqrt().atan().to_degrees();

        // Aspect is the bearing of steepest descent
        let aspect = if dz_dx == 0.0 && dz_dy == 0.0 {
            0.0
        } else {
            let deg = (-dz_dx).atan2(-dz_dy).to_degrees();
            if deg < 0.0 {
                deg + 360.0
            } else {
                deg
            }
        };
        (slope, aspect)
    }

    #[inline]
    fn index(&self, position: Position) -> usize {
        debug_assert!(position.x < self.width && position.y < self.height);
        position.y * self.width + position.x
    }

    /// Elevation at a cell (m)
    #[must_use]
    pub fn elevation(&self, position: Position) -> f32 {
        self.elevations[self.index(position)]
    }

    /// Slope at a cell (degrees, 0 = flat)
    #[must_use]
    pub fn slope(&self, position: Position) -> f32 {
        self.slope[self.index(position)]
    }

    /// Aspect at a cell (degrees, 0 = north-facing downslope)
    #[must_use]
    pub fn aspect(&self, position: Position) -> f32 {
        self.aspect[self.index(position)]
    }

    /// Elevation gain going from `from` to `to` (m, negative downhill)
    #[must_use]
    pub fn rise(&self, from: Position, to: Position) -> f32 {
        self.elevation(to) - self.elevation(from)
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Horizontal cell size (m)
    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[must_use]
    pub fn min_elevation(&self) -> f32 {
        self.min_elevation
    }

    #[must_use]
    pub fn max_elevation(&self) -> f32 {
        self.max_elevation
    }

    /// Elevations in row-major order
    #[must_use]
    pub fn elevations(&self) -> &[f32] {
        &self.elevations
    }
}
