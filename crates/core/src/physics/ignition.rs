//! Ignition probability factors
//!
//! Ignition of a Tree cell by one burning source is the product
//!
//! ```text
//! P = P_base × M × T × V × S × W × O
//! ```
//!
//! with moisture damping `M`, a logistic temperature response `T`, vegetation
//! susceptibility `V`, exponential slope and wind multipliers `S` and `W`, and
//! an oxygen availability factor `O` that falls off with altitude.
//!
//! # References
//!
//! - Alexandridis, A. et al. (2008). "A cellular automata model for forest fire
//!   spread prediction: The case of the wildfire that swept through Spetses
//!   Island in 1990." Applied Mathematics and Computation, 204(1), 191-201.
//! - Rothermel, R.C. (1972). USDA Forest Service Research Paper INT-115.

use super::{cap_factor, clamp_unit, sanitize, FireDynamicsParams};
use crate::core_types::{Climate, VegetationType};

/// Moisture damping `exp(−k × moisture)`
///
/// # Arguments
/// * `moisture` - Fuel moisture (0-1)
/// * `coefficient` - Damping coefficient `k_m`
///
/// # Returns
/// Factor in (0, 1], 1 for bone-dry fuel
#[must_use]
pub fn moisture_factor(moisture: f32, coefficient: f32) -> f32 {
    sanitize((-coefficient * moisture).exp())
}

/// Logistic temperature response `1 / (1 + exp(−(T − T_crit) / scale))`
#[must_use]
pub fn temperature_factor(temperature: f32, critical: f32, scale: f32) -> f32 {
    sanitize(1.0 / (1.0 + (-(temperature - critical) / scale).exp()))
}

/// Vegetation susceptibility `1 − ignition_threshold`
#[must_use]
pub fn vegetation_factor(vegetation: VegetationType) -> f32 {
    if vegetation.is_flammable() {
        clamp_unit(1.0 - vegetation.ignition_threshold())
    } else {
        0.0
    }
}

/// Slope multiplier `exp(c × (tan φ)^e)` uphill, its reciprocal downhill.
///
/// # Arguments
/// * `rise` - Elevation gain from source to target (m, negative downhill)
/// * `run` - Horizontal distance between source and target (m)
/// * `coefficient` - Slope coefficient `c` (3.533)
/// * `exponent` - Slope exponent `e` (1.2)
/// * `cap` - Maximum multiplier
///
/// # Returns
/// Multiplier in [0, cap]; 1 on flat ground
#[must_use]
pub fn slope_factor(rise: f32, run: f32, coefficient: f32, exponent: f32, cap: f32) -> f32 {
    let tan_phi = (rise / run).abs();
    let uphill = (coefficient * tan_phi.powf(exponent)).exp();
    let factor = if rise < 0.0 { 1.0 / uphill } else { uphill };
    cap_factor(factor, cap)
}

/// Wind multiplier `exp(c × v × cos θ)`
///
/// # Arguments
/// * `speed` - Wind speed (m/s)
/// * `alignment` - Cosine of the angle between wind bearing and spread direction
/// * `coefficient` - Wind coefficient `c` (0.1783 s/m)
/// * `cap` - Maximum multiplier
#[must_use]
pub fn wind_factor(speed: f32, alignment: f32, coefficient: f32, cap: f32) -> f32 {
    cap_factor((coefficient * speed * alignment).exp(), cap)
}

/// Oxygen availability `exp(−max(elevation, 0) / H)`
///
/// Barometric decay of air density with scale height `H` (8434 m).
#[must_use]
pub fn oxygen_factor(elevation: f32, scale_height: f32) -> f32 {
    sanitize((-elevation.max(0.0) / scale_height).exp())
}

/// Weight of one burning source: its intensity over its distance in cells.
/// Orthogonal neighbors count fully, diagonal ones by `1/√2`.
#[must_use]
pub fn source_weight(intensity: f32, distance_cells: f32) -> f32 {
    clamp_unit(intensity / distance_cells)
}

/// Factors entering the ignition of one target by one source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IgnitionFactors {
    /// Base probability already weighted by the source
    pub base: f32,
    pub moisture: f32,
    pub temperature: f32,
    pub vegetation: f32,
    pub slope: f32,
    pub wind: f32,
    pub oxygen: f32,
}

impl IgnitionFactors {
    /// Factors for spread from a source at `offset` cells into a target.
    ///
    /// # Arguments
    /// * `params` - Model coefficients
    /// * `vegetation` - Target vegetation
    /// * `moisture` - Effective target moisture after preheating
    /// * `temperature` - Effective target temperature after preheating (°C)
    /// * `target_elevation` - Target elevation (m)
    /// * `rise` - Elevation gain from source to target (m)
    /// * `offset` - Displacement from source to target (cells)
    /// * `cell_size` - Cell size (m)
    /// * `source_intensity` - Intensity of the burning source (0-1)
    /// * `climate` - Climate of the current tick
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn for_source(
        params: &FireDynamicsParams,
        vegetation: VegetationType,
        moisture: f32,
        temperature: f32,
        target_elevation: f32,
        rise: f32,
        offset: (i32, i32),
        cell_size: f32,
        source_intensity: f32,
        climate: &Climate,
    ) -> Self {
        let (dx, dy) = offset;
        let distance_cells = ((dx * dx + dy * dy) as f32).sqrt();
        let cap = params.max_directional_factor;
        Self {
            base: params.base_ignition_probability * source_weight(source_intensity, distance_cells),
            moisture: moisture_factor(moisture, params.moisture_coefficient),
            temperature: temperature_factor(
                temperature,
                params.critical_temperature,
                params.temperature_scale,
            ),
            vegetation: vegetation_factor(vegetation),
            slope: slope_factor(
                rise,
                distance_cells * cell_size,
                params.slope_coefficient,
                params.slope_exponent,
                cap,
            ),
            wind: wind_factor(
                climate.wind.speed,
                climate.wind.alignment(dx, dy),
                params.wind_coefficient,
                cap,
            ),
            oxygen: oxygen_factor(target_elevation, params.oxygen_scale_height),
        }
    }

    /// Product of all factors, clamped to [0, 1]
    #[must_use]
    pub fn probability(&self) -> f32 {
        clamp_unit(
            [
                self.base,
                self.moisture,
                self.temperature,
                self.vegetation,
                self.slope,
                self.wind,
                self.oxygen,
            ]
            .into_iter()
            .map(sanitize)
            .product(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Wind;
    use approx::assert_relative_eq;

    #[test]
    fn test_moisture_factor_monotone() {
        assert_relative_eq!(moisture_factor(0.0, 3.0), 1.0);
        assert!(moisture_factor(0.2, 3.0) > moisture_factor(0.6, 3.0));
    }

    #[test]
    fn test_temperature_factor_logistic() {
        assert_relative_eq!(temperature_factor(25.0, 25.0, 8.0), 0.5, epsilon = 1e-6);
        assert!(temperature_factor(60.0, 25.0, 8.0) > 0.95);
        assert!(temperature_factor(-10.0, 25.0, 8.0) < 0.05);
    }

    #[test]
    fn test_slope_factor_uphill_downhill() {
        assert_relative_eq!(slope_factor(0.0, 30.0, 3.533, 1.2, 10.0), 1.0);
        let up = slope_factor(10.0, 30.0, 3.533, 1.2, 10.0);
        let down = slope_factor(-10.0, 30.0, 3.533, 1.2, 10.0);
        assert!(up > 1.0);
        assert_relative_eq!(up * down, 1.0, epsilon = 1e-5);
        // Vertical step saturates at the cap uphill and vanishes downhill
        assert_eq!(slope_factor(f32::INFINITY, 30.0, 3.533, 1.2, 10.0), 10.0);
        assert_eq!(slope_factor(-1.0e9, 1.0, 3.533, 1.2, 10.0), 0.0);
    }

    #[test]
    fn test_wind_factor() {
        assert_relative_eq!(wind_factor(0.0, 1.0, 0.1783, 10.0), 1.0);
        assert!(wind_factor(5.0, 1.0, 0.1783, 10.0) > 1.0);
        assert!(wind_factor(5.0, -1.0, 0.1783, 10.0) < 1.0);
        assert_eq!(wind_factor(1000.0, 1.0, 0.1783, 10.0), 10.0);
        assert_eq!(wind_factor(5.0, f32::NAN, 0.1783, 10.0), 0.0);
    }

    #[test]
    fn test_oxygen_factor() {
        assert_relative_eq!(oxygen_factor(-50.0, 8434.0), 1.0);
        assert_relative_eq!(oxygen_factor(8434.0, 8434.0), (-1.0f32).exp(), epsilon = 1e-6);
    }

    #[test]
    fn test_non_flammable_never_ignites() {
        assert_eq!(vegetation_factor(VegetationType::Water), 0.0);
        assert_eq!(vegetation_factor(VegetationType::Barren), 0.0);
    }

    #[test]
    fn test_probability_clamped_under_extremes() {
        let params = FireDynamicsParams::default();
        let climate = Climate {
            humidity: 0.0,
            wind: Wind::new(90.0, 1000.0),
            ..Climate::default()
        };
        let factors = IgnitionFactors::for_source(
            &params,
            VegetationType::Grassland,
            0.0,
            500.0,
            0.0,
            f32::INFINITY,
            (1, 0),
            1.0,
            1.0,
            &climate,
        );
        let p = factors.probability();
        assert!((0.0..=1.0).contains(&p), "probability {p}");
        assert_eq!(factors.wind, params.max_directional_factor);
        assert_eq!(factors.slope, params.max_directional_factor);
    }

    #[test]
    fn test_diagonal_sources_weigh_less() {
        let orthogonal = source_weight(1.0, 1.0);
        let diagonal = source_weight(1.0, 2f32.sqrt());
        assert_relative_eq!(diagonal / orthogonal, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
    }
}
