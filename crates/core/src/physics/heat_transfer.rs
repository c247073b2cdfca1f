//! Preheating of unburnt fuel by nearby fires
//!
//! Each burning neighbor raises a Tree cell's effective temperature through
//! two channels:
//!
//! - Radiation, falling off with the inverse square of distance
//! - Convection, falling off with distance and boosted downwind
//!
//! The raised temperature dries the fuel before ignition is sampled:
//! `moisture_eff = moisture × exp(−drying × ΔT)`.

use super::{clamp_unit, sanitize, FireDynamicsParams};
use crate::core_types::Wind;

/// A burning cell seen from the cell being heated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatSource {
    /// Fire intensity of the source (0-1)
    pub intensity: f32,
    /// Displacement from source to receiver (cells)
    pub offset: (i32, i32),
}

impl HeatSource {
    fn distance(&self) -> f32 {
        let (dx, dy) = self.offset;
        ((dx * dx + dy * dy) as f32).sqrt()
    }
}

/// Radiative temperature rise `c × I / d²` (°C)
#[must_use]
pub fn radiative_heat(intensity: f32, distance_cells: f32, coefficient: f32) -> f32 {
    sanitize(coefficient * intensity / (distance_cells * distance_cells))
}

/// Convective temperature rise `c × I × (1 + v × max(cos θ, 0)) / d` (°C)
///
/// A NaN alignment (zero offset) contributes no downwind boost.
#[must_use]
pub fn convective_heat(
    intensity: f32,
    distance_cells: f32,
    wind_speed: f32,
    alignment: f32,
    coefficient: f32,
) -> f32 {
    let downwind = if alignment.is_nan() { 0.0 } else { alignment.max(0.0) };
    sanitize(coefficient * intensity * (1.0 + wind_speed * downwind) / distance_cells)
}

/// Total temperature rise from all burning sources (°C)
#[must_use]
pub fn preheat(
    sources: impl IntoIterator<Item = HeatSource>,
    wind: &Wind,
    params: &FireDynamicsParams,
) -> f32 {
    let total: f32 = sources
        .into_iter()
        .map(|source| {
            let d = source.distance();
            let (dx, dy) = source.offset;
            radiative_heat(source.intensity, d, params.radiative_coefficient)
                + convective_heat(
                    source.intensity,
                    d,
                    wind.speed,
                    wind.alignment(dx, dy),
                    params.convective_coefficient,
                )
        })
        .sum();
    sanitize(total)
}

/// Moisture after drying by a temperature rise, clamped to [0, 1]
#[must_use]
pub fn effective_moisture(moisture: f32, temperature_rise: f32, drying_coefficient: f32) -> f32 {
    clamp_unit(moisture * (-drying_coefficient * sanitize(temperature_rise)).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radiation_inverse_square() {
        let near = radiative_heat(1.0, 1.0, 15.0);
        let far = radiative_heat(1.0, 2.0, 15.0);
        assert!((near / far - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_convection_boosted_downwind() {
        let wind = Wind::new(90.0, 10.0);
        let params = FireDynamicsParams::default();
        let downwind = preheat(
            [HeatSource {
                intensity: 1.0,
                offset: (1, 0),
            }],
            &wind,
            &params,
        );
        let upwind = preheat(
            [HeatSource {
                intensity: 1.0,
                offset: (-1, 0),
            }],
            &wind,
            &params,
        );
        assert!(downwind > upwind);
        assert_eq!(preheat(std::iter::empty(), &wind, &params), 0.0);
    }

    #[test]
    fn test_drying_reduces_moisture() {
        assert_eq!(effective_moisture(0.4, 0.0, 0.02), 0.4);
        assert!(effective_moisture(0.4, 50.0, 0.02) < 0.4);
        assert_eq!(effective_moisture(0.4, f32::INFINITY, 0.02), 0.4);
    }
}
