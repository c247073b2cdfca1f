//! Extinction probability of burning cells
//!
//! Four independent mechanisms can put a fire out:
//!
//! - Fuel depletion, growing as `(1 − fuel/fuel_load)²`
//! - Suppression by wet fuel and rain
//! - Isolation, when few neighbors can still carry the fire
//! - Weather-driven self-extinction of weak fires in humid air
//!
//! Each component is clamped to [0, 1]; they combine as independent trials.

use super::{clamp_unit, combine_independent, sanitize, FireDynamicsParams};
use crate::core_types::{Cell, Climate};

/// Per-reference-step extinction probabilities of one burning cell
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExtinctionFactors {
    pub fuel_depletion: f32,
    pub moisture: f32,
    pub isolation: f32,
    pub weather: f32,
}

impl ExtinctionFactors {
    /// Compute all components.
    ///
    /// # Arguments
    /// * `cell` - Burning cell
    /// * `isolated_fraction` - Fraction of neighbors that are neither Burning nor Tree
    /// * `climate` - Climate of the current tick
    /// * `params` - Model coefficients
    #[must_use]
    pub fn new(
        cell: &Cell,
        isolated_fraction: f32,
        climate: &Climate,
        params: &FireDynamicsParams,
    ) -> Self {
        Self {
            fuel_depletion: Self::fuel_depletion(cell.fuel_fraction(), params),
            moisture: Self::moisture_suppression(cell.moisture, climate.precipitation, params),
            isolation: Self::isolation(isolated_fraction, params),
            weather: Self::weather(climate.humidity, cell.intensity, params),
        }
    }

    /// `c × (1 − fuel_fraction)²`
    #[must_use]
    pub fn fuel_depletion(fuel_fraction: f32, params: &FireDynamicsParams) -> f32 {
        let spent = 1.0 - clamp_unit(fuel_fraction);
        clamp_unit(params.depletion_coefficient * spent * spent)
    }

    /// Wet fuel and rainfall, `c_m × moisture² + c_p × precipitation`
    #[must_use]
    pub fn moisture_suppression(moisture: f32, precipitation: f32, params: &FireDynamicsParams) -> f32 {
        let m = clamp_unit(moisture);
        clamp_unit(
            params.moisture_extinction_coefficient * m * m
                + params.precipitation_extinction_coefficient * sanitize(precipitation),
        )
    }

    /// `c × isolated_fraction`
    #[must_use]
    pub fn isolation(isolated_fraction: f32, params: &FireDynamicsParams) -> f32 {
        clamp_unit(params.isolation_coefficient * clamp_unit(isolated_fraction))
    }

    /// Humid air smothers weak fires: `c × humidity × (1 − intensity)`
    #[must_use]
    pub fn weather(humidity: f32, intensity: f32, params: &FireDynamicsParams) -> f32 {
        clamp_unit(
            params.weather_extinction_coefficient
                * clamp_unit(humidity)
                * (1.0 - clamp_unit(intensity)),
        )
    }

    /// All components combined as independent trials
    #[must_use]
    pub fn combined(&self) -> f32 {
        combine_independent([self.fuel_depletion, self.moisture, self.isolation, self.weather])
    }
}
