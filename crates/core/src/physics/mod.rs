//! Fire dynamics model
//!
//! Pure, stateless functions turning cell, terrain and climate inputs into
//! probabilities and attribute updates. Nothing here samples randomness: the
//! rule engine owns the per-cell generators and feeds the probabilities
//! computed here into them.
//!
//! Every factor passes through [`sanitize`] so degenerate inputs (NaN, ±∞,
//! negative multipliers) never leak into a probability. Probabilities are
//! defined per [`FireDynamicsParams::reference_time_step`] and rescaled to the
//! actual step with [`scale_probability`].

pub mod combustion;
pub mod extinction;
pub mod fuel_moisture;
pub mod heat_transfer;
pub mod ignition;

pub use combustion::{burn, cool, flame_temperature, max_spread_rate, spread_rate, CombustionState};
pub use extinction::ExtinctionFactors;
pub use fuel_moisture::{equilibrium_moisture, update_moisture};
pub use heat_transfer::{convective_heat, effective_moisture, preheat, radiative_heat, HeatSource};
pub use ignition::{
    moisture_factor, oxygen_factor, slope_factor, source_weight, temperature_factor,
    vegetation_factor, wind_factor, IgnitionFactors,
};

use crate::error::{FireSimError, Result};
use serde::{Deserialize, Serialize};

/// Replace NaN, ±∞ and negative values with 0
#[inline]
#[must_use]
pub fn sanitize(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Sanitize and clamp into [0, 1]
#[inline]
#[must_use]
pub fn clamp_unit(value: f32) -> f32 {
    sanitize(value).min(1.0)
}

/// Cap a positive multiplier. `+∞` saturates at the cap, NaN becomes 0.
#[inline]
#[must_use]
pub fn cap_factor(value: f32, cap: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        sanitize(value.min(cap))
    }
}

/// Rescale a per-reference-step probability to a step of length `dt`.
///
/// Treats the reference probability as a constant hazard rate:
/// `p_dt = 1 − (1 − p_ref)^(dt / reference)`.
///
/// # Arguments
/// * `p` - Probability over one reference step
/// * `dt` - Actual step length (s)
/// * `reference` - Reference step length (s)
#[must_use]
pub fn scale_probability(p: f32, dt: f32, reference: f32) -> f32 {
    let p = clamp_unit(p);
    let ratio = sanitize(dt / reference);
    if p >= 1.0 {
        return if ratio > 0.0 { 1.0 } else { 0.0 };
    }
    clamp_unit(1.0 - (1.0 - p).powf(ratio))
}

/// Combine independent trials: `1 − Π(1 − pᵢ)`
#[must_use]
pub fn combine_independent(probabilities: impl IntoIterator<Item = f32>) -> f32 {
    let survival: f32 = probabilities
        .into_iter()
        .map(|p| 1.0 - clamp_unit(p))
        .product();
    clamp_unit(1.0 - survival)
}

/// Coefficients of the fire dynamics model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireDynamicsParams {
    // Ignition
    /// Ignition probability from one full-intensity orthogonal neighbor per
    /// reference step under neutral conditions
    pub base_ignition_probability: f32,
    /// Moisture damping `k_m` in `exp(−k_m × moisture)`
    pub moisture_coefficient: f32,
    /// Temperature at which the logistic temperature factor is 0.5 (°C)
    pub critical_temperature: f32,
    /// Width of the logistic temperature response (°C)
    pub temperature_scale: f32,
    pub slope_coefficient: f32,
    pub slope_exponent: f32,
    /// Wind coefficient (s/m)
    pub wind_coefficient: f32,
    /// Atmospheric scale height for the oxygen factor (m)
    pub oxygen_scale_height: f32,
    /// Upper bound for the slope and wind multipliers
    pub max_directional_factor: f32,
    /// Step length the per-step probabilities are defined for (s)
    pub reference_time_step: f32,

    // Heat transfer
    /// Temperature rise at one cell distance from a full-intensity source (°C)
    pub radiative_coefficient: f32,
    /// Convective temperature rise per unit intensity at one cell (°C)
    pub convective_coefficient: f32,
    /// Drying rate of effective moisture per °C of preheating
    pub drying_coefficient: f32,

    // Moisture
    /// Evaporation rate at neutral conditions (fraction per second)
    pub evaporation_rate: f32,
    /// Moisture gained per mm of rain
    pub precipitation_wetting: f32,
    /// Relaxation time toward equilibrium moisture (s)
    pub moisture_time_constant: f32,

    // Combustion
    /// Fuel consumed per second at burn rate 1 and intensity 1
    pub consumption_rate: f32,
    /// Rate at which intensity follows the available fuel (1/s)
    pub intensity_relaxation: f32,
    /// Flame temperature above ambient at intensity 1 (°C)
    pub flame_temperature_rise: f32,
    /// Newtonian cooling rate of burnt cells (1/s)
    pub cooling_rate: f32,
    /// Spread rate at burn rate 1, intensity 1, neutral conditions (m/s)
    pub base_spread_rate: f32,

    // Extinction
    /// Weight of the fuel depletion component `(1 − fuel/fuel_load)²`
    pub depletion_coefficient: f32,
    /// Weight of fuel moisture in suppression
    pub moisture_extinction_coefficient: f32,
    /// Suppression per mm/h of precipitation
    pub precipitation_extinction_coefficient: f32,
    /// Weight of neighbor isolation
    pub isolation_coefficient: f32,
    /// Weight of humidity-driven self-extinction
    pub weather_extinction_coefficient: f32,
}

impl Default for FireDynamicsParams {
    fn default() -> Self {
        Self {
            base_ignition_probability: 0.6,
            moisture_coefficient: 3.0,
            critical_temperature: 25.0,
            temperature_scale: 8.0,
            slope_coefficient: 3.533,
            slope_exponent: 1.2,
            wind_coefficient: 0.1783,
            oxygen_scale_height: 8434.0,
            max_directional_factor: 10.0,
            reference_time_step: 1.0,

            radiative_coefficient: 15.0,
            convective_coefficient: 8.0,
            drying_coefficient: 0.02,

            evaporation_rate: 1.0e-4,
            precipitation_wetting: 0.02,
            moisture_time_constant: 3600.0,

            consumption_rate: 0.1,
            intensity_relaxation: 0.5,
            flame_temperature_rise: 800.0,
            cooling_rate: 0.05,
            base_spread_rate: 0.5,

            depletion_coefficient: 0.1,
            moisture_extinction_coefficient: 0.3,
            precipitation_extinction_coefficient: 0.05,
            isolation_coefficient: 0.2,
            weather_extinction_coefficient: 0.05,
        }
    }
}

impl FireDynamicsParams {
    /// Check that every coefficient is finite and non-negative, and that
    /// scales and time constants are strictly positive.
    ///
    /// # Errors
    ///
    /// Returns [`FireSimError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let non_negative: [(&'static str, f32); 21] = [
            ("dynamics.base_ignition_probability", self.base_ignition_probability),
            ("dynamics.moisture_coefficient", self.moisture_coefficient),
            ("dynamics.slope_coefficient", self.slope_coefficient),
            ("dynamics.slope_exponent", self.slope_exponent),
            ("dynamics.wind_coefficient", self.wind_coefficient),
            ("dynamics.max_directional_factor", self.max_directional_factor),
            ("dynamics.radiative_coefficient", self.radiative_coefficient),
            ("dynamics.convective_coefficient", self.convective_coefficient),
            ("dynamics.drying_coefficient", self.drying_coefficient),
            ("dynamics.evaporation_rate", self.evaporation_rate),
            ("dynamics.precipitation_wetting", self.precipitation_wetting),
            ("dynamics.consumption_rate", self.consumption_rate),
            ("dynamics.intensity_relaxation", self.intensity_relaxation),
            ("dynamics.flame_temperature_rise", self.flame_temperature_rise),
            ("dynamics.cooling_rate", self.cooling_rate),
            ("dynamics.base_spread_rate", self.base_spread_rate),
            ("dynamics.depletion_coefficient", self.depletion_coefficient),
            ("dynamics.moisture_extinction_coefficient", self.moisture_extinction_coefficient),
            (
                "dynamics.precipitation_extinction_coefficient",
                self.precipitation_extinction_coefficient,
            ),
            ("dynamics.isolation_coefficient", self.isolation_coefficient),
            ("dynamics.weather_extinction_coefficient", self.weather_extinction_coefficient),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(FireSimError::invalid_config(
                    field,
                    format!("must be finite and non-negative, got {value}"),
                ));
            }
        }

        let positive: [(&'static str, f32); 4] = [
            ("dynamics.temperature_scale", self.temperature_scale),
            ("dynamics.oxygen_scale_height", self.oxygen_scale_height),
            ("dynamics.reference_time_step", self.reference_time_step),
            ("dynamics.moisture_time_constant", self.moisture_time_constant),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(FireSimError::invalid_config(
                    field,
                    format!("must be positive, got {value}"),
                ));
            }
        }

        if !self.critical_temperature.is_finite() {
            return Err(FireSimError::invalid_config(
                "dynamics.critical_temperature",
                "must be finite",
            ));
        }
        if self.base_ignition_probability > 1.0 {
            return Err(FireSimError::invalid_config(
                "dynamics.base_ignition_probability",
                format!("must be at most 1, got {}", self.base_ignition_probability),
            ));
        }
        Ok(())
    }

    /// Rescale a per-reference-step probability to `dt`
    #[must_use]
    pub fn per_step(&self, p: f32, dt: f32) -> f32 {
        scale_probability(p, dt, self.reference_time_step)
    }
}
