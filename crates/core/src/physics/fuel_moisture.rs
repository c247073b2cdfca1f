//! Fuel moisture dynamics
//!
//! Moisture relaxes exponentially toward an equilibrium set by humidity,
//! dries through evaporation and is replenished by rain:
//!
//! ```text
//! dM/dt = (EMC − M) / τ − evaporation + wetting
//! ```
//!
//! # References
//! - Nelson, R.M. (2000). "Prediction of diurnal change in 10-h fuel stick
//!   moisture content." Canadian Journal of Forest Research, 30(7), 1071-1087
//! - Viney, N.R. (1991). "A review of fine fuel moisture modelling."
//!   International Journal of Wildland Fire, 1(4), 215-234

use super::{clamp_unit, sanitize, FireDynamicsParams};
use crate::core_types::Climate;

/// Equilibrium moisture content for fine fuels (EMC ≈ 0.85 × humidity)
#[must_use]
pub fn equilibrium_moisture(humidity: f32) -> f32 {
    0.85 * clamp_unit(humidity)
}

/// Advance fuel moisture by one step.
///
/// # Arguments
/// * `moisture` - Current fuel moisture (0-1)
/// * `temperature` - Fuel temperature (°C); hotter fuel evaporates faster
/// * `dt` - Step length (s)
/// * `climate` - Climate of the current tick
/// * `params` - Model coefficients
///
/// # Returns
/// Updated moisture clamped to [0, 1]
#[must_use]
pub fn update_moisture(
    moisture: f32,
    temperature: f32,
    dt: f32,
    climate: &Climate,
    params: &FireDynamicsParams,
) -> f32 {
    let moisture = clamp_unit(moisture);
    let dt = sanitize(dt);
    let humidity = clamp_unit(climate.humidity);

    // Exponential approach to EMC: exact for any step length
    let emc = equilibrium_moisture(humidity);
    let relaxation = (emc - moisture) * (1.0 - (-dt / params.moisture_time_constant).exp());

    // Warm, windy, dry air pulls moisture out of the fuel
    let heat = 1.0 + sanitize(temperature - 20.0) / 10.0;
    let ventilation = 1.0 + 0.1 * sanitize(climate.wind.speed);
    let evaporation =
        params.evaporation_rate * heat * ventilation * (1.0 - humidity) * moisture * dt;

    // mm/h of rain over the step
    let wetting = params.precipitation_wetting * sanitize(climate.precipitation) * dt / 3600.0;

    let next = moisture + relaxation - sanitize(evaporation) + sanitize(wetting);
    if next.is_nan() {
        moisture
    } else {
        next.clamp(0.0, 1.0)
    }
}
