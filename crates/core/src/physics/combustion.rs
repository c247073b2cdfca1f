//! Combustion of burning cells
//!
//! A burning cell consumes `consumption_rate × burn_rate × intensity × dt`
//! fuel per step. Intensity relaxes toward what the remaining, partially
//! wet fuel can sustain, `fuel_fraction × (1 − moisture)`, and the flame
//! temperature follows intensity. Once fuel is gone intensity decays to zero
//! and the cell becomes eligible for burnout.

use super::ignition::{moisture_factor, slope_factor, wind_factor};
use super::{clamp_unit, sanitize, FireDynamicsParams};
use crate::core_types::{Cell, CellState, Climate};
use crate::grid::{Grid, Terrain};
use rayon::prelude::*;

/// Attributes of a burning cell after one combustion step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombustionState {
    /// Remaining fuel (0 to fuel load)
    pub fuel: f32,
    /// Fire intensity (0-1)
    pub intensity: f32,
    /// Flame temperature (°C)
    pub temperature: f32,
}

/// Advance combustion of a burning cell by `dt` seconds.
///
/// # Arguments
/// * `cell` - Burning cell before the step
/// * `dt` - Step length (s)
/// * `ambient_temperature` - Air temperature (°C)
/// * `params` - Model coefficients
#[must_use]
pub fn burn(
    cell: &Cell,
    dt: f32,
    ambient_temperature: f32,
    params: &FireDynamicsParams,
) -> CombustionState {
    let dt = sanitize(dt);
    let load = cell.vegetation.fuel_load();
    let consumed =
        params.consumption_rate * cell.vegetation.burn_rate() * clamp_unit(cell.intensity) * dt;
    let fuel = (sanitize(cell.fuel) - sanitize(consumed)).clamp(0.0, load);

    let fuel_fraction = if load > 0.0 { fuel / load } else { 0.0 };
    let sustainable = clamp_unit(fuel_fraction * (1.0 - clamp_unit(cell.moisture)));
    let alpha = 1.0 - (-params.intensity_relaxation * dt).exp();
    let intensity = clamp_unit(cell.intensity + (sustainable - cell.intensity) * alpha);

    CombustionState {
        fuel,
        intensity,
        temperature: flame_temperature(intensity, ambient_temperature, params),
    }
}

/// Flame temperature at a given intensity (°C)
#[must_use]
pub fn flame_temperature(intensity: f32, ambient_temperature: f32, params: &FireDynamicsParams) -> f32 {
    ambient_temperature + params.flame_temperature_rise * clamp_unit(intensity)
}

/// Newtonian cooling toward ambient: `T_a + (T − T_a) × exp(−k × dt)`
#[must_use]
pub fn cool(temperature: f32, ambient_temperature: f32, dt: f32, rate: f32) -> f32 {
    let cooled = ambient_temperature + (temperature - ambient_temperature) * (-rate * sanitize(dt)).exp();
    if cooled.is_finite() {
        cooled
    } else {
        ambient_temperature
    }
}

/// Head-fire spread rate of a burning cell (m/s).
///
/// `base_rate × burn_rate × intensity × M × W_max × S_max`, where the wind
/// and slope multipliers are taken in their most favorable direction.
#[must_use]
pub fn spread_rate(cell: &Cell, slope_degrees: f32, climate: &Climate, params: &FireDynamicsParams) -> f32 {
    if cell.state != CellState::Burning {
        return 0.0;
    }
    let cap = params.max_directional_factor;
    let tan_phi = slope_degrees.to_radians().tan().abs();
    let slope = slope_factor(tan_phi, 1.0, params.slope_coefficient, params.slope_exponent, cap);
    let wind = wind_factor(climate.wind.speed, 1.0, params.wind_coefficient, cap);
    sanitize(
        params.base_spread_rate
            * cell.vegetation.burn_rate()
            * clamp_unit(cell.intensity)
            * moisture_factor(cell.moisture, params.moisture_coefficient)
            * wind
            * slope,
    )
}

/// Fastest spread rate over all burning cells (m/s), 0 when nothing burns
#[must_use]
pub fn max_spread_rate(
    grid: &Grid,
    terrain: &Terrain,
    climate: &Climate,
    params: &FireDynamicsParams,
) -> f32 {
    grid.cells()
        .par_iter()
        .filter(|cell| cell.state == CellState::Burning)
        .map(|cell| spread_rate(cell, terrain.slope(cell.position), climate, params))
        .reduce(|| 0.0, f32::max)
}
