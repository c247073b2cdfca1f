//! Climate inputs consumed by the engine
//!
//! Climate is a read-only input per tick. The engine never mutates it; a
//! [`ClimateProvider`] supplies the value for each tick, which lets callers
//! script seasonal change or weather fronts without touching engine state.

use crate::error::{FireSimError, Result};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Season of the year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Following season
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Spring => Self::Summer,
            Self::Summer => Self::Autumn,
            Self::Autumn => Self::Winter,
            Self::Winter => Self::Spring,
        }
    }

    /// Multiplier applied to vegetation recovery rates
    ///
    /// Spring flush grows fastest, winter dormancy almost stops regrowth.
    #[must_use]
    pub fn growth_factor(self) -> f32 {
        match self {
            Self::Spring => 1.5,
            Self::Summer => 1.0,
            Self::Autumn => 0.5,
            Self::Winter => 0.1,
        }
    }
}

/// Wind vector described by bearing and speed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    /// Bearing the wind blows toward (degrees, 0 = north, 90 = east)
    pub direction: f32,
    /// Wind speed (m/s)
    pub speed: f32,
}

impl Wind {
    /// Create a wind blowing toward `direction` degrees at `speed` m/s
    #[must_use]
    pub fn new(direction: f32, speed: f32) -> Self {
        Self { direction, speed }
    }

    /// Still air
    #[must_use]
    pub fn calm() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Unit vector of the wind bearing in grid axes (`+x` east, `+y` north)
    #[must_use]
    pub fn unit_vector(&self) -> Vector2<f32> {
        let bearing = self.direction.to_radians();
        Vector2::new(bearing.sin(), bearing.cos())
    }

    /// Cosine of the angle between the wind bearing and a grid offset.
    ///
    /// Returns NaN for a zero offset; callers sanitize factors derived from it.
    #[must_use]
    pub fn alignment(&self, dx: i32, dy: i32) -> f32 {
        let offset = Vector2::new(dx as f32, dy as f32);
        self.unit_vector().dot(&offset) / offset.norm()
    }
}

/// Climate state for a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Climate {
    /// Current season
    pub season: Season,
    /// Surface wind
    pub wind: Wind,
    /// Relative humidity (0-1)
    pub humidity: f32,
    /// Precipitation rate (mm/h)
    pub precipitation: f32,
    /// Ambient air temperature (°C)
    pub temperature: f32,
}

impl Default for Climate {
    fn default() -> Self {
        Self {
            season: Season::Summer,
            wind: Wind::calm(),
            humidity: 0.4,
            precipitation: 0.0,
            temperature: 25.0,
        }
    }
}

impl Climate {
    /// Check that every field is physically meaningful.
    ///
    /// # Errors
    ///
    /// Returns [`FireSimError::InvalidConfig`] for non-finite values,
    /// humidity outside 0-1, or negative wind speed / precipitation.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.humidity) {
            return Err(FireSimError::invalid_config(
                "climate.humidity",
                format!("must be within [0, 1], got {}", self.humidity),
            ));
        }
        if !self.wind.speed.is_finite() || self.wind.speed < 0.0 {
            return Err(FireSimError::invalid_config(
                "climate.wind.speed",
                format!("must be finite and non-negative, got {}", self.wind.speed),
            ));
        }
        if !self.wind.direction.is_finite() {
            return Err(FireSimError::invalid_config(
                "climate.wind.direction",
                "must be finite",
            ));
        }
        if !self.precipitation.is_finite() || self.precipitation < 0.0 {
            return Err(FireSimError::invalid_config(
                "climate.precipitation",
                format!("must be finite and non-negative, got {}", self.precipitation),
            ));
        }
        if !self.temperature.is_finite() {
            return Err(FireSimError::invalid_config(
                "climate.temperature",
                "must be finite",
            ));
        }
        Ok(())
    }
}

/// Supplies the climate for each tick
pub trait ClimateProvider: Send {
    /// Climate to use for the tick starting at `elapsed_time` seconds.
    ///
    /// # Arguments
    ///
    /// * `step` - Index of the tick about to run
    /// * `elapsed_time` - Simulation time at the start of the tick (s)
    /// * `previous` - Climate used by the previous tick
    fn climate_for(&mut self, step: u64, elapsed_time: f32, previous: &Climate) -> Climate;
}

/// Climate that never changes
#[derive(Debug, Clone, Copy)]
pub struct ConstantClimate(pub Climate);

impl ClimateProvider for ConstantClimate {
    fn climate_for(&mut self, _step: u64, _elapsed_time: f32, _previous: &Climate) -> Climate {
        self.0
    }
}

/// Cycles through the seasons with a fixed season length.
///
/// Each season scales the base humidity and precipitation, so summer is dry
/// and winter wet while the wind is left untouched.
#[derive(Debug, Clone, Copy)]
pub struct SeasonalClimate {
    base: Climate,
    season_length: f32,
}

impl SeasonalClimate {
    /// Create a seasonal cycle starting in `base.season`.
    ///
    /// # Arguments
    ///
    /// * `base` - Climate at the start of the run
    /// * `season_length` - Duration of one season in seconds
    #[must_use]
    pub fn new(base: Climate, season_length: f32) -> Self {
        Self {
            base,
            season_length: season_length.max(f32::EPSILON),
        }
    }

    fn season_at(&self, elapsed_time: f32) -> Season {
        let seasons_passed = (elapsed_time / self.season_length).floor().max(0.0) as u64;
        (0..seasons_passed % 4).fold(self.base.season, |season, _| season.next())
    }
}

impl ClimateProvider for SeasonalClimate {
    fn climate_for(&mut self, _step: u64, elapsed_time: f32, _previous: &Climate) -> Climate {
        let season = self.season_at(elapsed_time);
        let (humidity_scale, precipitation_scale, temperature_offset) = match season {
            Season::Spring => (1.1, 1.2, -3.0),
            Season::Summer => (0.7, 0.3, 5.0),
            Season::Autumn => (1.0, 1.0, -2.0),
            Season::Winter => (1.3, 1.8, -10.0),
        };
        Climate {
            season,
            wind: self.base.wind,
            humidity: (self.base.humidity * humidity_scale).clamp(0.0, 1.0),
            precipitation: self.base.precipitation * precipitation_scale,
            temperature: self.base.temperature + temperature_offset,
        }
    }
}
