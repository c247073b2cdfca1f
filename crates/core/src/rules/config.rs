//! Per-category rule configuration

use crate::error::{FireSimError, Result};
use serde::{Deserialize, Serialize};

/// Ignition rules, in the order they can be listed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IgnitionRuleKind {
    NeighborSpread,
    Ember,
    Spark,
}

/// Burning rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BurningRuleKind {
    Combustion,
    HeatExchange,
}

/// Extinction rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtinctionRuleKind {
    FuelDepletion,
    MoistureSuppression,
    NeighborIsolation,
    TemperatureDecay,
}

/// Recovery rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecoveryRuleKind {
    SeedDispersal,
    Regrowth,
    Succession,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnitionRulesConfig {
    pub enabled: bool,
    /// Priority order; the first rule that fires wins
    pub order: Vec<IgnitionRuleKind>,
    /// Firebrand ignition probability per reference step from one
    /// full-intensity source, before wind and moisture
    pub ember_probability: f32,
    /// Minimum cosine between wind bearing and source→target direction
    pub ember_min_alignment: f32,
    /// Wind speed below which no embers are carried (m/s)
    pub ember_min_wind_speed: f32,
    /// Spontaneous ignition probability per reference step
    pub spark_probability: f32,
}

impl Default for IgnitionRulesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            order: vec![
                IgnitionRuleKind::NeighborSpread,
                IgnitionRuleKind::Ember,
                IgnitionRuleKind::Spark,
            ],
            ember_probability: 0.05,
            ember_min_alignment: 0.7,
            ember_min_wind_speed: 5.0,
            spark_probability: 1.0e-6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurningRulesConfig {
    pub enabled: bool,
    pub order: Vec<BurningRuleKind>,
}

impl Default for BurningRulesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            order: vec![BurningRuleKind::Combustion, BurningRuleKind::HeatExchange],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtinctionRulesConfig {
    pub enabled: bool,
    pub order: Vec<ExtinctionRuleKind>,
    /// Fuel below which a fire burns out deterministically
    pub burnout_fuel: f32,
}

impl Default for ExtinctionRulesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            order: vec![
                ExtinctionRuleKind::FuelDepletion,
                ExtinctionRuleKind::MoistureSuppression,
                ExtinctionRuleKind::NeighborIsolation,
                ExtinctionRuleKind::TemperatureDecay,
            ],
            burnout_fuel: 1.0e-3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryRulesConfig {
    pub enabled: bool,
    pub order: Vec<RecoveryRuleKind>,
    /// Probability per reference step when every neighbor is a tree
    pub seed_dispersal_probability: f32,
    /// Colonization probability of bare flammable ground per reference step
    pub succession_probability: f32,
    /// Fuel of a regrown cell as a fraction of the vegetation's fuel load
    pub regrowth_fuel_fraction: f32,
}

impl Default for RecoveryRulesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            order: vec![
                RecoveryRuleKind::SeedDispersal,
                RecoveryRuleKind::Regrowth,
                RecoveryRuleKind::Succession,
            ],
            seed_dispersal_probability: 0.02,
            succession_probability: 1.0e-3,
            regrowth_fuel_fraction: 0.3,
        }
    }
}

/// Rule set of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub ignition: IgnitionRulesConfig,
    pub burning: BurningRulesConfig,
    pub extinction: ExtinctionRulesConfig,
    pub recovery: RecoveryRulesConfig,
}

impl RulesConfig {
    /// Everything off except burning; useful for observing a fixed fire
    #[must_use]
    pub fn static_fire() -> Self {
        let mut config = Self::default();
        config.ignition.enabled = false;
        config.extinction.enabled = false;
        config
    }

    /// # Errors
    ///
    /// Returns [`FireSimError::InvalidConfig`] for probabilities outside
    /// [0, 1], negative thresholds or a rule listed twice in one order.
    pub fn validate(&self) -> Result<()> {
        let probabilities = [
            ("rules.ignition.ember_probability", self.ignition.ember_probability),
            ("rules.ignition.spark_probability", self.ignition.spark_probability),
            (
                "rules.recovery.seed_dispersal_probability",
                self.recovery.seed_dispersal_probability,
            ),
            (
                "rules.recovery.succession_probability",
                self.recovery.succession_probability,
            ),
            (
                "rules.recovery.regrowth_fuel_fraction",
                self.recovery.regrowth_fuel_fraction,
            ),
            ("rules.extinction.burnout_fuel", self.extinction.burnout_fuel),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(FireSimError::invalid_config(
                    field,
                    format!("must be within [0, 1], got {value}"),
                ));
            }
        }
        if !(-1.0..=1.0).contains(&self.ignition.ember_min_alignment) {
            return Err(FireSimError::invalid_config(
                "rules.ignition.ember_min_alignment",
                format!("must be a cosine in [-1, 1], got {}", self.ignition.ember_min_alignment),
            ));
        }
        if !self.ignition.ember_min_wind_speed.is_finite() || self.ignition.ember_min_wind_speed < 0.0 {
            return Err(FireSimError::invalid_config(
                "rules.ignition.ember_min_wind_speed",
                "must be finite and non-negative",
            ));
        }

        check_unique("rules.ignition.order", &self.ignition.order)?;
        check_unique("rules.burning.order", &self.burning.order)?;
        check_unique("rules.extinction.order", &self.extinction.order)?;
        check_unique("rules.recovery.order", &self.recovery.order)
    }
}

fn check_unique<T: PartialEq + std::fmt::Debug>(field: &'static str, order: &[T]) -> Result<()> {
    for (i, kind) in order.iter().enumerate() {
        if order[..i].contains(kind) {
            return Err(FireSimError::invalid_config(
                field,
                format!("{kind:?} listed more than once"),
            ));
        }
    }
    Ok(())
}
