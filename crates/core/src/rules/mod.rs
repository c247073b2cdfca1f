//! Rule-based cell state machine
//!
//! Each tick every cell passes through four rule categories in fixed order:
//!
//! 1. Ignition (Tree → Burning)
//! 2. Burning (fuel, intensity, temperature and moisture; no state change)
//! 3. Extinction (Burning → Burnt)
//! 4. Recovery (Burnt/Empty → Tree)
//!
//! Rules are `Box<dyn Rule>` objects built from [`RulesConfig`]; custom rules
//! can be passed to [`RuleEngine::new`].

pub mod burning;
pub mod config;
pub mod engine;
pub mod extinction;
pub mod ignition;
pub mod recovery;
mod rule;
#[cfg(test)]
pub(crate) mod scene;

pub use burning::{CombustionRule, HeatExchangeRule};
pub use config::{
    BurningRuleKind, BurningRulesConfig, ExtinctionRuleKind, ExtinctionRulesConfig,
    IgnitionRuleKind, IgnitionRulesConfig, RecoveryRuleKind, RecoveryRulesConfig, RulesConfig,
};
pub use engine::{CellUpdate, RuleEngine};
pub use extinction::{
    FuelDepletionRule, MoistureSuppressionRule, NeighborIsolationRule, TemperatureDecayRule,
};
pub use ignition::{EmberRule, NeighborSpreadRule, SparkRule};
pub use recovery::{RegrowthRule, SeedDispersalRule, SuccessionRule};
pub use rule::{NeighborCell, Rule, RuleCategory, RuleContext, RuleOutcome};
