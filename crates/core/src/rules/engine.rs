//! Rule engine: applies the configured rule set to one cell per call

use super::burning::{CombustionRule, HeatExchangeRule};
use super::config::{
    BurningRuleKind, ExtinctionRuleKind, IgnitionRuleKind, RecoveryRuleKind, RulesConfig,
};
use super::extinction::{
    FuelDepletionRule, MoistureSuppressionRule, NeighborIsolationRule, TemperatureDecayRule,
};
use super::ignition::{EmberRule, NeighborSpreadRule, SparkRule};
use super::recovery::{RegrowthRule, SeedDispersalRule, SuccessionRule};
use super::rule::{Rule, RuleCategory, RuleContext};
use crate::core_types::{Cell, CellRng, CellState};
use crate::error::{FireSimError, Result};
use crate::simulation::events::FireEvent;

/// New contents of one cell after a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellUpdate {
    pub cell: Cell,
    /// Event of the cell's state transition, if any
    pub event: Option<FireEvent>,
}

/// Ordered rule lists per category.
///
/// Within a category rules are tried in priority order and the first rule
/// that applies wins. A cell makes at most one state transition per tick:
/// once it has changed state, later state-changing categories are skipped,
/// while burning rules still evolve its attributes.
#[derive(Debug)]
pub struct RuleEngine {
    /// Indexed like [`RuleCategory::ORDER`]
    categories: [Vec<Box<dyn Rule>>; 4],
}

impl RuleEngine {
    /// Build an engine from explicit rules, grouped by their category in
    /// the order given
    #[must_use]
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        let mut categories: [Vec<Box<dyn Rule>>; 4] = Default::default();
        for rule in rules {
            let slot = RuleCategory::ORDER
                .iter()
                .position(|&c| c == rule.category())
                .unwrap_or_default();
            categories[slot].push(rule);
        }
        Self { categories }
    }

    /// Build the rule set described by `config`; disabled categories are empty
    #[must_use]
    pub fn from_config(config: &RulesConfig) -> Self {
        let mut rules: Vec<Box<dyn Rule>> = Vec::new();

        if config.ignition.enabled {
            let ignition = &config.ignition;
            for kind in &ignition.order {
                rules.push(match kind {
                    IgnitionRuleKind::NeighborSpread => Box::new(NeighborSpreadRule),
                    IgnitionRuleKind::Ember => Box::new(EmberRule {
                        probability: ignition.ember_probability,
                        min_alignment: ignition.ember_min_alignment,
                        min_wind_speed: ignition.ember_min_wind_speed,
                    }),
                    IgnitionRuleKind::Spark => Box::new(SparkRule {
                        probability: ignition.spark_probability,
                    }),
                });
            }
        }

        if config.burning.enabled {
            for kind in &config.burning.order {
                rules.push(match kind {
                    BurningRuleKind::Combustion => Box::new(CombustionRule),
                    BurningRuleKind::HeatExchange => Box::new(HeatExchangeRule),
                });
            }
        }

        if config.extinction.enabled {
            for kind in &config.extinction.order {
                rules.push(match kind {
                    ExtinctionRuleKind::FuelDepletion => Box::new(FuelDepletionRule {
                        burnout_fuel: config.extinction.burnout_fuel,
                    }),
                    ExtinctionRuleKind::MoistureSuppression => Box::new(MoistureSuppressionRule),
                    ExtinctionRuleKind::NeighborIsolation => Box::new(NeighborIsolationRule),
                    ExtinctionRuleKind::TemperatureDecay => Box::new(TemperatureDecayRule),
                });
            }
        }

        if config.recovery.enabled {
            let recovery = &config.recovery;
            let fuel_fraction = recovery.regrowth_fuel_fraction;
            for kind in &recovery.order {
                rules.push(match kind {
                    RecoveryRuleKind::SeedDispersal => Box::new(SeedDispersalRule {
                        probability: recovery.seed_dispersal_probability,
                        fuel_fraction,
                    }),
                    RecoveryRuleKind::Regrowth => Box::new(RegrowthRule { fuel_fraction }),
                    RecoveryRuleKind::Succession => Box::new(SuccessionRule {
                        probability: recovery.succession_probability,
                        fuel_fraction,
                    }),
                });
            }
        }

        Self::new(rules)
    }

    /// Names of the active rules in evaluation order
    #[must_use]
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.categories
            .iter()
            .flat_map(|rules| rules.iter().map(|r| r.name()))
            .collect()
    }

    /// Rules of one category in priority order
    #[must_use]
    pub fn rules(&self, category: RuleCategory) -> &[Box<dyn Rule>] {
        let slot = RuleCategory::ORDER
            .iter()
            .position(|&c| c == category)
            .unwrap_or_default();
        &self.categories[slot]
    }

    /// Compute the next contents of `cell`.
    ///
    /// # Errors
    ///
    /// Returns [`FireSimError::IllegalTransition`] if a rule moves the cell
    /// outside the legal state machine, changes state from the burning
    /// category, makes non-flammable vegetation Tree or Burning, or rewrites
    /// the cell's position or vegetation.
    pub fn evaluate(&self, cell: &Cell, ctx: &RuleContext<'_>) -> Result<CellUpdate> {
        let mut current = *cell;
        let mut event = None;
        let mut transitioned = false;

        for (category, rules) in RuleCategory::ORDER.iter().zip(&self.categories) {
            if rules.is_empty() || (transitioned && category.changes_state()) {
                continue;
            }
            let mut rng = CellRng::for_cell(ctx.seed, cell.position, ctx.tick, category.stream_id());
            for rule in rules {
                let Some(outcome) = rule.apply(&current, ctx, &mut rng) else {
                    continue;
                };
                let next = outcome.cell;
                check_transition(rule.as_ref(), *category, &current, &next, ctx.tick)?;
                if next.state != current.state {
                    transitioned = true;
                }
                if outcome.event.is_some() {
                    event = outcome.event;
                }
                current = next;
                break;
            }
        }

        Ok(CellUpdate {
            cell: current,
            event,
        })
    }
}

fn check_transition(
    rule: &dyn Rule,
    category: RuleCategory,
    from: &Cell,
    to: &Cell,
    tick: u64,
) -> Result<()> {
    let changed = from.state != to.state;
    let same_identity = from.position == to.position && from.vegetation == to.vegetation;
    let legal = same_identity
        && from.state.can_transition_to(to.state)
        && (category.changes_state() || !changed)
        && !(changed && !to.is_flammable() && matches!(to.state, CellState::Tree | CellState::Burning));
    if legal {
        Ok(())
    } else {
        Err(FireSimError::IllegalTransition {
            position: from.position,
            tick,
            rule: rule.name(),
            from: from.state,
            to: to.state,
        })
    }
}
