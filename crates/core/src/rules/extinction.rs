//! Extinction rules (Burning → Burnt)

use super::rule::{Rule, RuleCategory, RuleContext, RuleOutcome};
use crate::core_types::{Cell, CellRng, CellState};
use crate::physics::ExtinctionFactors;
use crate::simulation::events::{ExtinctionCause, FireEvent};

fn extinguish(cell: &Cell, event: FireEvent) -> RuleOutcome {
    let mut next = *cell;
    next.state = CellState::Burnt;
    next.intensity = 0.0;
    RuleOutcome::transition(next, event)
}

fn extinction(cell: &Cell, cause: ExtinctionCause) -> RuleOutcome {
    extinguish(
        cell,
        FireEvent::Extinction {
            position: cell.position,
            cause,
        },
    )
}

/// Burnout once fuel is exhausted; stochastic as fuel runs low
#[derive(Debug, Clone, Copy)]
pub struct FuelDepletionRule {
    /// Fuel at or below which burnout is certain
    pub burnout_fuel: f32,
}

impl Rule for FuelDepletionRule {
    fn name(&self) -> &'static str {
        "fuel_depletion"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Extinction
    }

    fn apply(&self, cell: &Cell, ctx: &RuleContext<'_>, rng: &mut CellRng) -> Option<RuleOutcome> {
        if cell.state != CellState::Burning {
            return None;
        }
        let burnout = FireEvent::Burnout {
            position: cell.position,
        };
        if cell.fuel <= self.burnout_fuel {
            return Some(extinguish(cell, burnout));
        }
        let p = ExtinctionFactors::fuel_depletion(cell.fuel_fraction(), ctx.params);
        rng.chance(ctx.per_step(p)).then(|| extinguish(cell, burnout))
    }
}

/// Wet fuel and rain put the fire out
#[derive(Debug, Clone, Copy, Default)]
pub struct MoistureSuppressionRule;

impl Rule for MoistureSuppressionRule {
    fn name(&self) -> &'static str {
        "moisture_suppression"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Extinction
    }

    fn apply(&self, cell: &Cell, ctx: &RuleContext<'_>, rng: &mut CellRng) -> Option<RuleOutcome> {
        if cell.state != CellState::Burning {
            return None;
        }
        let p = ExtinctionFactors::moisture_suppression(
            cell.moisture,
            ctx.climate.precipitation,
            ctx.params,
        );
        rng.chance(ctx.per_step(p))
            .then(|| extinction(cell, ExtinctionCause::MoistureSuppression))
    }
}

/// A fire surrounded by nothing left to burn dies out
#[derive(Debug, Clone, Copy, Default)]
pub struct NeighborIsolationRule;

impl NeighborIsolationRule {
    /// Fraction of neighbors that are neither burning nor unburnt fuel.
    /// A cell without neighbors is fully isolated.
    #[must_use]
    pub fn isolated_fraction(cell: &Cell, ctx: &RuleContext<'_>) -> f32 {
        let neighbors = ctx.neighbors(cell.position);
        if neighbors.is_empty() {
            return 1.0;
        }
        let isolated = neighbors
            .iter()
            .filter(|n| !matches!(n.cell.state, CellState::Burning | CellState::Tree))
            .count();
        isolated as f32 / neighbors.len() as f32
    }
}

impl Rule for NeighborIsolationRule {
    fn name(&self) -> &'static str {
        "neighbor_isolation"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Extinction
    }

    fn apply(&self, cell: &Cell, ctx: &RuleContext<'_>, rng: &mut CellRng) -> Option<RuleOutcome> {
        if cell.state != CellState::Burning {
            return None;
        }
        let p = ExtinctionFactors::isolation(Self::isolated_fraction(cell, ctx), ctx.params);
        rng.chance(ctx.per_step(p))
            .then(|| extinction(cell, ExtinctionCause::NeighborIsolation))
    }
}

/// Weak fires in humid air cool below sustained combustion
#[derive(Debug, Clone, Copy, Default)]
pub struct TemperatureDecayRule;

impl Rule for TemperatureDecayRule {
    fn name(&self) -> &'static str {
        "temperature_decay"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Extinction
    }

    fn apply(&self, cell: &Cell, ctx: &RuleContext<'_>, rng: &mut CellRng) -> Option<RuleOutcome> {
        if cell.state != CellState::Burning {
            return None;
        }
        let p = ExtinctionFactors::weather(ctx.climate.humidity, cell.intensity, ctx.params);
        rng.chance(ctx.per_step(p))
            .then(|| extinction(cell, ExtinctionCause::TemperatureDecay))
    }
}
