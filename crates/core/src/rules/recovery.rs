//! Recovery rules (Burnt/Empty → Tree), scaled by the season growth factor

use super::rule::{Rule, RuleCategory, RuleContext, RuleOutcome};
use crate::core_types::{Cell, CellRng, CellState};
use crate::physics::equilibrium_moisture;
use crate::simulation::events::{FireEvent, RecoveryCause};

fn regrow(cell: &Cell, ctx: &RuleContext<'_>, fuel_fraction: f32, cause: RecoveryCause) -> RuleOutcome {
    let mut next = *cell;
    next.state = CellState::Tree;
    next.fuel = cell.vegetation.fuel_load() * fuel_fraction;
    next.intensity = 0.0;
    next.temperature = ctx.climate.temperature;
    next.moisture = equilibrium_moisture(ctx.climate.humidity);
    RuleOutcome::transition(
        next,
        FireEvent::Recovery {
            position: cell.position,
            cause,
        },
    )
}

fn recoverable(cell: &Cell) -> bool {
    cell.is_flammable() && matches!(cell.state, CellState::Burnt | CellState::Empty)
}

/// Seeds from neighboring trees colonize burnt or empty ground
#[derive(Debug, Clone, Copy)]
pub struct SeedDispersalRule {
    /// Probability per reference step with every neighbor a tree
    pub probability: f32,
    pub fuel_fraction: f32,
}

impl Rule for SeedDispersalRule {
    fn name(&self) -> &'static str {
        "seed_dispersal"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Recovery
    }

    fn apply(&self, cell: &Cell, ctx: &RuleContext<'_>, rng: &mut CellRng) -> Option<RuleOutcome> {
        if !recoverable(cell) {
            return None;
        }
        let neighbors = ctx.neighbors(cell.position);
        let trees = neighbors
            .iter()
            .filter(|n| n.cell.state == CellState::Tree)
            .count();
        if trees == 0 {
            return None;
        }
        let tree_fraction = trees as f32 / neighbors.len() as f32;
        let p = self.probability * tree_fraction * ctx.climate.season.growth_factor();
        rng.chance(ctx.per_step(p))
            .then(|| regrow(cell, ctx, self.fuel_fraction, RecoveryCause::SeedDispersal))
    }
}

/// Resprouting of burnt vegetation at its own regrowth rate
#[derive(Debug, Clone, Copy)]
pub struct RegrowthRule {
    pub fuel_fraction: f32,
}

impl Rule for RegrowthRule {
    fn name(&self) -> &'static str {
        "regrowth"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Recovery
    }

    fn apply(&self, cell: &Cell, ctx: &RuleContext<'_>, rng: &mut CellRng) -> Option<RuleOutcome> {
        if cell.state != CellState::Burnt || !cell.is_flammable() {
            return None;
        }
        let p = cell.vegetation.regrowth_rate() * ctx.climate.season.growth_factor();
        rng.chance(ctx.per_step(p))
            .then(|| regrow(cell, ctx, self.fuel_fraction, RecoveryCause::Regrowth))
    }
}

/// Slow colonization of bare flammable ground without nearby trees
#[derive(Debug, Clone, Copy)]
pub struct SuccessionRule {
    pub probability: f32,
    pub fuel_fraction: f32,
}

impl Rule for SuccessionRule {
    fn name(&self) -> &'static str {
        "succession"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Recovery
    }

    fn apply(&self, cell: &Cell, ctx: &RuleContext<'_>, rng: &mut CellRng) -> Option<RuleOutcome> {
        if cell.state != CellState::Empty || !recoverable(cell) {
            return None;
        }
        let p = self.probability * ctx.climate.season.growth_factor();
        rng.chance(ctx.per_step(p))
            .then(|| regrow(cell, ctx, self.fuel_fraction, RecoveryCause::Succession))
    }
}
