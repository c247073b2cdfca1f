//! Burning rules: attribute evolution without state change

use super::rule::{Rule, RuleCategory, RuleContext, RuleOutcome};
use crate::core_types::{Cell, CellRng, CellState};
use crate::physics::{burn, cool, update_moisture};

/// Fuel consumption, intensity evolution and flame temperature of burning cells
#[derive(Debug, Clone, Copy, Default)]
pub struct CombustionRule;

impl Rule for CombustionRule {
    fn name(&self) -> &'static str {
        "combustion"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Burning
    }

    fn apply(&self, cell: &Cell, ctx: &RuleContext<'_>, _rng: &mut CellRng) -> Option<RuleOutcome> {
        if cell.state != CellState::Burning {
            return None;
        }
        let state = burn(cell, ctx.dt, ctx.climate.temperature, ctx.params);
        let mut next = *cell;
        next.fuel = state.fuel;
        next.intensity = state.intensity;
        next.temperature = state.temperature;
        next.moisture = update_moisture(cell.moisture, state.temperature, ctx.dt, ctx.climate, ctx.params);
        Some(RuleOutcome::update(next))
    }
}

/// Preheating and moisture dynamics of unburnt fuel; cooling of burnt cells.
///
/// A tree relaxes toward `ambient + rise` from its burning neighbors. The
/// extra drying the rise causes is only seen by the ignition trial
/// ([`NeighborSpreadRule::preheated`](super::NeighborSpreadRule::preheated));
/// stored moisture follows the regular moisture dynamics.
///
/// Empty and non-flammable cells are left alone so they never accumulate
/// dynamics that could drive an ignition.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeatExchangeRule;

impl Rule for HeatExchangeRule {
    fn name(&self) -> &'static str {
        "heat_exchange"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Burning
    }

    fn apply(&self, cell: &Cell, ctx: &RuleContext<'_>, _rng: &mut CellRng) -> Option<RuleOutcome> {
        if !cell.is_flammable() {
            return None;
        }
        let params = ctx.params;
        let ambient = ctx.climate.temperature;
        let mut next = *cell;
        match cell.state {
            CellState::Tree => {
                let target = ambient + ctx.preheat(cell.position);
                next.temperature = cool(cell.temperature, target, ctx.dt, params.cooling_rate);
                next.moisture = update_moisture(cell.moisture, next.temperature, ctx.dt, ctx.climate, params);
            }
            CellState::Burnt => {
                next.temperature = cool(cell.temperature, ambient, ctx.dt, params.cooling_rate);
            }
            CellState::Empty | CellState::Burning => return None,
        }
        Some(RuleOutcome::update(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Cell, CellState, Position, VegetationType};
    use crate::rules::scene::Scene;
    use approx::assert_relative_eq;

    #[test]
    fn test_combustion_consumes_fuel() {
        let scene = Scene::forest(3, 3, &[Position::new(1, 1)]).with_dt(2.0);
        let cell = scene.cell(1, 1);
        let mut rng = scene.rng(cell.position);
        let outcome = CombustionRule
            .apply(&cell, &scene.ctx(), &mut rng)
            .expect("burning cell");
        assert_eq!(outcome.cell.state, CellState::Burning);
        assert!(outcome.event.is_none());
        assert!(outcome.cell.fuel < cell.fuel);
        assert!(outcome.cell.temperature > scene.climate.temperature);
        assert!((0.0..=1.0).contains(&outcome.cell.intensity));

        let mut rng = scene.rng(Position::new(0, 0));
        assert!(CombustionRule
            .apply(&scene.cell(0, 0), &scene.ctx(), &mut rng)
            .is_none());
    }

    #[test]
    fn test_heat_exchange_warms_trees_near_fire() {
        let scene = Scene::forest(4, 3, &[Position::new(0, 1)]);
        let ambient = scene.climate.temperature;
        let near = scene.cell(1, 1);
        let far = scene.cell(3, 1);
        let ctx = scene.ctx();

        let mut rng = scene.rng(near.position);
        let heated = HeatExchangeRule.apply(&near, &ctx, &mut rng).expect("tree");
        let mut rng = scene.rng(far.position);
        let unheated = HeatExchangeRule.apply(&far, &ctx, &mut rng).expect("tree");

        let target = ambient + ctx.preheat(near.position);
        assert!(heated.cell.temperature > unheated.cell.temperature);
        assert!(heated.cell.temperature < target);
        assert_relative_eq!(
            unheated.cell.temperature,
            cool(far.temperature, ambient, ctx.dt, ctx.params.cooling_rate)
        );
        // No extra drying is written back
        assert_relative_eq!(
            heated.cell.moisture,
            update_moisture(near.moisture, heated.cell.temperature, ctx.dt, ctx.climate, ctx.params)
        );
        assert_eq!(heated.cell.state, CellState::Tree);
    }

    #[test]
    fn test_heat_exchange_cools_burnt_and_skips_bare_ground() {
        let grid = crate::grid::Grid::from_fn(3, 1, |pos| match pos.x {
            0 => Cell::new(pos, CellState::Burnt, VegetationType::Shrubland, 0.0, 0.1, 400.0),
            1 => Cell::new(pos, CellState::Empty, VegetationType::Grassland, 0.0, 0.3, 20.0),
            _ => Cell::new(pos, CellState::Empty, VegetationType::Water, 0.0, 0.0, 20.0),
        })
        .expect("valid grid");
        let scene = Scene::new(grid, crate::grid::BoundaryCondition::Absorbing).with_dt(10.0);
        let ctx = scene.ctx();

        let burnt = scene.cell(0, 0);
        let mut rng = scene.rng(burnt.position);
        let cooled = HeatExchangeRule.apply(&burnt, &ctx, &mut rng).expect("burnt");
        assert!(cooled.cell.temperature < burnt.temperature);
        assert!(cooled.cell.temperature > scene.climate.temperature);
        assert_eq!(cooled.cell.moisture, burnt.moisture);

        for x in 1..3 {
            let cell = scene.cell(x, 0);
            let mut rng = scene.rng(cell.position);
            assert!(HeatExchangeRule.apply(&cell, &ctx, &mut rng).is_none());
        }
    }
}
