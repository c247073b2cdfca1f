//! Ignition rules (Tree → Burning)

use super::rule::{Rule, RuleCategory, RuleContext, RuleOutcome};
use crate::core_types::{Cell, CellRng, CellState, INITIAL_INTENSITY};
use crate::physics::{
    combine_independent, effective_moisture, flame_temperature, moisture_factor,
    temperature_factor, vegetation_factor, wind_factor, IgnitionFactors,
};
use crate::simulation::events::{FireEvent, IgnitionCause};

/// Cells at Chebyshev distance 2 from the origin
const RING_TWO: [(i32, i32); 16] = [
    (-2, -2),
    (-1, -2),
    (0, -2),
    (1, -2),
    (2, -2),
    (-2, -1),
    (2, -1),
    (-2, 0),
    (2, 0),
    (-2, 1),
    (2, 1),
    (-2, 2),
    (-1, 2),
    (0, 2),
    (1, 2),
    (2, 2),
];

fn can_ignite(cell: &Cell) -> bool {
    cell.state == CellState::Tree && cell.is_flammable()
}

fn ignite(cell: &Cell, ctx: &RuleContext<'_>, cause: IgnitionCause) -> RuleOutcome {
    let mut next = *cell;
    next.state = CellState::Burning;
    next.intensity = INITIAL_INTENSITY;
    next.temperature = flame_temperature(INITIAL_INTENSITY, ctx.climate.temperature, ctx.params);
    RuleOutcome::transition(
        next,
        FireEvent::Ignition {
            position: cell.position,
            cause,
        },
    )
}

/// Spread from burning Moore neighbors.
///
/// Burning neighbors preheat the cell before ignition is sampled; each of
/// them then acts as an independent ignition trial weighted by its intensity
/// and distance, modulated by slope and wind along the source→target
/// direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeighborSpreadRule;

impl NeighborSpreadRule {
    /// Temperature and moisture of `cell` as seen by the ignition trial.
    ///
    /// The stored temperature already relaxes toward `ambient + rise` through
    /// [`HeatExchangeRule`](super::HeatExchangeRule), so the rise bounds it
    /// from below instead of stacking on top. Drying by the rise is transient
    /// and never written back.
    #[must_use]
    pub fn preheated(cell: &Cell, ctx: &RuleContext<'_>) -> (f32, f32) {
        let rise = ctx.preheat(cell.position);
        let temperature = cell.temperature.max(ctx.climate.temperature + rise);
        let moisture = effective_moisture(cell.moisture, rise, ctx.params.drying_coefficient);
        (temperature, moisture)
    }

    /// Combined per-reference-step ignition probability of `cell`
    #[must_use]
    pub fn probability(cell: &Cell, ctx: &RuleContext<'_>) -> f32 {
        let burning: Vec<_> = ctx
            .neighbors(cell.position)
            .into_iter()
            .filter(|n| n.cell.state == CellState::Burning)
            .collect();
        if burning.is_empty() {
            return 0.0;
        }

        let params = ctx.params;
        let (temperature, moisture) = Self::preheated(cell, ctx);
        let elevation = ctx.terrain.elevation(cell.position);

        combine_independent(burning.iter().map(|source| {
            IgnitionFactors::for_source(
                params,
                cell.vegetation,
                moisture,
                temperature,
                elevation,
                ctx.rise(source.cell.position, cell.position),
                (-source.offset.0, -source.offset.1),
                ctx.terrain.cell_size(),
                source.cell.intensity,
                ctx.climate,
            )
            .probability()
        }))
    }
}

impl Rule for NeighborSpreadRule {
    fn name(&self) -> &'static str {
        "neighbor_spread"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Ignition
    }

    fn apply(&self, cell: &Cell, ctx: &RuleContext<'_>, rng: &mut CellRng) -> Option<RuleOutcome> {
        if !can_ignite(cell) {
            return None;
        }
        let p = ctx.per_step(Self::probability(cell, ctx));
        rng.chance(p)
            .then(|| ignite(cell, ctx, IgnitionCause::NeighborSpread))
    }
}

/// Firebrands carried by wind from burning cells two cells upwind
#[derive(Debug, Clone, Copy)]
pub struct EmberRule {
    pub probability: f32,
    pub min_alignment: f32,
    pub min_wind_speed: f32,
}

impl EmberRule {
    /// Combined per-reference-step ember ignition probability of `cell`.
    ///
    /// Sources are the burning cells at Chebyshev distance 2 whose direction
    /// toward `cell` lies within `min_alignment` of the wind bearing. Each
    /// distinct source cell counts once, also where reflection folds several
    /// offsets onto it.
    #[must_use]
    pub fn probability(&self, cell: &Cell, ctx: &RuleContext<'_>) -> f32 {
        let wind = ctx.climate.wind;
        let calm = wind.speed.is_nan() || wind.speed < self.min_wind_speed;
        if calm || self.probability <= 0.0 {
            return 0.0;
        }
        let params = ctx.params;
        let receptivity = moisture_factor(cell.moisture, params.moisture_coefficient)
            * vegetation_factor(cell.vegetation);

        let sources = ctx
            .neighbors_with(cell.position, &RING_TWO)
            .into_iter()
            .filter(|source| {
                let (dx, dy) = source.offset;
                source.cell.state == CellState::Burning && dx.abs().max(dy.abs()) == 2
            })
            .filter_map(|source| {
                let (sx, sy) = (-source.offset.0, -source.offset.1);
                let alignment = wind.alignment(sx, sy);
                (alignment >= self.min_alignment).then(|| {
                    self.probability
                        * source.cell.intensity
                        * wind_factor(wind.speed, alignment, params.wind_coefficient, params.max_directional_factor)
                        * receptivity
                })
            });
        combine_independent(sources)
    }
}

impl Rule for EmberRule {
    fn name(&self) -> &'static str {
        "ember"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Ignition
    }

    fn apply(&self, cell: &Cell, ctx: &RuleContext<'_>, rng: &mut CellRng) -> Option<RuleOutcome> {
        if !can_ignite(cell) {
            return None;
        }
        let p = ctx.per_step(self.probability(cell, ctx));
        if p <= 0.0 {
            return None;
        }
        rng.chance(p).then(|| ignite(cell, ctx, IgnitionCause::Ember))
    }
}

/// Spontaneous or lightning ignition, independent of neighbors
#[derive(Debug, Clone, Copy)]
pub struct SparkRule {
    pub probability: f32,
}

impl SparkRule {
    /// Per-reference-step probability, scaled by the cell's own dryness,
    /// temperature and vegetation
    #[must_use]
    pub fn probability(&self, cell: &Cell, ctx: &RuleContext<'_>) -> f32 {
        let params = ctx.params;
        self.probability
            * moisture_factor(cell.moisture, params.moisture_coefficient)
            * temperature_factor(
                cell.temperature,
                params.critical_temperature,
                params.temperature_scale,
            )
            * vegetation_factor(cell.vegetation)
    }
}

impl Rule for SparkRule {
    fn name(&self) -> &'static str {
        "spark"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Ignition
    }

    fn apply(&self, cell: &Cell, ctx: &RuleContext<'_>, rng: &mut CellRng) -> Option<RuleOutcome> {
        if !can_ignite(cell) || self.probability <= 0.0 {
            return None;
        }
        rng.chance(ctx.per_step(self.probability(cell, ctx)))
            .then(|| ignite(cell, ctx, IgnitionCause::Spark))
    }
}
