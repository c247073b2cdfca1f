//! Configuration, invariant and resource errors, plus degenerate inputs

mod common;

use common::{burning_forest, hot_dry_climate, init_logging};
use std::sync::Arc;
use wildfire_core::core_types::CellRng;
use wildfire_core::grid::BoundaryTopology;
use wildfire_core::rules::NeighborSpreadRule;
use wildfire_core::{
    BoundaryCondition, Cell, CellState, Climate, ErrorKind, FireDynamicsParams, FireSimError,
    FireSimulation, Grid, MetricsConfig, Position, Rule, RuleCategory, RuleContext, RuleEngine,
    RuleOutcome, SimulationConfig, Terrain, TimeStepConfig, UpdateStrategy, VegetationType, Wind,
};
use wildfire_core::simulation::TimeStepper;

/// Sets every cell on fire regardless of its state
#[derive(Debug)]
struct Arsonist;

impl Rule for Arsonist {
    fn name(&self) -> &'static str {
        "arsonist"
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Ignition
    }

    fn apply(&self, cell: &Cell, _ctx: &RuleContext<'_>, _rng: &mut CellRng) -> Option<RuleOutcome> {
        let mut next = *cell;
        next.state = CellState::Burning;
        Some(RuleOutcome::update(next))
    }
}

fn flat(grid: &Grid) -> Terrain {
    Terrain::flat(grid.width(), grid.height(), 30.0, 0.0).expect("valid terrain")
}

#[test]
fn test_faulty_rule_aborts_run() {
    init_logging();
    let grid = Grid::uniform(6, 6, CellState::Empty, VegetationType::Grassland, 0.1, 20.0)
        .expect("valid grid");
    let terrain = flat(&grid);
    let mut sim = FireSimulation::new(
        SimulationConfig::default().with_seed(1),
        grid,
        terrain,
        Climate::default(),
    )
    .expect("valid run")
    .with_rule_engine(RuleEngine::new(vec![Box::new(Arsonist)]));

    let results: Vec<_> = sim.trajectory().expect("initial metrics").collect();
    assert_eq!(results.len(), 1, "trajectory ends after the first error");
    let err = results.into_iter().next().expect("one item").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invariant);
    assert!(!err.is_recoverable());
    match err {
        FireSimError::IllegalTransition {
            position,
            tick,
            rule,
            from,
            to,
        } => {
            assert_eq!(position, Position::new(0, 0), "first cell in row-major order");
            assert_eq!(tick, 0);
            assert_eq!(rule, "arsonist");
            assert_eq!(from, CellState::Empty);
            assert_eq!(to, CellState::Burning);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_configuration_errors_before_any_tick() {
    init_logging();
    let grid = burning_forest(5, 5);

    let bad_steps = SimulationConfig {
        time: wildfire_core::TimeStepConfig {
            min_time_step: 2.0,
            max_time_step: 1.0,
            ..Default::default()
        },
        ..SimulationConfig::default()
    };
    let bad_block = SimulationConfig {
        update_strategy: UpdateStrategy::BlockSynchronous { block_size: 0 },
        ..SimulationConfig::default()
    };
    let bad_time = SimulationConfig {
        max_time: -1.0,
        ..SimulationConfig::default()
    };
    for config in [bad_steps, bad_block, bad_time] {
        let err = FireSimulation::new(config, grid.clone(), flat(&grid), Climate::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration, "{err}");
    }

    let humid = Climate {
        humidity: 1.5,
        ..Climate::default()
    };
    let err = FireSimulation::new(SimulationConfig::default(), grid.clone(), flat(&grid), humid)
        .unwrap_err();
    assert!(matches!(err, FireSimError::InvalidConfig { .. }));

    let flooded_forest = Grid::uniform(4, 4, CellState::Tree, VegetationType::Water, 0.0, 20.0)
        .expect("shape is fine");
    let err = FireSimulation::new(
        SimulationConfig::default(),
        flooded_forest.clone(),
        flat(&flooded_forest),
        Climate::default(),
    )
    .unwrap_err();
    assert!(matches!(err, FireSimError::InvalidCell { .. }));

    let err = "diagonal".parse::<BoundaryCondition>().unwrap_err();
    assert!(matches!(err, FireSimError::UnknownVariant { .. }));
    let err = "chaotic".parse::<UpdateStrategy>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn test_cfl_number_above_one_rejected() {
    init_logging();
    let grid = burning_forest(5, 5);
    let config = SimulationConfig {
        time: TimeStepConfig {
            adaptive: true,
            cfl_number: 4.0,
            max_time_step: 1000.0,
            ..TimeStepConfig::default()
        },
        ..SimulationConfig::default().with_seed(3)
    };
    let err = FireSimulation::new(config, grid.clone(), flat(&grid), Climate::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(matches!(err, FireSimError::InvalidConfig { field: "time.cfl_number", .. }), "{err}");

    // At the bound the fastest front crosses exactly one cell per step
    let time = TimeStepConfig {
        adaptive: true,
        cfl_number: 1.0,
        max_time_step: 1000.0,
        ..TimeStepConfig::default()
    };
    let stepper = TimeStepper::new(time, 30.0, 3600.0);
    let rate = 1.0;
    assert!(stepper.nominal(rate) * rate <= 30.0);
}

#[test]
fn test_foreign_state_rejected() {
    init_logging();
    let grid = burning_forest(6, 6);
    let mut sim = FireSimulation::new(
        SimulationConfig::default().with_seed(4),
        grid.clone(),
        flat(&grid),
        Climate::default(),
    )
    .expect("valid run");

    let mut foreign = sim.initial_state().expect("metrics");
    let other = burning_forest(7, 6);
    foreign.terrain = Arc::new(flat(&other));
    foreign.grid = Arc::new(other);
    let err = sim.step(&foreign).unwrap_err();
    assert!(matches!(err, FireSimError::GridShapeChanged { tick: 0, width: 7, .. }));
    assert_eq!(err.kind(), ErrorKind::Invariant);
}

#[test]
fn test_oversized_grid_is_recoverable() {
    init_logging();
    let grid = burning_forest(12, 12);
    let config = SimulationConfig {
        metrics: MetricsConfig {
            max_cells: 100,
            ..MetricsConfig::default()
        },
        ..SimulationConfig::default().with_seed(6)
    };
    let sim = FireSimulation::new(config, grid.clone(), flat(&grid), Climate::default())
        .expect("valid run");
    let err = sim.initial_state().unwrap_err();
    assert!(err.is_recoverable());
    assert!(matches!(err, FireSimError::ResourceExhausted { requested: 144, .. }));
}

#[test]
fn test_extreme_inputs_keep_probabilities_in_range() {
    init_logging();
    // A 3×3 fire below a wall thousands of meters high: the spread to the
    // top row is close to vertical
    let grid = Grid::from_fn(3, 3, |pos| {
        let state = if pos.y < 2 { CellState::Burning } else { CellState::Tree };
        Cell::new(pos, state, VegetationType::Grassland, 0.0, 0.0, 60.0)
    })
    .expect("valid grid");
    let terrain = Terrain::from_fn(3, 3, 1.0, |pos| if pos.y == 2 { 1.0e7 } else { 0.0 })
        .expect("valid terrain");
    let topology = BoundaryTopology::new(BoundaryCondition::Absorbing, 3, 3);
    let params = FireDynamicsParams::default();

    for wind in [Wind::new(0.0, 1000.0), Wind::new(180.0, 1000.0), Wind::calm()] {
        let climate = Climate {
            wind,
            humidity: 0.0,
            temperature: 60.0,
            ..hot_dry_climate()
        };
        let ctx = RuleContext {
            grid: &grid,
            topology: &topology,
            terrain: &terrain,
            climate: &climate,
            params: &params,
            dt: 1.0,
            tick: 0,
            seed: 0,
        };
        for x in 0..3 {
            let cell = grid.get(Position::new(x, 2));
            let p = NeighborSpreadRule::probability(cell, &ctx);
            assert!(p.is_finite(), "{wind:?}: {p}");
            assert!((0.0..=1.0).contains(&p), "{wind:?}: {p}");
            let p = ctx.per_step(p);
            assert!((0.0..=1.0).contains(&p));
        }
    }
}

#[test]
fn test_extreme_climate_run_completes() {
    init_logging();
    let grid = burning_forest(10, 10);
    let terrain = Terrain::from_fn(10, 10, 30.0, |pos| (pos.x * pos.x) as f32 * 500.0)
        .expect("valid terrain");
    let climate = Climate {
        wind: Wind::new(45.0, 1000.0),
        humidity: 0.0,
        precipitation: 0.0,
        ..hot_dry_climate()
    };
    let config = SimulationConfig {
        max_steps: 15,
        time: wildfire_core::TimeStepConfig {
            adaptive: true,
            ..Default::default()
        },
        ..SimulationConfig::default().with_seed(12)
    };
    let mut sim = FireSimulation::new(config, grid, terrain, climate).expect("valid run");
    let last = sim.run().expect("run completes");
    assert!(last.metrics.average_moisture.is_finite());
    assert!(last.metrics.average_temperature.is_finite());
    assert!(last.time_step.is_finite() && last.time_step > 0.0);
    for cell in last.grid.iter() {
        assert!((0.0..=1.0).contains(&cell.moisture));
        assert!((0.0..=1.0).contains(&cell.fuel));
        assert!((0.0..=1.0).contains(&cell.intensity));
        assert!(cell.temperature.is_finite());
    }
}
