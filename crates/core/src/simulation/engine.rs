//! Simulation driver
//!
//! [`FireSimulation`] owns everything fixed for a run (configuration, seed,
//! topology, scheduler, rule set and worker pool) and turns one
//! [`SimulationState`] into the next. Runs are consumed lazily through
//! [`Trajectory`] or driven to a stopping condition with
//! [`FireSimulation::run_until`].

use super::config::SimulationConfig;
use super::state::SimulationState;
use super::time_step::TimeStepper;
use crate::core_types::{Climate, ClimateProvider, ConstantClimate};
use crate::error::{FireSimError, Result};
use crate::grid::{BoundaryTopology, Grid, Terrain};
use crate::metrics::compute_metrics;
use crate::physics::max_spread_rate;
use crate::rules::{RuleContext, RuleEngine};
use crate::solver::{create_scheduler, UpdateScheduler};
use rayon::ThreadPool;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Run `op` on the dedicated pool when there is one, else on the global pool
fn in_pool<R: Send>(pool: Option<&ThreadPool>, op: impl FnOnce() -> R + Send) -> R {
    match pool {
        Some(pool) => pool.install(op),
        None => op(),
    }
}

/// Wildfire cellular automaton run
pub struct FireSimulation {
    config: SimulationConfig,
    seed: u64,
    topology: BoundaryTopology,
    scheduler: Box<dyn UpdateScheduler>,
    rules: RuleEngine,
    climate: Box<dyn ClimateProvider>,
    initial_climate: Climate,
    stepper: TimeStepper,
    pool: Option<ThreadPool>,
    grid: Arc<Grid>,
    terrain: Arc<Terrain>,
}

impl fmt::Debug for FireSimulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FireSimulation")
            .field("width", &self.grid.width())
            .field("height", &self.grid.height())
            .field("seed", &self.seed)
            .field("scheduler", &self.scheduler.name())
            .field("rules", &self.rules.rule_names())
            .finish_non_exhaustive()
    }
}

impl FireSimulation {
    /// Set up a run.
    ///
    /// Terrain elevations are copied into the grid cells, so the terrain is
    /// the single source of elevation for the run.
    ///
    /// # Arguments
    ///
    /// * `config` - Run configuration
    /// * `grid` - Initial grid
    /// * `terrain` - Elevation field matching the grid
    /// * `climate` - Climate held constant over the run (see
    ///   [`FireSimulation::with_climate_provider`])
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid config, climate or grid,
    /// [`FireSimError::DimensionMismatch`] if grid and terrain disagree, and
    /// [`FireSimError::ThreadPool`] if the worker pool cannot be built.
    pub fn new(
        config: SimulationConfig,
        mut grid: Grid,
        terrain: Terrain,
        climate: Climate,
    ) -> Result<Self> {
        config.validate()?;
        climate.validate()?;
        if terrain.width() != grid.width() || terrain.height() != grid.height() {
            return Err(FireSimError::DimensionMismatch {
                source_name: "terrain",
                grid_width: grid.width(),
                grid_height: grid.height(),
                other_width: terrain.width(),
                other_height: terrain.height(),
            });
        }
        for cell in grid.cells_mut() {
            cell.elevation = terrain.elevation(cell.position);
        }
        grid.validate()?;

        let seed = match config.random_seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<u64>();
                info!("No random seed configured, drew seed {} from entropy", seed);
                seed
            }
        };

        let pool = match config.worker_threads {
            Some(threads) => Some(rayon::ThreadPoolBuilder::new().num_threads(threads).build()?),
            None => None,
        };

        let scheduler = create_scheduler(config.update_strategy)?;
        let rules = RuleEngine::from_config(&config.rules);
        let topology =
            BoundaryTopology::new(config.boundary_condition, grid.width(), grid.height());
        let stepper = TimeStepper::new(config.time, terrain.cell_size(), config.max_time);

        info!(
            "Fire simulation initialized: {}x{} grid, cell_size={:.2}m, boundary={}, strategy={}, seed={}, workers={}",
            grid.width(),
            grid.height(),
            terrain.cell_size(),
            config.boundary_condition,
            config.update_strategy,
            seed,
            pool.as_ref()
                .map_or_else(rayon::current_num_threads, ThreadPool::current_num_threads)
        );
        debug!("Active rules: {:?}", rules.rule_names());

        Ok(Self {
            config,
            seed,
            topology,
            scheduler,
            rules,
            climate: Box::new(ConstantClimate(climate)),
            initial_climate: climate,
            stepper,
            pool,
            grid: Arc::new(grid),
            terrain: Arc::new(terrain),
        })
    }

    /// Replace the constant climate with a provider queried every tick
    pub fn with_climate_provider(mut self, provider: Box<dyn ClimateProvider>) -> Self {
        self.climate = provider;
        self
    }

    /// Replace the configured rule set
    pub fn with_rule_engine(mut self, rules: RuleEngine) -> Self {
        debug!("Rule engine replaced: {:?}", rules.rule_names());
        self.rules = rules;
        self
    }

    /// Seed of the run, whether configured or drawn
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub fn topology(&self) -> &BoundaryTopology {
        &self.topology
    }

    #[must_use]
    pub fn rule_engine(&self) -> &RuleEngine {
        &self.rules
    }

    /// State before the first tick, with metrics of the initial grid
    ///
    /// # Errors
    ///
    /// Returns [`FireSimError::ResourceExhausted`] if the metrics pass cannot
    /// run on this grid.
    pub fn initial_state(&self) -> Result<SimulationState> {
        let metrics = compute_metrics(&self.grid, &self.topology, &self.config.metrics)?;
        Ok(SimulationState {
            grid: Arc::clone(&self.grid),
            climate: self.initial_climate,
            terrain: Arc::clone(&self.terrain),
            time_step: 0.0,
            elapsed_time: 0.0,
            step: 0,
            metrics,
            event_log: Vec::new(),
        })
    }

    /// Whether `state` has reached `max_steps` or `max_time`
    #[must_use]
    pub fn is_finished(&self, state: &SimulationState) -> bool {
        state.step >= self.config.max_steps || state.elapsed_time >= self.stepper.max_time()
    }

    /// Advance `state` by one tick.
    ///
    /// # Arguments
    ///
    /// * `state` - State at the start of the tick
    ///
    /// # Returns
    ///
    /// The next state, or `None` once the run is finished
    ///
    /// # Errors
    ///
    /// Returns [`FireSimError::GridShapeChanged`] if `state` does not belong
    /// to this run, [`FireSimError::IllegalTransition`] from the rule engine,
    /// a configuration error for an invalid provider climate and
    /// [`FireSimError::ResourceExhausted`] from the metrics pass.
    pub fn step(&mut self, state: &SimulationState) -> Result<Option<SimulationState>> {
        if self.is_finished(state) {
            return Ok(None);
        }
        let tick = state.step;
        let (width, height) = (self.grid.width(), self.grid.height());
        if state.grid.width() != width || state.grid.height() != height {
            return Err(FireSimError::GridShapeChanged {
                tick,
                expected_width: width,
                expected_height: height,
                width: state.grid.width(),
                height: state.grid.height(),
            });
        }
        if state.terrain.width() != width || state.terrain.height() != height {
            return Err(FireSimError::DimensionMismatch {
                source_name: "terrain",
                grid_width: width,
                grid_height: height,
                other_width: state.terrain.width(),
                other_height: state.terrain.height(),
            });
        }

        let climate = self
            .climate
            .climate_for(tick, state.elapsed_time, &state.climate);
        climate.validate()?;

        let pool = self.pool.as_ref();
        let params = &self.config.dynamics;
        let grid = state.grid.as_ref();
        let terrain = state.terrain.as_ref();

        let spread_rate = in_pool(pool, || max_spread_rate(grid, terrain, &climate, params));
        let Some(step) = self.stepper.next(state.elapsed_time, spread_rate) else {
            return Ok(None);
        };
        if step.truncated {
            warn!(
                "Tick {} truncated to dt={:.4}s to end exactly at max_time={:.2}s",
                tick,
                step.dt,
                self.stepper.max_time()
            );
        }

        let ctx = RuleContext {
            grid,
            topology: &self.topology,
            terrain,
            climate: &climate,
            params,
            dt: step.dt,
            tick,
            seed: self.seed,
        };
        let scheduler = self.scheduler.as_ref();
        let rules = &self.rules;
        let output = in_pool(pool, || scheduler.advance(rules, &ctx))?;

        let metrics = match compute_metrics(&output.grid, &self.topology, &self.config.metrics) {
            Ok(metrics) => metrics,
            Err(err) => {
                warn!("Metrics failed on tick {}: {}", tick, err);
                return Err(err);
            }
        };

        let elapsed_time = step.end_time;

        debug!(
            "Tick {}: t={:.2}s, dt={:.4}s, active_fires={}, burnt={}, events={}, percolation={:.3}, phase={}",
            tick,
            elapsed_time,
            step.dt,
            metrics.active_fires,
            metrics.total_burnt_area,
            output.events.len(),
            metrics.percolation_indicator,
            metrics.phase
        );

        Ok(Some(SimulationState {
            grid: Arc::new(output.grid),
            climate,
            terrain: Arc::clone(&state.terrain),
            time_step: step.dt,
            elapsed_time,
            step: tick + 1,
            metrics,
            event_log: output.events,
        }))
    }

    /// Lazy sequence of states from the initial grid
    ///
    /// # Errors
    ///
    /// Fails if the initial metrics cannot be computed.
    pub fn trajectory(&mut self) -> Result<Trajectory<'_>> {
        let initial = self.initial_state()?;
        Ok(self.trajectory_from(initial))
    }

    /// Lazy sequence of states following `state`
    pub fn trajectory_from(&mut self, state: SimulationState) -> Trajectory<'_> {
        Trajectory {
            simulation: self,
            current: Some(state),
        }
    }

    /// Step until `predicate` holds or the run is finished.
    ///
    /// The predicate is checked on the initial state too.
    ///
    /// # Returns
    ///
    /// The first state satisfying `predicate`, or the last state of the run
    ///
    /// # Errors
    ///
    /// Propagates the first error of [`FireSimulation::step`].
    pub fn run_until(
        &mut self,
        mut predicate: impl FnMut(&SimulationState) -> bool,
    ) -> Result<SimulationState> {
        let mut state = self.initial_state()?;
        while !predicate(&state) {
            match self.step(&state)? {
                Some(next) => state = next,
                None => break,
            }
        }
        info!(
            "Run stopped after {} ticks at t={:.2}s: burnt={}, percolates={}",
            state.step, state.elapsed_time, state.metrics.total_burnt_area, state.metrics.percolates
        );
        Ok(state)
    }

    /// Run to `max_steps` or `max_time`
    ///
    /// # Errors
    ///
    /// Propagates the first error of [`FireSimulation::step`].
    pub fn run(&mut self) -> Result<SimulationState> {
        self.run_until(|_| false)
    }
}

/// Lazy iterator over the states of a run.
///
/// Yields one `Result` per tick, excluding the starting state, and ends after
/// the run is finished or after the first error.
pub struct Trajectory<'a> {
    simulation: &'a mut FireSimulation,
    current: Option<SimulationState>,
}

impl Iterator for Trajectory<'_> {
    type Item = Result<SimulationState>;

    fn next(&mut self) -> Option<Self::Item> {
        let state = self.current.take()?;
        match self.simulation.step(&state) {
            Ok(Some(next)) => {
                self.current = Some(next.clone());
                Some(Ok(next))
            }
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}
