//! Wildfire Percolation Core Library
//!
//! A stochastic cellular automaton for wildfire ignition and spread, built to
//! study percolation and system-spanning fires as control parameters (tree
//! density, moisture, wind, spark probability) are varied.
//!
//! ## Overview
//!
//! - Cell and grid model with vegetation, moisture, fuel and intensity
//! - Physically motivated ignition, heat transfer, combustion and extinction
//! - Rule-based state machine: Tree → Burning → Burnt, with optional recovery
//! - Periodic, absorbing, reflective and fixed boundary conditions
//! - Synchronous, asynchronous and block-synchronous update strategies
//! - CFL-bounded adaptive time stepping
//! - Cluster labelling, percolation indicator and phase classification
//!
//! Runs are reproducible: every random decision draws from a generator
//! derived from (seed, position, tick, rule category), so results do not
//! depend on thread count or scheduling.

// Core types and utilities
pub mod core_types;
pub mod error;

// Landscape and dynamics
pub mod grid;
pub mod physics;
pub mod rules;

// Tick scheduling, observables and the driver
pub mod metrics;
pub mod simulation;
pub mod solver;

// Re-export core types
pub use core_types::{
    Cell, CellState, Climate, ClimateProvider, ConstantClimate, Position, Season, SeasonalClimate,
    VegetationType, Wind,
};
pub use error::{ErrorKind, FireSimError, Result};

// Re-export grid and rule types
pub use grid::{BoundaryCondition, Connectivity, Grid, Terrain};
pub use physics::FireDynamicsParams;
pub use rules::{Rule, RuleCategory, RuleContext, RuleEngine, RuleOutcome, RulesConfig};

// Re-export run types
pub use metrics::{compute_metrics, FirePhase, MetricsConfig, SimulationMetrics};
pub use simulation::{
    FireEvent, FireSimulation, SimulationConfig, SimulationState, TimeStepConfig, Trajectory,
};
pub use solver::{TraversalOrder, UpdateStrategy};
