//! Error types for the fire simulation engine
//!
//! Every fallible operation in the crate returns [`FireSimError`]. Errors are
//! grouped into three kinds so batch callers can decide what to do with a
//! failed run:
//!
//! - [`ErrorKind::Configuration`] - rejected before any tick executes
//! - [`ErrorKind::Invariant`] - fatal, the run cannot continue
//! - [`ErrorKind::Resource`] - recoverable, the caller may skip the run

use crate::core_types::{CellState, Position};
use thiserror::Error;

/// Broad classification of a [`FireSimError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid configuration or inputs, detected before stepping
    Configuration,
    /// Broken engine invariant, aborts the run
    Invariant,
    /// Resource exhaustion, surfaced so ensemble callers can continue
    Resource,
}

/// Errors produced by the simulation engine.
#[derive(Debug, Error)]
pub enum FireSimError {
    /// A configuration value is out of its valid range.
    #[error("invalid configuration '{field}': {reason}")]
    InvalidConfig {
        /// Name of the offending field
        field: &'static str,
        /// Human readable constraint that was violated
        reason: String,
    },

    /// A named policy (boundary condition, update strategy, ...) is unknown.
    #[error("unknown {kind} '{name}'")]
    UnknownVariant {
        /// What was being parsed (e.g. `"boundary condition"`)
        kind: &'static str,
        /// The rejected name
        name: String,
    },

    /// Grid, terrain or climate dimensions disagree.
    #[error("dimension mismatch: grid is {grid_width}x{grid_height}, {source_name} is {other_width}x{other_height}")]
    DimensionMismatch {
        /// Input the grid was compared against
        source_name: &'static str,
        /// Grid width in cells
        grid_width: usize,
        /// Grid height in cells
        grid_height: usize,
        /// Width of the other input
        other_width: usize,
        /// Height of the other input
        other_height: usize,
    },

    /// A cell holds contents that violate the cell model.
    #[error("invalid cell at {position}: {reason}")]
    InvalidCell {
        /// Offending cell
        position: Position,
        /// Description of the violation
        reason: String,
    },

    /// A rule produced a transition outside the legal state machine.
    #[error("illegal transition {from:?} -> {to:?} at {position} on tick {tick} by rule '{rule}'")]
    IllegalTransition {
        /// Cell that was being updated
        position: Position,
        /// Tick index of the update
        tick: u64,
        /// Name of the rule that produced the transition
        rule: &'static str,
        /// State before the rule
        from: CellState,
        /// State the rule attempted to set
        to: CellState,
    },

    /// The grid handed to the engine no longer matches the run's shape.
    #[error("grid shape changed mid-run on tick {tick}: expected {expected_width}x{expected_height}, got {width}x{height}")]
    GridShapeChanged {
        /// Tick index at which the mismatch was detected
        tick: u64,
        /// Width fixed at run start
        expected_width: usize,
        /// Height fixed at run start
        expected_height: usize,
        /// Width of the offending grid
        width: usize,
        /// Height of the offending grid
        height: usize,
    },

    /// A computation could not obtain the memory it needed.
    #[error("resource exhausted: {resource} needs {requested} entries")]
    ResourceExhausted {
        /// Which buffer or limit was exceeded
        resource: &'static str,
        /// Number of entries requested
        requested: usize,
    },

    /// The dedicated worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl FireSimError {
    /// Create an [`FireSimError::InvalidConfig`] error.
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfig { .. }
            | Self::UnknownVariant { .. }
            | Self::DimensionMismatch { .. }
            | Self::InvalidCell { .. } => ErrorKind::Configuration,
            Self::IllegalTransition { .. } | Self::GridShapeChanged { .. } => ErrorKind::Invariant,
            Self::ResourceExhausted { .. } | Self::ThreadPool(_) => ErrorKind::Resource,
        }
    }

    /// Whether a batch caller can skip this run and continue with the next.
    pub fn is_recoverable(&self) -> bool {
        self.kind() == ErrorKind::Resource
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FireSimError>;
