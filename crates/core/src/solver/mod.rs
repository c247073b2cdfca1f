//! Update scheduling
//!
//! This module decides in which order, and against which snapshot, cells are
//! handed to the rule engine within a tick. The core abstraction is the
//! `UpdateScheduler` trait with three implementations:
//!
//! - [`SynchronousScheduler`]: one shared snapshot, fully parallel
//! - [`AsynchronousScheduler`]: in-place, row-major or seeded shuffle
//! - [`BlockScheduler`]: synchronous tiles visited in seeded random order
//!
//! # Example
//!
//! ```rust,ignore
//! use wildfire_core::solver::{create_scheduler, UpdateStrategy};
//!
//! let strategy: UpdateStrategy = "block-synchronous:16".parse()?;
//! let scheduler = create_scheduler(strategy)?;
//! ```

mod asynchronous;
mod block;
mod synchronous;
#[allow(clippy::module_name_repetitions)]
mod r#trait;

pub use asynchronous::AsynchronousScheduler;
pub use block::BlockScheduler;
pub use r#trait::{SchedulerOutput, UpdateScheduler};
pub use synchronous::SynchronousScheduler;

use crate::core_types::{CellRng, Position, TRAVERSAL_STREAM};
use crate::error::{FireSimError, Result};
use crate::rules::RuleContext;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Block size used when a block-synchronous strategy is named without one
pub const DEFAULT_BLOCK_SIZE: usize = 8;

/// Visiting order of the asynchronous scheduler
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraversalOrder {
    #[default]
    RowMajor,
    /// Fresh seeded permutation every tick
    Shuffled,
}

/// How cells are updated within a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateStrategy {
    #[default]
    Synchronous,
    Asynchronous { order: TraversalOrder },
    BlockSynchronous { block_size: usize },
}

impl UpdateStrategy {
    /// # Errors
    ///
    /// Returns [`FireSimError::InvalidConfig`] for a zero block size.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::BlockSynchronous { block_size: 0 } => Err(FireSimError::invalid_config(
                "update_strategy.block_size",
                "must be positive",
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for UpdateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Synchronous => f.write_str("synchronous"),
            Self::Asynchronous {
                order: TraversalOrder::RowMajor,
            } => f.write_str("asynchronous"),
            Self::Asynchronous {
                order: TraversalOrder::Shuffled,
            } => f.write_str("asynchronous-shuffled"),
            Self::BlockSynchronous { block_size } => write!(f, "block-synchronous:{block_size}"),
        }
    }
}

impl FromStr for UpdateStrategy {
    type Err = FireSimError;

    /// Accepts `synchronous`, `asynchronous`, `asynchronous-shuffled`,
    /// `block-synchronous` and `block-synchronous:<size>`.
    fn from_str(s: &str) -> Result<Self> {
        let unknown = || FireSimError::UnknownVariant {
            kind: "update strategy",
            name: s.to_string(),
        };
        let name = s.trim().to_ascii_lowercase();
        let strategy = match name.split_once(':') {
            None => match name.as_str() {
                "synchronous" => Self::Synchronous,
                "asynchronous" => Self::Asynchronous {
                    order: TraversalOrder::RowMajor,
                },
                "asynchronous-shuffled" => Self::Asynchronous {
                    order: TraversalOrder::Shuffled,
                },
                "block-synchronous" => Self::BlockSynchronous {
                    block_size: DEFAULT_BLOCK_SIZE,
                },
                _ => return Err(unknown()),
            },
            Some(("block-synchronous", size)) => Self::BlockSynchronous {
                block_size: size.trim().parse().map_err(|_| unknown())?,
            },
            Some(_) => return Err(unknown()),
        };
        strategy.validate()?;
        Ok(strategy)
    }
}

/// Create the scheduler for a strategy
///
/// # Arguments
///
/// * `strategy` - Update strategy from the run configuration
///
/// # Returns
///
/// A boxed `UpdateScheduler` implementing the strategy
///
/// # Errors
///
/// Returns [`FireSimError::InvalidConfig`] for a zero block size.
pub fn create_scheduler(strategy: UpdateStrategy) -> Result<Box<dyn UpdateScheduler>> {
    strategy.validate()?;
    let scheduler: Box<dyn UpdateScheduler> = match strategy {
        UpdateStrategy::Synchronous => Box::new(SynchronousScheduler),
        UpdateStrategy::Asynchronous { order } => Box::new(AsynchronousScheduler::new(order)),
        UpdateStrategy::BlockSynchronous { block_size } => Box::new(BlockScheduler::new(block_size)),
    };
    debug!("Using {} update scheduler", strategy);
    Ok(scheduler)
}

/// Generator for the tick's traversal order
pub(crate) fn traversal_rng(ctx: &RuleContext<'_>) -> CellRng {
    CellRng::for_cell(ctx.seed, Position::new(0, 0), ctx.tick, TRAVERSAL_STREAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategies() {
        assert_eq!(
            "synchronous".parse::<UpdateStrategy>().expect("known"),
            UpdateStrategy::Synchronous
        );
        assert_eq!(
            "Asynchronous".parse::<UpdateStrategy>().expect("known"),
            UpdateStrategy::Asynchronous {
                order: TraversalOrder::RowMajor
            }
        );
        assert_eq!(
            "block-synchronous:16".parse::<UpdateStrategy>().expect("known"),
            UpdateStrategy::BlockSynchronous { block_size: 16 }
        );
        assert_eq!(
            "block-synchronous".parse::<UpdateStrategy>().expect("known"),
            UpdateStrategy::BlockSynchronous {
                block_size: DEFAULT_BLOCK_SIZE
            }
        );
    }

    #[test]
    fn test_rejects_unknown_and_zero_block() {
        assert!(matches!(
            "gauss-seidel".parse::<UpdateStrategy>(),
            Err(FireSimError::UnknownVariant { .. })
        ));
        assert!(matches!(
            "block-synchronous:0".parse::<UpdateStrategy>(),
            Err(FireSimError::InvalidConfig { .. })
        ));
        assert!(create_scheduler(UpdateStrategy::BlockSynchronous { block_size: 0 }).is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for strategy in [
            UpdateStrategy::Synchronous,
            UpdateStrategy::Asynchronous {
                order: TraversalOrder::Shuffled,
            },
            UpdateStrategy::BlockSynchronous { block_size: 4 },
        ] {
            assert_eq!(strategy.to_string().parse::<UpdateStrategy>().expect("known"), strategy);
        }
    }
}
