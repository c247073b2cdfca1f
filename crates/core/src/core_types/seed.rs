//! Deterministic per-cell randomness
//!
//! Every probabilistic decision draws from a generator seeded by
//! `(global seed, position, tick, stream)`. No generator is shared between
//! cells, so parallel schedulers produce bit-identical results regardless of
//! thread count or scheduling order.
//!
//! Sub-seeds are derived with the SplitMix64 finalizer, which spreads small
//! input differences (neighboring cells, consecutive ticks) over all 64 bits.

use super::cell::Position;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Stream used for the traversal order of asynchronous and block schedulers
pub const TRAVERSAL_STREAM: u64 = 0x7452_4156;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 finalizer
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Derive a sub-seed for one cell, tick and stream.
///
/// # Arguments
///
/// * `global_seed` - Run seed
/// * `position` - Cell being updated
/// * `tick` - Tick index
/// * `stream` - Independent stream id (rule category, traversal order, ...)
#[must_use]
pub fn derive_seed(global_seed: u64, position: Position, tick: u64, stream: u64) -> u64 {
    [position.x as u64, position.y as u64, tick, stream]
        .into_iter()
        .fold(mix64(global_seed), |acc, part| {
            mix64(acc ^ part.wrapping_add(GOLDEN_GAMMA))
        })
}

/// Random source for one cell's rule category within one tick
#[derive(Debug, Clone)]
pub struct CellRng {
    rng: SmallRng,
}

impl CellRng {
    /// Create a generator from an already derived seed
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Create the generator for a cell, tick and stream
    #[must_use]
    pub fn for_cell(global_seed: u64, position: Position, tick: u64, stream: u64) -> Self {
        Self::from_seed(derive_seed(global_seed, position, tick, stream))
    }

    /// Uniform draw in [0, 1)
    pub fn uniform(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Sample a Bernoulli trial with probability `p`.
    ///
    /// Always consumes exactly one draw so later rules in the same category
    /// see a stable sequence. Probabilities outside [0, 1] or NaN never fire
    /// above 1 or below 0.
    pub fn chance(&mut self, p: f32) -> bool {
        let draw = self.uniform();
        p > 0.0 && draw < p
    }

    /// Access the underlying generator (e.g. for shuffling)
    pub fn inner_mut(&mut self) -> &mut SmallRng {
        &mut self.rng
    }
}
