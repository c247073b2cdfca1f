//! Discrete events emitted by state transitions

use crate::core_types::Position;
use serde::{Deserialize, Serialize};

/// What set a cell alight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IgnitionCause {
    /// Heat and flame contact from an adjacent burning cell
    NeighborSpread,
    /// Wind-borne firebrand from a burning cell two cells upwind
    Ember,
    /// Spontaneous or lightning ignition
    Spark,
}

/// Why a fire went out before exhausting its fuel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtinctionCause {
    MoistureSuppression,
    NeighborIsolation,
    TemperatureDecay,
}

/// How vegetation returned to a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecoveryCause {
    /// Seeds from neighboring trees
    SeedDispersal,
    /// Resprouting on a burnt cell
    Regrowth,
    /// Colonization of bare ground
    Succession,
}

/// State transition recorded during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FireEvent {
    /// Tree → Burning
    Ignition {
        position: Position,
        cause: IgnitionCause,
    },
    /// Burning → Burnt before the fuel ran out
    Extinction {
        position: Position,
        cause: ExtinctionCause,
    },
    /// Burning → Burnt through fuel depletion
    Burnout { position: Position },
    /// Burnt/Empty → Tree
    Recovery {
        position: Position,
        cause: RecoveryCause,
    },
}

impl FireEvent {
    /// Cell the event happened at
    #[must_use]
    pub fn position(&self) -> Position {
        match *self {
            Self::Ignition { position, .. }
            | Self::Extinction { position, .. }
            | Self::Burnout { position }
            | Self::Recovery { position, .. } => position,
        }
    }

    #[must_use]
    pub fn is_ignition(&self) -> bool {
        matches!(self, Self::Ignition { .. })
    }

    /// Extinction or burnout
    #[must_use]
    pub fn ends_fire(&self) -> bool {
        matches!(self, Self::Extinction { .. } | Self::Burnout { .. })
    }
}
