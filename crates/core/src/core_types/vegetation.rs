use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed physical coefficients of a vegetation class
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VegetationProperties {
    pub fuel_load: f32,          // 0-1, fuel available when fully grown
    pub ignition_threshold: f32, // 0-1, resistance to ignition
    pub burn_rate: f32,          // 0-1, fraction of fuel consumed per unit intensity
    pub regrowth_rate: f32,      // per reference step, probability of Burnt→Tree
}

impl VegetationProperties {
    /// Closed-canopy forest: heavy fuel, slow burning
    pub const DENSE_FOREST: VegetationProperties = VegetationProperties {
        fuel_load: 1.0,
        ignition_threshold: 0.3,
        burn_rate: 0.35,
        regrowth_rate: 0.0005,
    };

    /// Open woodland
    pub const SPARSE_FOREST: VegetationProperties = VegetationProperties {
        fuel_load: 0.7,
        ignition_threshold: 0.4,
        burn_rate: 0.45,
        regrowth_rate: 0.001,
    };

    /// Grass: light fuel, ignites and burns out quickly
    pub const GRASSLAND: VegetationProperties = VegetationProperties {
        fuel_load: 0.35,
        ignition_threshold: 0.2,
        burn_rate: 0.9,
        regrowth_rate: 0.01,
    };

    /// Scrub and heath
    pub const SHRUBLAND: VegetationProperties = VegetationProperties {
        fuel_load: 0.55,
        ignition_threshold: 0.3,
        burn_rate: 0.6,
        regrowth_rate: 0.004,
    };

    /// Built-up area with scattered garden fuel
    pub const URBAN: VegetationProperties = VegetationProperties {
        fuel_load: 0.4,
        ignition_threshold: 0.7,
        burn_rate: 0.25,
        regrowth_rate: 0.0,
    };

    /// Rock, sand, water: nothing to burn
    pub const NON_FLAMMABLE: VegetationProperties = VegetationProperties {
        fuel_load: 0.0,
        ignition_threshold: 1.0,
        burn_rate: 0.0,
        regrowth_rate: 0.0,
    };
}

/// Vegetation cover of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VegetationType {
    DenseForest,
    SparseForest,
    Grassland,
    Shrubland,
    Barren,
    Water,
    Urban,
}

impl VegetationType {
    /// All vegetation types
    pub const ALL: [VegetationType; 7] = [
        VegetationType::DenseForest,
        VegetationType::SparseForest,
        VegetationType::Grassland,
        VegetationType::Shrubland,
        VegetationType::Barren,
        VegetationType::Water,
        VegetationType::Urban,
    ];

    /// Physical coefficients for this vegetation
    #[must_use]
    pub const fn properties(self) -> VegetationProperties {
        match self {
            Self::DenseForest => VegetationProperties::DENSE_FOREST,
            Self::SparseForest => VegetationProperties::SPARSE_FOREST,
            Self::Grassland => VegetationProperties::GRASSLAND,
            Self::Shrubland => VegetationProperties::SHRUBLAND,
            Self::Urban => VegetationProperties::URBAN,
            Self::Barren | Self::Water => VegetationProperties::NON_FLAMMABLE,
        }
    }

    #[must_use]
    pub const fn fuel_load(self) -> f32 {
        self.properties().fuel_load
    }

    #[must_use]
    pub const fn ignition_threshold(self) -> f32 {
        self.properties().ignition_threshold
    }

    #[must_use]
    pub const fn burn_rate(self) -> f32 {
        self.properties().burn_rate
    }

    #[must_use]
    pub const fn regrowth_rate(self) -> f32 {
        self.properties().regrowth_rate
    }

    /// Water and barren ground never burn
    #[must_use]
    pub fn is_flammable(self) -> bool {
        self.fuel_load() > 0.0
    }

    /// Display name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::DenseForest => "DenseForest",
            Self::SparseForest => "SparseForest",
            Self::Grassland => "Grassland",
            Self::Shrubland => "Shrubland",
            Self::Barren => "Barren",
            Self::Water => "Water",
            Self::Urban => "Urban",
        }
    }
}

impl fmt::Display for VegetationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
