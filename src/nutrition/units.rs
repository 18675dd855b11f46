//! Serving units and conversion constants
//!
//! Nutrient amounts are stored per fixed reference quantity of a food's base
//! unit (grams for solids, milliliters for liquids).

use serde::{Deserialize, Serialize};

/// Reference quantity nutrient amounts are expressed per
pub const PORTION_SIZE: f64 = 100.0;

/// Grams per ounce
pub const G_PER_OZ: f64 = 28.3495;
/// Milliliters per fluid ounce
pub const ML_PER_FL_OZ: f64 = 29.5735;

/// Weight-or-volume discriminator of a serving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServingSizeUnit {
    /// Measured in grams
    #[default]
    Weight,
    /// Measured in milliliters
    Volume,
}

impl ServingSizeUnit {
    /// Canonical unit suffix ("g" or "ml")
    pub fn canonical_unit(&self) -> &'static str {
        match self {
            ServingSizeUnit::Weight => "g",
            ServingSizeUnit::Volume => "ml",
        }
    }

    /// Display name of the one-ounce equivalent for this unit
    pub fn ounce_unit(&self) -> &'static str {
        match self {
            ServingSizeUnit::Weight => "oz",
            ServingSizeUnit::Volume => "fl oz",
        }
    }

    /// One ounce (weight or fluid) in the canonical unit
    pub fn one_ounce(&self) -> f64 {
        match self {
            ServingSizeUnit::Weight => G_PER_OZ,
            ServingSizeUnit::Volume => ML_PER_FL_OZ,
        }
    }

    /// Parse from a stored unit code
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "g" | "gram" | "grams" | "weight" => Some(ServingSizeUnit::Weight),
            "ml" | "milliliter" | "milliliters" | "volume" => Some(ServingSizeUnit::Volume),
            _ => None,
        }
    }

    /// Convert to database string
    pub fn to_db_str(&self) -> &'static str {
        self.canonical_unit()
    }
}

impl std::fmt::Display for ServingSizeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.canonical_unit())
    }
}
