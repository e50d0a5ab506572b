//! Terrain Attributes
//!
//! Per-tile attributes the host grid exposes to the reveal algorithm.

use serde::{Deserialize, Serialize};

/// Tile relief, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Hilliness {
    #[default]
    Undefined = 0,
    Flat = 1,
    SmallHills = 2,
    LargeHills = 3,
    Mountainous = 4,
    Impassable = 5,
}

impl Hilliness {
    /// Numeric height level used in range arithmetic.
    pub fn level(self) -> i32 {
        self as i32
    }

    /// Converts a height level back, clamping out-of-range values.
    pub fn from_level(level: i32) -> Self {
        match level {
            i32::MIN..=0 => Hilliness::Undefined,
            1 => Hilliness::Flat,
            2 => Hilliness::SmallHills,
            3 => Hilliness::LargeHills,
            4 => Hilliness::Mountainous,
            _ => Hilliness::Impassable,
        }
    }
}

/// Terrain attributes of one tile.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Terrain {
    pub hilliness: Hilliness,
    /// Pollution in `0.0..=1.0`
    #[serde(default)]
    pub pollution: f32,
    /// Swampiness in `0.0..=1.0`
    #[serde(default)]
    pub swampiness: f32,
}

impl Terrain {
    pub fn new(hilliness: Hilliness, pollution: f32, swampiness: f32) -> Self {
        Self {
            hilliness,
            pollution,
            swampiness,
        }
    }

    /// Flat terrain with no pollution or swamp.
    pub fn flat() -> Self {
        Self::new(Hilliness::Flat, 0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        assert_eq!(Hilliness::Undefined.level(), 0);
        assert_eq!(Hilliness::Mountainous.level(), 4);
        assert_eq!(Hilliness::from_level(3), Hilliness::LargeHills);
        assert_eq!(Hilliness::from_level(-2), Hilliness::Undefined);
        assert_eq!(Hilliness::from_level(9), Hilliness::Impassable);
    }

    #[test]
    fn test_ordering_matches_levels() {
        assert!(Hilliness::Flat < Hilliness::SmallHills);
        assert!(Hilliness::Mountainous > Hilliness::LargeHills);
    }

    #[test]
    fn test_default_terrain() {
        let terrain = Terrain::default();
        assert_eq!(terrain.hilliness, Hilliness::Undefined);
        assert_eq!(terrain.pollution, 0.0);
        assert_eq!(terrain.swampiness, 0.0);
    }
}
