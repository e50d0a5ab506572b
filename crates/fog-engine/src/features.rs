//! World feature learning.
//!
//! Named map features (mountain ranges, oceans, deserts) stay unlabelled until
//! the player has explored enough of them.

use fog_types::TileId;
use serde::{Deserialize, Serialize};

use crate::state::VisibilityState;

/// A named region of the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldFeature {
    pub name: String,
    pub tiles: Vec<TileId>,
}

impl WorldFeature {
    pub fn new(name: impl Into<String>, tiles: Vec<TileId>) -> Self {
        Self {
            name: name.into(),
            tiles,
        }
    }

    /// Fraction of this feature's tiles that render as explored.
    ///
    /// A feature without tiles reports zero.
    pub fn explored_fraction(&self, state: &VisibilityState) -> f32 {
        if self.tiles.is_empty() {
            return 0.0;
        }
        let explored = self
            .tiles
            .iter()
            .filter(|tile| state.is_tile_explored(**tile).unwrap_or(false))
            .count();
        explored as f32 / self.tiles.len() as f32
    }
}

/// Features of the current world and which of them the player has learned.
#[derive(Debug, Clone, Default)]
pub struct FeatureLedger {
    features: Vec<WorldFeature>,
    learned: Vec<bool>,
}

impl FeatureLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the feature list, keeping learned flags by index.
    pub fn register(&mut self, features: Vec<WorldFeature>) {
        self.learned.resize(features.len(), false);
        self.features = features;
    }

    /// Restores learned flags from a save, padded to the feature count.
    pub fn restore_learned(&mut self, mut learned: Vec<bool>) {
        learned.resize(self.features.len().max(learned.len()), false);
        self.learned = learned;
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn feature(&self, index: usize) -> Option<&WorldFeature> {
        self.features.get(index)
    }

    pub fn is_learned(&self, index: usize) -> bool {
        self.learned.get(index).copied().unwrap_or(false)
    }

    /// Learned flag per feature, in registration order.
    pub fn learned_flags(&self) -> &[bool] {
        &self.learned
    }

    /// Learns every unlearned feature explored beyond `threshold`.
    ///
    /// Returns the indices learned by this call.
    pub fn learn(&mut self, state: &VisibilityState, threshold: f32) -> Vec<usize> {
        let mut learned = Vec::new();
        for (index, feature) in self.features.iter().enumerate() {
            if self.learned[index] {
                continue;
            }
            if feature.explored_fraction(state) > threshold {
                self.learned[index] = true;
                learned.push(index);
            }
        }
        learned
    }
}
