//! Identifier Types
//!
//! Dense tile indices and host-assigned object and faction identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a tile in the world grid.
///
/// Tile IDs are dense: a grid of `n` tiles uses `0..n`. Off-map locations
/// are modelled as `Option<TileId>::None` rather than a negative index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub u32);

impl TileId {
    /// Returns the tile ID as a vector index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for TileId {
    fn from(value: u32) -> Self {
        TileId(value)
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tile_{}", self.0)
    }
}

/// Stable identity of a world object, as assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u32);

impl From<u32> for ObjectId {
    fn from(value: u32) -> Self {
        ObjectId(value)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj_{}", self.0)
    }
}

/// Identity of a faction, as assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactionId(pub u32);

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "faction_{}", self.0)
    }
}
