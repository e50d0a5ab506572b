//! Save Format
//!
//! Serialization structs for persisting exploration state across sessions.
//!
//! Tile records are stored densely in tile-ID order, so a save only loads
//! against a grid with the same tile count.

use serde::{Deserialize, Serialize};

use crate::{ObjectId, Severity, TileId};

/// Current save format version.
pub const SAVE_FORMAT_VERSION: u32 = 1;

/// Persisted state of one tile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileRecord {
    pub explored: bool,
    pub visible: bool,
    /// Objects granting vision to this tile
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub beholders: Vec<ObjectId>,
}

/// Persisted state of one tracked object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub id: ObjectId,
    pub founded: bool,
    pub followed: bool,
    /// Tiles this object grants vision to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub illuminated: Vec<TileId>,
}

/// Complete persisted exploration state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilitySave {
    /// Save format version
    pub version: u32,
    /// Global reveal flag (satellite scan or debug toggle)
    #[serde(default)]
    pub reveal_all: bool,
    /// Severity pending at save time
    #[serde(default)]
    pub severity: Severity,
    /// One record per tile, in tile-ID order
    pub tiles: Vec<TileRecord>,
    /// Tracked objects
    #[serde(default)]
    pub objects: Vec<ObjectRecord>,
    /// Objects queued for a movement-triggered re-reveal
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pending: Vec<ObjectId>,
    /// Learned flag per world feature
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub learned_features: Vec<bool>,
}

impl VisibilitySave {
    /// Creates an empty save for a grid of the given size.
    pub fn empty(tile_count: usize) -> Self {
        Self {
            version: SAVE_FORMAT_VERSION,
            reveal_all: false,
            severity: Severity::None,
            tiles: vec![TileRecord::default(); tile_count],
            objects: Vec::new(),
            pending: Vec::new(),
            learned_features: Vec::new(),
        }
    }

    /// Number of tiles recorded.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Number of explored tiles recorded.
    pub fn explored_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.explored).count()
    }

    /// Parses a save from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the save as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_save() {
        let save = VisibilitySave::empty(12);
        assert_eq!(save.version, SAVE_FORMAT_VERSION);
        assert_eq!(save.tile_count(), 12);
        assert_eq!(save.explored_count(), 0);
        assert!(save.objects.is_empty());
    }

    #[test]
    fn test_empty_beholders_are_omitted() {
        let record = TileRecord {
            explored: true,
            visible: false,
            beholders: Vec::new(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("beholders"));
    }

    #[test]
    fn test_minimal_save_parses() {
        let json = r#"{
            "version": 1,
            "tiles": [
                {"explored": true, "visible": true, "beholders": [3]},
                {"explored": true, "visible": false},
                {"explored": false, "visible": false}
            ],
            "objects": [
                {"id": 3, "founded": true, "followed": true, "illuminated": [0]}
            ]
        }"#;

        let save = VisibilitySave::from_json(json).unwrap();
        assert_eq!(save.tile_count(), 3);
        assert_eq!(save.explored_count(), 2);
        assert_eq!(save.tiles[0].beholders, vec![ObjectId(3)]);
        assert_eq!(save.objects[0].illuminated, vec![TileId(0)]);
        assert!(!save.reveal_all);
        assert_eq!(save.severity, Severity::None);
        assert!(save.pending.is_empty());
    }
}
