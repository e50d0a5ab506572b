//! Per-object visibility record.

use fog_types::TileId;
use std::collections::BTreeSet;

/// Tracking state of one world object.
///
/// `followed` implies `founded`: [`ObjectVisibility::follow`] founds the
/// object whenever it starts following.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectVisibility {
    founded: bool,
    followed: bool,
    illuminated: BTreeSet<TileId>,
}

impl ObjectVisibility {
    pub(crate) fn new(founded: bool) -> Self {
        Self {
            founded,
            ..Self::default()
        }
    }

    /// Restores a record from persisted flags. A followed object is always
    /// founded.
    pub(crate) fn restored(founded: bool, followed: bool, illuminated: BTreeSet<TileId>) -> Self {
        Self {
            founded: founded || followed,
            followed,
            illuminated,
        }
    }

    /// Whether the player knows this object exists.
    pub fn founded(&self) -> bool {
        self.founded
    }

    /// Whether this object re-reveals its surroundings as it moves.
    pub fn followed(&self) -> bool {
        self.followed
    }

    /// Tiles this object grants vision to, ascending.
    pub fn illuminated(&self) -> impl Iterator<Item = TileId> + '_ {
        self.illuminated.iter().copied()
    }

    pub fn illuminates(&self, tile: TileId) -> bool {
        self.illuminated.contains(&tile)
    }

    pub fn illuminated_count(&self) -> usize {
        self.illuminated.len()
    }

    /// Returns true if the flag changed.
    pub(crate) fn set_founded(&mut self, value: bool) -> bool {
        let changed = self.founded != value;
        self.founded = value;
        changed
    }

    pub(crate) fn follow(&mut self, value: bool) {
        self.followed = value;
        if value {
            self.founded = true;
        }
    }

    pub(crate) fn illuminate(&mut self, tile: TileId) -> bool {
        self.illuminated.insert(tile)
    }

    /// Empties the illuminated set and hands back its previous contents.
    pub(crate) fn take_illuminated(&mut self) -> BTreeSet<TileId> {
        std::mem::take(&mut self.illuminated)
    }
}
