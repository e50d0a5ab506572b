//! Per-tile visibility record.

use fog_types::{ObjectId, TileId};
use std::collections::BTreeSet;

use crate::dirty::DirtyTracker;

/// Explored and visible flags of one tile plus the objects lighting it.
///
/// Flag setters take the tile's own ID and the frame's [`DirtyTracker`] so
/// every actual change is recorded for the overlay consumer. Writing the value
/// a flag already holds records nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileVisibility {
    explored: bool,
    visible: bool,
    beholders: BTreeSet<ObjectId>,
}

impl TileVisibility {
    /// Restores a record from persisted flags.
    pub(crate) fn restored(explored: bool, visible: bool) -> Self {
        Self {
            explored,
            visible,
            beholders: BTreeSet::new(),
        }
    }

    /// Raw explored flag, without settings or the global reveal applied.
    pub fn explored(&self) -> bool {
        self.explored
    }

    /// Raw visible flag, without the global reveal applied.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Objects currently granting vision to this tile, ascending.
    pub fn beholders(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.beholders.iter().copied()
    }

    pub fn has_beholder(&self, object: ObjectId) -> bool {
        self.beholders.contains(&object)
    }

    pub fn beholder_count(&self) -> usize {
        self.beholders.len()
    }

    pub(crate) fn set_explored(&mut self, id: TileId, value: bool, dirty: &mut DirtyTracker) {
        if self.explored != value {
            self.explored = value;
            dirty.mark_explored_changed(id);
        }
    }

    pub(crate) fn set_visible(&mut self, id: TileId, value: bool, dirty: &mut DirtyTracker) {
        if self.visible != value {
            self.visible = value;
            dirty.mark_visible_changed(id);
        }
    }

    /// Sets both flags at once.
    pub(crate) fn set_all(&mut self, id: TileId, value: bool, dirty: &mut DirtyTracker) {
        self.set_explored(id, value, dirty);
        self.set_visible(id, value, dirty);
    }

    /// Registers `object` as a beholder. Returns false if it already was one.
    pub(crate) fn insert_beholder(&mut self, object: ObjectId) -> bool {
        self.beholders.insert(object)
    }

    /// Unregisters `object`. Returns false if it was not a beholder.
    pub(crate) fn remove_beholder(&mut self, object: ObjectId) -> bool {
        self.beholders.remove(&object)
    }

    /// Recomputes the visible flag from the beholder set.
    ///
    /// With `fog_disabled` an explored tile stays visible regardless of
    /// beholders.
    pub(crate) fn check_vision(&mut self, id: TileId, fog_disabled: bool, dirty: &mut DirtyTracker) {
        if fog_disabled && self.explored {
            self.set_visible(id, true, dirty);
            return;
        }
        let lit = !self.beholders.is_empty();
        self.set_visible(id, lit, dirty);
    }
}
