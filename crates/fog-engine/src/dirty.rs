//! Dirty tracking for incremental overlay rebuilds.
//!
//! Collects the tiles whose visibility changed since the render layer last
//! drained, plus the minimal [`Severity`] of rebuild they require. Ordered sets
//! give automatic deduplication: a tile touched by many triggers in one frame
//! is patched once.

use fog_types::{Severity, TileId};
use std::collections::BTreeSet;

/// Everything the render layer has to patch for one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtyBatch {
    /// Minimal rebuild scope
    pub severity: Severity,
    /// Tiles whose fog overlay must be patched, ascending
    pub fog_tiles: Vec<TileId>,
    /// Tiles whose unexplored overlay must be patched, ascending
    pub explored_tiles: Vec<TileId>,
    /// Whether world object markers need redrawing
    pub objects_dirty: bool,
}

impl DirtyBatch {
    /// Returns true if nothing needs patching.
    pub fn is_empty(&self) -> bool {
        self.severity == Severity::None
            && self.fog_tiles.is_empty()
            && self.explored_tiles.is_empty()
            && !self.objects_dirty
    }
}

/// Accumulates dirty tiles and severity between drains.
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    fog: BTreeSet<TileId>,
    explored: BTreeSet<TileId>,
    severity: Severity,
    objects_dirty: bool,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a change to a tile's visible flag.
    pub fn mark_visible_changed(&mut self, tile: TileId) {
        self.fog.insert(tile);
        self.raise(Severity::Fog);
    }

    /// Records a change to a tile's explored flag.
    ///
    /// Exploration changes both overlays.
    pub fn mark_explored_changed(&mut self, tile: TileId) {
        self.fog.insert(tile);
        self.explored.insert(tile);
        self.raise(Severity::Full);
    }

    /// Marks every tile in `0..tile_count` dirty in both sets.
    pub fn mark_all(&mut self, tile_count: usize) {
        for index in 0..tile_count {
            let tile = TileId(index as u32);
            self.fog.insert(tile);
            self.explored.insert(tile);
        }
    }

    /// Flags the world object markers for redrawing.
    pub fn mark_objects_dirty(&mut self) {
        self.objects_dirty = true;
    }

    /// Raises severity to at least `level`. Never lowers it.
    pub fn raise(&mut self, level: Severity) {
        if level > self.severity {
            self.severity = level;
        }
    }

    /// Current severity.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns true if `tile` is waiting for a fog patch.
    pub fn is_fog_dirty(&self, tile: TileId) -> bool {
        self.fog.contains(&tile)
    }

    /// Returns true if `tile` is waiting for an exploration patch.
    pub fn is_explored_dirty(&self, tile: TileId) -> bool {
        self.explored.contains(&tile)
    }

    /// Number of tiles waiting for a fog patch.
    pub fn fog_len(&self) -> usize {
        self.fog.len()
    }

    /// Number of tiles waiting for an exploration patch.
    pub fn explored_len(&self) -> usize {
        self.explored.len()
    }

    /// Returns true if any tile is dirty or severity is above `None`.
    pub fn has_dirty(&self) -> bool {
        !self.fog.is_empty()
            || !self.explored.is_empty()
            || self.severity > Severity::None
            || self.objects_dirty
    }

    /// Takes all pending work and resets the tracker.
    ///
    /// This is the only place severity returns to `None`.
    pub fn drain(&mut self) -> DirtyBatch {
        let batch = DirtyBatch {
            severity: self.severity,
            fog_tiles: std::mem::take(&mut self.fog).into_iter().collect(),
            explored_tiles: std::mem::take(&mut self.explored).into_iter().collect(),
            objects_dirty: self.objects_dirty,
        };
        self.severity = Severity::None;
        self.objects_dirty = false;
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_change_marks_fog_only() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_visible_changed(TileId(3));

        assert!(tracker.is_fog_dirty(TileId(3)));
        assert!(!tracker.is_explored_dirty(TileId(3)));
        assert_eq!(tracker.severity(), Severity::Fog);
    }

    #[test]
    fn test_explored_change_marks_both() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_explored_changed(TileId(5));

        assert!(tracker.is_fog_dirty(TileId(5)));
        assert!(tracker.is_explored_dirty(TileId(5)));
        assert_eq!(tracker.severity(), Severity::Full);
    }

    #[test]
    fn test_severity_never_lowers() {
        let mut tracker = DirtyTracker::new();
        tracker.raise(Severity::Planet);
        tracker.mark_visible_changed(TileId(0));
        tracker.raise(Severity::Fog);
        assert_eq!(tracker.severity(), Severity::Planet);
    }

    #[test]
    fn test_duplicates_collapse() {
        let mut tracker = DirtyTracker::new();
        for _ in 0..10 {
            tracker.mark_visible_changed(TileId(1));
            tracker.mark_explored_changed(TileId(1));
        }
        assert_eq!(tracker.fog_len(), 1);
        assert_eq!(tracker.explored_len(), 1);
    }

    #[test]
    fn test_drain_returns_sorted_and_resets() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_visible_changed(TileId(9));
        tracker.mark_explored_changed(TileId(2));
        tracker.mark_visible_changed(TileId(4));
        tracker.mark_objects_dirty();

        let batch = tracker.drain();
        assert_eq!(batch.severity, Severity::Full);
        assert_eq!(batch.fog_tiles, vec![TileId(2), TileId(4), TileId(9)]);
        assert_eq!(batch.explored_tiles, vec![TileId(2)]);
        assert!(batch.objects_dirty);

        assert!(!tracker.has_dirty());
        assert_eq!(tracker.severity(), Severity::None);

        // A second drain with no new mutations stays empty
        let again = tracker.drain();
        assert!(again.is_empty());
    }

    #[test]
    fn test_mark_all() {
        let mut tracker = DirtyTracker::new();
        tracker.mark_all(6);
        assert_eq!(tracker.fog_len(), 6);
        assert_eq!(tracker.explored_len(), 6);
        // Marking alone does not pick a severity
        assert_eq!(tracker.severity(), Severity::None);
    }
}
