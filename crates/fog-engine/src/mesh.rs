//! Render layer contract.
//!
//! The engine never builds meshes itself. After each batch of mutations it
//! drains its [`DirtyTracker`](crate::dirty::DirtyTracker) into a
//! [`FrameUpdate`] and hands that to a [`LayerSink`] together with a read-only
//! view of the state. Sinks patch only the listed tiles; a full rebuild is
//! only warranted at [`Severity::Planet`].
//!
//! | Severity | Fog overlay | Unexplored overlay | Planet edge |
//! |----------|-------------|--------------------|-------------|
//! | `None`   | -           | -                  | -           |
//! | `Fog`    | patch       | -                  | -           |
//! | `Full`   | patch       | patch              | -           |
//! | `Planet` | patch       | patch              | rebuild     |

use fog_types::{Severity, TileId};

use crate::dirty::DirtyBatch;
use crate::state::VisibilityState;

/// One frame's worth of render work.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameUpdate {
    /// Minimal rebuild scope
    pub severity: Severity,
    /// Tiles whose fog overlay changed, ascending
    pub fog_tiles: Vec<TileId>,
    /// Tiles whose unexplored overlay changed, ascending
    pub explored_tiles: Vec<TileId>,
    /// World object markers need redrawing
    pub objects_dirty: bool,
    /// Features learned during this flush
    pub learned_features: Vec<usize>,
}

impl FrameUpdate {
    pub(crate) fn from_batch(batch: DirtyBatch, learned_features: Vec<usize>) -> Self {
        Self {
            severity: batch.severity,
            fog_tiles: batch.fog_tiles,
            explored_tiles: batch.explored_tiles,
            objects_dirty: batch.objects_dirty,
            learned_features,
        }
    }

    pub fn fog_layer_dirty(&self) -> bool {
        self.severity >= Severity::Fog
    }

    pub fn exploration_layer_dirty(&self) -> bool {
        self.severity >= Severity::Full
    }

    pub fn planet_layer_dirty(&self) -> bool {
        self.severity >= Severity::Planet
    }
}

/// Consumer of drained frames.
pub trait LayerSink {
    /// Applies one frame. `view` reflects the state after every mutation that
    /// produced the frame.
    fn regenerate(&mut self, frame: &FrameUpdate, view: &VisibilityState);
}

impl<S: LayerSink + ?Sized> LayerSink for Box<S> {
    fn regenerate(&mut self, frame: &FrameUpdate, view: &VisibilityState) {
        (**self).regenerate(frame, view)
    }
}

/// Discards every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl LayerSink for NullSink {
    fn regenerate(&mut self, _frame: &FrameUpdate, _view: &VisibilityState) {}
}

/// Keeps every frame it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub frames: Vec<FrameUpdate>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&FrameUpdate> {
        self.frames.last()
    }

    /// Removes and returns the recorded frames.
    pub fn take(&mut self) -> Vec<FrameUpdate> {
        std::mem::take(&mut self.frames)
    }
}

impl LayerSink for RecordingSink {
    fn regenerate(&mut self, frame: &FrameUpdate, _view: &VisibilityState) {
        self.frames.push(frame.clone());
    }
}

/// Incremental overlay masks, one entry per tile.
///
/// `fog` marks tiles drawn under the translucent fog overlay (explored but not
/// currently visible). `cover` marks tiles drawn under the unexplored overlay.
/// Only listed tiles are patched; the whole mask is resynchronized on the
/// first frame and on planet-level frames.
#[derive(Debug, Clone, Default)]
pub struct OverlayMask {
    fog: Vec<bool>,
    cover: Vec<bool>,
    /// Frames applied
    pub frames: u64,
    /// Individual tile patches applied across both masks
    pub patched_tiles: u64,
    /// Whole-mask resynchronizations
    pub full_rebuilds: u64,
}

impl OverlayMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fogged(&self, tile: TileId) -> bool {
        self.fog.get(tile.index()).copied().unwrap_or(false)
    }

    pub fn is_covered(&self, tile: TileId) -> bool {
        self.cover.get(tile.index()).copied().unwrap_or(true)
    }

    pub fn fogged_count(&self) -> usize {
        self.fog.iter().filter(|shown| **shown).count()
    }

    pub fn covered_count(&self) -> usize {
        self.cover.iter().filter(|shown| **shown).count()
    }

    fn fog_shown(view: &VisibilityState, tile: TileId) -> bool {
        let visible = view.is_tile_visible(tile).unwrap_or(false);
        let explored = view.is_tile_explored(tile).unwrap_or(false);
        explored && !visible
    }

    fn cover_shown(view: &VisibilityState, tile: TileId) -> bool {
        !view.is_tile_explored(tile).unwrap_or(false)
    }

    fn rebuild(&mut self, view: &VisibilityState) {
        let count = view.tile_count();
        self.fog = (0..count)
            .map(|index| Self::fog_shown(view, TileId(index as u32)))
            .collect();
        self.cover = (0..count)
            .map(|index| Self::cover_shown(view, TileId(index as u32)))
            .collect();
        self.full_rebuilds += 1;
    }
}

impl LayerSink for OverlayMask {
    fn regenerate(&mut self, frame: &FrameUpdate, view: &VisibilityState) {
        self.frames += 1;
        if self.fog.len() != view.tile_count() || frame.planet_layer_dirty() {
            self.rebuild(view);
            return;
        }

        for &tile in &frame.fog_tiles {
            if let Some(slot) = self.fog.get_mut(tile.index()) {
                *slot = Self::fog_shown(view, tile);
                self.patched_tiles += 1;
            }
        }
        for &tile in &frame.explored_tiles {
            if let Some(slot) = self.cover.get_mut(tile.index()) {
                *slot = Self::cover_shown(view, tile);
                self.patched_tiles += 1;
            }
        }
    }
}
