//! Exploration progress reports.

use fog_engine::{ExplorationManager, OverlayMask, TileGrid};
use serde::Serialize;

/// Exploration progress at one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub tick: u64,
    pub explored_pct: f32,
    pub visible_pct: f32,
    pub founded_objects: usize,
    pub learned_features: usize,
    /// Frames delivered to the overlay mask so far
    pub frames: u64,
    pub patched_tiles: u64,
    pub full_rebuilds: u64,
}

impl ProgressReport {
    pub fn capture(tick: u64, engine: &ExplorationManager<TileGrid, OverlayMask>) -> Self {
        let state = engine.state();
        let tiles = state.tile_count().max(1) as f32;
        let mask = engine.sink();
        Self {
            tick,
            explored_pct: state.explored_count() as f32 * 100.0 / tiles,
            visible_pct: state.visible_count() as f32 * 100.0 / tiles,
            founded_objects: state.objects().filter(|(_, object)| object.founded()).count(),
            learned_features: engine.features().learned_flags().iter().filter(|learned| **learned).count(),
            frames: mask.frames,
            patched_tiles: mask.patched_tiles,
            full_rebuilds: mask.full_rebuilds,
        }
    }

    /// One-line summary for the console.
    pub fn summary(&self) -> String {
        format!(
            "[Tick {:>6}] explored {:>5.1}% | visible {:>5.1}% | founded {:>3} | features {} | frames {} ({} tiles patched, {} rebuilds)",
            self.tick,
            self.explored_pct,
            self.visible_pct,
            self.founded_objects,
            self.learned_features,
            self.frames,
            self.patched_tiles,
            self.full_rebuilds
        )
    }
}
