//! Exploration coordinator.
//!
//! [`ExplorationManager`] owns one session's visibility state, a mirror of the
//! host's object descriptors, and the render sink. Hosts call one method per
//! game event; every method that mutates state ends by flushing the dirty
//! tracker to the sink, except [`ExplorationManager::on_object_moved`], which
//! only queues work for the next batch in [`ExplorationManager::tick`].

use fog_types::{
    Allegiance, FactionId, FactionRef, ObjectDescriptor, ObjectId, ObjectKind, ProgramState, Severity, TileId,
    VisibilitySave,
};
use glam::Vec3;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};

use crate::classify::{classify, is_object_visible};
use crate::config::{EngineConfig, FogSettings};
use crate::error::{PersistError, VisibilityError};
use crate::features::{FeatureLedger, WorldFeature};
use crate::grid::WorldGrid;
use crate::knowledge::{pick_locations, KnowledgeSource};
use crate::mesh::{FrameUpdate, LayerSink};
use crate::persist;
use crate::reveal::{neighbors_within, reveal_at, reveal_init, reveal_with_object};
use crate::state::VisibilityState;

/// Visibility engine for one game session.
pub struct ExplorationManager<G: WorldGrid, S: LayerSink> {
    grid: G,
    sink: S,
    config: EngineConfig,
    state: VisibilityState,
    /// Last descriptor reported by the host for each object
    objects: BTreeMap<ObjectId, ObjectDescriptor>,
    /// Followed objects that moved since the last batch, in arrival order
    pending: Vec<ObjectId>,
    /// Remaining skipped calls per aerial unit
    aerial_cooldowns: BTreeMap<ObjectId, u32>,
    features: FeatureLedger,
    /// Tiles lit by the current pre-game preview
    preview_tiles: Vec<TileId>,
}

impl<G: WorldGrid, S: LayerSink> ExplorationManager<G, S> {
    /// Starts a session with every tile unexplored and no objects.
    pub fn new(grid: G, sink: S, config: EngineConfig) -> Self {
        let mut state = VisibilityState::new(grid.tile_count());
        state.set_settings(config.settings);
        info!(tiles = grid.tile_count(), "Exploration state initialized");
        Self {
            grid,
            sink,
            config,
            state,
            objects: BTreeMap::new(),
            pending: Vec::new(),
            aerial_cooldowns: BTreeMap::new(),
            features: FeatureLedger::new(),
            preview_tiles: Vec::new(),
        }
    }

    /// Restores a session from a save.
    ///
    /// `descriptors` is every object the host currently knows. Saved records
    /// and queued moves for any other object are dropped. A loaded session
    /// is in play, so visibility is re-derived under `Playing` before
    /// returning.
    pub fn load(
        grid: G,
        sink: S,
        config: EngineConfig,
        save: &VisibilitySave,
        descriptors: Vec<ObjectDescriptor>,
    ) -> Result<Self, PersistError> {
        let objects: BTreeMap<ObjectId, ObjectDescriptor> =
            descriptors.into_iter().map(|desc| (desc.id, desc)).collect();
        let known: BTreeSet<ObjectId> = objects.keys().copied().collect();

        let mut state = persist::restore(save, grid.tile_count(), &known)?;
        state.set_settings(config.settings);
        state.set_program_state(ProgramState::Playing);

        let dropped = save.objects.iter().filter(|r| !known.contains(&r.id)).count();
        if dropped > 0 {
            warn!(dropped, "Dropped saved records for objects the host no longer reports");
        }

        let mut pending = Vec::new();
        for id in &save.pending {
            if !known.contains(id) {
                warn!(object = %id, "Dropped queued move for unknown object");
            } else if !pending.contains(id) {
                pending.push(*id);
            }
        }

        let mut features = FeatureLedger::new();
        features.restore_learned(save.learned_features.clone());

        let mut manager = Self {
            grid,
            sink,
            config,
            state,
            objects,
            pending,
            aerial_cooldowns: BTreeMap::new(),
            features,
            preview_tiles: Vec::new(),
        };
        manager.loaded_game();
        Ok(manager)
    }

    /// Captures the session for persistence.
    pub fn save(&self) -> VisibilitySave {
        persist::snapshot(&self.state, &self.pending, self.features.learned_flags())
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only view of the visibility store.
    pub fn state(&self) -> &VisibilityState {
        &self.state
    }

    pub fn descriptor(&self, id: ObjectId) -> Option<&ObjectDescriptor> {
        self.objects.get(&id)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ObjectDescriptor> {
        self.objects.values()
    }

    /// Objects queued for the next movement batch.
    pub fn pending(&self) -> &[ObjectId] {
        &self.pending
    }

    pub fn features(&self) -> &FeatureLedger {
        &self.features
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn is_tile_visible(&self, tile: TileId) -> Result<bool, VisibilityError> {
        self.state.is_tile_visible(tile)
    }

    pub fn is_tile_explored(&self, tile: TileId) -> Result<bool, VisibilityError> {
        self.state.is_tile_explored(tile)
    }

    /// Whether the host should show the object. Unknown objects are only
    /// shown under a global reveal.
    pub fn is_object_visible(&self, id: ObjectId) -> bool {
        match self.objects.get(&id) {
            Some(desc) => is_object_visible(&self.state, desc),
            None => self.state.reveal_all(),
        }
    }

    pub fn is_founded(&self, id: ObjectId) -> bool {
        self.state.is_founded(id)
    }

    pub fn is_followed(&self, id: ObjectId) -> bool {
        self.state.is_followed(id)
    }

    pub fn is_feature_learned(&self, index: usize) -> bool {
        self.features.is_learned(index)
    }

    /// Reclassifies an object, updating its followed flag.
    pub fn trackable(&mut self, id: ObjectId) -> Result<bool, VisibilityError> {
        let desc = self.objects.get(&id).ok_or(VisibilityError::UnknownObject(id))?;
        Ok(classify(&mut self.state, desc))
    }

    /// Every tile within `range` hops of `tile`, the origin included.
    pub fn neighbors_within(&self, tile: TileId, range: u32) -> Result<Vec<TileId>, VisibilityError> {
        neighbors_within(&self.grid, tile, range)
    }

    // ------------------------------------------------------------------
    // Lifecycle and settings
    // ------------------------------------------------------------------

    /// A freshly generated world is about to be played.
    pub fn started_new_game(&mut self) {
        info!("Started new game");
        self.refresh_all_tiles();
    }

    /// A save has been restored; re-derive visibility from beholders.
    pub fn loaded_game(&mut self) {
        info!(objects = self.state.object_count(), "Loaded game");
        self.refresh_all_tiles();
    }

    fn refresh_all_tiles(&mut self) {
        self.state.mark_all_dirty();
        self.state.mass_check();
        self.state.dirty_mut().raise(Severity::Full);
        self.update_graphics();
    }

    /// Switches between world selection and play.
    pub fn set_program_state(&mut self, program_state: ProgramState) {
        if self.state.program_state() != program_state {
            info!(?program_state, "Program state changed");
        }
        self.state.set_program_state(program_state);
        if program_state != ProgramState::Entry {
            self.state.mass_check();
            self.state.dirty_mut().raise(Severity::Full);
            self.update_graphics();
        }
    }

    /// Applies new user toggles. Visibility is only re-derived during play.
    pub fn on_settings_changed(&mut self, settings: FogSettings) {
        debug!(?settings, "Fog settings changed");
        self.config.settings = settings;
        self.state.set_settings(settings);
        if self.state.program_state() == ProgramState::Playing {
            self.state.mass_check();
            self.state.dirty_mut().raise(Severity::Full);
            self.update_graphics();
        }
    }

    /// Debug action: flips the global reveal. Returns the new value.
    pub fn toggle_reveal_all(&mut self) -> bool {
        let reveal_all = !self.state.reveal_all();
        info!(reveal_all, "Toggled reveal-all");
        self.state.set_reveal_all(reveal_all);
        self.state.mark_all_dirty();
        self.state.dirty_mut().raise(Severity::Full);
        self.update_graphics();
        reveal_all
    }

    /// A research project unlocked a permanent global scan.
    pub fn on_global_scan(&mut self) {
        info!("Global scan unlocked");
        self.state.set_reveal_all(true);
        self.reveal_world_without_flush();
        self.update_graphics();
    }

    /// Explores and lights every tile and founds every known object.
    pub fn reveal_world(&mut self) {
        self.reveal_world_without_flush();
        self.update_graphics();
    }

    fn reveal_world_without_flush(&mut self) {
        self.state.reveal_everything();
        for desc in self.objects.values() {
            if desc.kind.is_map_parent() {
                self.state
                    .ensure_tracked(desc.id, desc.is_player_owned(), desc.tile);
                self.state.set_founded(desc.id, true);
            }
        }
        info!(tiles = self.state.tile_count(), "Revealed world");
    }

    /// Reveals the world and makes `id` a beholder of every tile.
    pub fn scan_all_with_object(&mut self, id: ObjectId) -> Result<(), VisibilityError> {
        let desc = self.objects.get(&id).ok_or(VisibilityError::UnknownObject(id))?;
        self.state.ensure_tracked(id, desc.is_player_owned(), desc.tile);
        self.reveal_world_without_flush();
        for index in 0..self.state.tile_count() {
            self.state.add_vision(TileId(index as u32), id)?;
        }
        info!(object = %id, "Scanned every tile");
        self.update_graphics();
        Ok(())
    }

    /// Previews the area around a hovered tile during world selection.
    ///
    /// The previous preview is rolled back first. Does nothing during play.
    pub fn preview_at(&mut self, tile: TileId) -> Result<(), VisibilityError> {
        if self.state.program_state() != ProgramState::Entry {
            return Ok(());
        }
        for previous in std::mem::take(&mut self.preview_tiles) {
            self.state.reset_tile(previous)?;
        }
        self.preview_tiles = reveal_init(&mut self.state, &self.grid, tile, self.config.ranges.preview_range)?;
        self.update_graphics();
        Ok(())
    }

    /// Replaces the world's named features. Learned flags are kept by index.
    pub fn register_features(&mut self, features: Vec<WorldFeature>) {
        debug!(count = features.len(), "Registered world features");
        self.features.register(features);
    }

    // ------------------------------------------------------------------
    // Object triggers
    // ------------------------------------------------------------------

    fn reveal_object(&mut self, id: ObjectId, range: u32, ignore_terrain: bool) -> Result<usize, VisibilityError> {
        let Some(tile) = self.objects.get(&id).and_then(|desc| desc.tile) else {
            return Ok(0);
        };
        let lit = reveal_with_object(
            &mut self.state,
            &self.grid,
            &self.config.ranges,
            id,
            tile,
            range,
            ignore_terrain,
        )?;
        debug!(object = %id, %tile, range, lit, "Revealed around object");
        Ok(lit)
    }

    fn track(&mut self, id: ObjectId) {
        if let Some(desc) = self.objects.get(&id) {
            self.state.ensure_tracked(id, desc.is_player_owned(), desc.tile);
        }
    }

    fn classify_object(&mut self, id: ObjectId) -> bool {
        match self.objects.get(&id) {
            Some(desc) => classify(&mut self.state, desc),
            None => false,
        }
    }

    fn destroyed_settlement_at(&self, id: ObjectId, tile: Option<TileId>) -> bool {
        let Some(tile) = tile else {
            return false;
        };
        self.objects
            .values()
            .any(|other| other.id != id && other.kind == ObjectKind::DestroyedSettlement && other.tile == Some(tile))
    }

    /// A world object entered the world.
    ///
    /// Unnamed objects are mirrored but never tracked. Objects with a faction
    /// are classified; trackable ones and player settlements reveal their
    /// surroundings. Satellites then scan the whole world.
    pub fn on_object_added(&mut self, desc: ObjectDescriptor) -> Result<(), VisibilityError> {
        let id = desc.id;
        let has_faction = desc.faction.is_some();
        let satellite = desc.flags.satellite;
        let player_settlement = desc.is_player_owned() && desc.kind == ObjectKind::Settlement;
        let has_name = desc.has_name;
        self.objects.insert(id, desc);

        if !has_name {
            return Ok(());
        }
        self.track(id);

        if has_faction {
            if self.classify_object(id) || player_settlement {
                self.reveal_object(id, self.config.ranges.follow_range, false)?;
            }
            let founded = match self.objects.get(&id) {
                Some(desc) => is_object_visible(&self.state, desc) || self.destroyed_settlement_at(id, desc.tile),
                None => false,
            };
            if founded {
                self.state.set_founded(id, true);
            }
        }
        self.update_graphics();

        if satellite {
            self.scan_all_with_object(id)?;
        }
        Ok(())
    }

    /// A world object left the world. Its vision is retracted first.
    pub fn on_object_removed(&mut self, id: ObjectId) {
        self.objects.remove(&id);
        self.pending.retain(|queued| *queued != id);
        self.aerial_cooldowns.remove(&id);
        if self.state.remove_object(id) {
            debug!(object = %id, "Stopped tracking object");
        }
        self.update_graphics();
    }

    /// A world object was destroyed.
    pub fn on_object_destroyed(&mut self, id: ObjectId) {
        self.on_object_removed(id);
    }

    /// A world object changed tile.
    ///
    /// Followed objects are queued for the next movement batch; nothing is
    /// revealed immediately.
    pub fn on_object_moved(&mut self, id: ObjectId, tile: Option<TileId>) {
        let Some(desc) = self.objects.get_mut(&id) else {
            warn!(object = %id, "Move reported for unknown object");
            return;
        };
        desc.tile = tile;
        if self.state.is_followed(id) && !self.pending.contains(&id) {
            self.pending.push(id);
        }
    }

    /// A world object changed owner.
    pub fn on_faction_changed(&mut self, id: ObjectId, faction: Option<FactionRef>) -> Result<(), VisibilityError> {
        let Some(desc) = self.objects.get_mut(&id) else {
            warn!(object = %id, "Faction change reported for unknown object");
            return Ok(());
        };
        desc.faction = faction;
        self.track(id);
        if self.classify_object(id) {
            self.reveal_object(id, self.config.ranges.follow_range, false)?;
        } else {
            self.state.remove_vision(id);
        }
        self.update_graphics();
        Ok(())
    }

    /// The number of free colonists on a map or in a caravan changed.
    pub fn on_colonists_changed(&mut self, id: ObjectId, count: u32) -> Result<(), VisibilityError> {
        let Some(desc) = self.objects.get_mut(&id) else {
            warn!(object = %id, "Colonist change reported for unknown object");
            return Ok(());
        };
        desc.free_colonists = Some(count);
        self.track(id);
        if self.classify_object(id) {
            self.reveal_object(id, self.config.ranges.follow_range, false)?;
        } else {
            self.state.remove_vision(id);
        }
        self.update_graphics();
        Ok(())
    }

    /// A faction's relation to the player changed.
    ///
    /// Gaining an alliance follows every object of that faction; losing one
    /// stops following them. Changes outside play, or that neither gain nor
    /// lose an alliance, only update the mirror.
    pub fn on_relation_changed(
        &mut self,
        faction: FactionId,
        previous: Allegiance,
        current: Allegiance,
    ) -> Result<(), VisibilityError> {
        let mut members = Vec::new();
        for desc in self.objects.values_mut() {
            if let Some(owner) = desc.faction.as_mut() {
                if owner.id == faction {
                    owner.allegiance = current;
                    members.push(desc.id);
                }
            }
        }

        if self.state.program_state() != ProgramState::Playing || previous.is_ally() == current.is_ally() {
            return Ok(());
        }

        info!(%faction, ?previous, ?current, objects = members.len(), "Alliance changed");
        for id in members {
            if current.is_ally() {
                self.track(id);
                self.state.follow(id, true);
                self.reveal_object(id, self.config.ranges.follow_range, false)?;
            } else {
                self.state.follow(id, false);
                self.state.remove_vision(id);
            }
        }
        self.update_graphics();
        Ok(())
    }

    /// Periodic host tick.
    ///
    /// Every `update_interval_ticks` the queued moves are processed as one
    /// batch. An object whose reveal fails only misses its own update.
    /// Returns true if a batch ran.
    pub fn tick(&mut self, ticks_game: u64) -> bool {
        let interval = self.config.timing.update_interval_ticks;
        if self.pending.is_empty() || (interval > 0 && ticks_game % interval != 0) {
            return false;
        }

        let batch = std::mem::take(&mut self.pending);
        debug!(tick = ticks_game, objects = batch.len(), "Processing movement batch");
        for id in batch {
            let aerial = self
                .objects
                .get(&id)
                .map(|desc| desc.kind == ObjectKind::AerialUnit)
                .unwrap_or(false);
            let range = if aerial {
                self.config.ranges.aerial_follow_range
            } else {
                self.config.ranges.follow_range
            };
            if let Err(err) = self.reveal_object(id, range, false) {
                warn!(object = %id, error = %err, "Skipped queued move");
            }
        }
        self.update_static_world_objects();
        self.update_graphics();
        true
    }

    /// Per-tick check for an aerial unit drawn at `draw_pos`.
    ///
    /// Snaps the unit to the nearest tile centre within
    /// `aerial_snap_radius` hops. When the tile changes the unit sees
    /// `aerial_sight_range` tiles ignoring terrain, and further checks are
    /// skipped for `aerial_update_interval_ticks` calls. Returns true if the
    /// unit moved.
    pub fn on_aerial_tick(&mut self, id: ObjectId, draw_pos: Vec3) -> Result<bool, VisibilityError> {
        let Some(desc) = self.objects.get(&id) else {
            return Ok(false);
        };
        let (ObjectKind::AerialUnit, Some(current)) = (desc.kind, desc.tile) else {
            return Ok(false);
        };

        let cooldown = self.aerial_cooldowns.entry(id).or_insert(0);
        if *cooldown > 0 {
            *cooldown -= 1;
            return Ok(false);
        }

        let mut closest = current;
        let mut min_distance = f32::MAX;
        for tile in neighbors_within(&self.grid, current, self.config.ranges.aerial_snap_radius)? {
            let distance = draw_pos.distance(self.grid.tile_center(tile));
            if distance < min_distance {
                min_distance = distance;
                closest = tile;
            }
        }

        if closest == current {
            return Ok(false);
        }

        self.on_object_moved(id, Some(closest));
        self.reveal_object(id, self.config.ranges.aerial_sight_range, true)?;
        self.update_static_world_objects();
        self.update_graphics();
        self.aerial_cooldowns
            .insert(id, self.config.timing.aerial_update_interval_ticks);
        Ok(true)
    }

    /// The player learned settlement locations from `source`.
    ///
    /// Returns the settlements revealed, in the order picked.
    pub fn learn_locations<R: Rng + ?Sized>(
        &mut self,
        source: KnowledgeSource,
        rng: &mut R,
    ) -> Result<Vec<ObjectId>, VisibilityError> {
        let candidates: Vec<ObjectId> = self
            .objects
            .values()
            .filter(|desc| source.accepts(desc, self.state.is_founded(desc.id)))
            .map(|desc| desc.id)
            .collect();
        let picked = pick_locations(&candidates, source.max_locations(), rng);
        if picked.is_empty() {
            return Ok(picked);
        }

        let radius = source.radius(&self.config.ranges);
        for &id in &picked {
            self.track(id);
            if let Some(tile) = self.objects.get(&id).and_then(|desc| desc.tile) {
                reveal_at(&mut self.state, &self.grid, id, tile, radius)?;
            }
        }
        info!(?source, revealed = picked.len(), radius, "Learned settlement locations");
        self.update_graphics();
        Ok(picked)
    }

    /// Whether the host should draw the object this frame.
    ///
    /// Hidden quest sites are revealed on the spot so quests always point at
    /// something the player can see.
    pub fn visible_for_drawing(&mut self, id: ObjectId) -> Result<bool, VisibilityError> {
        let Some(desc) = self.objects.get(&id) else {
            return Ok(self.state.reveal_all());
        };
        if is_object_visible(&self.state, desc) {
            return Ok(true);
        }
        if !desc.flags.quest_tagged {
            return Ok(false);
        }

        if let Some(tile) = desc.tile {
            self.track(id);
            reveal_at(&mut self.state, &self.grid, id, tile, self.config.ranges.quest_site_range)?;
            debug!(object = %id, %tile, "Revealed quest site");
            self.update_graphics();
        }
        Ok(true)
    }

    /// Founds every visible map parent and force-tracked object not yet
    /// founded. Returns how many were founded.
    pub fn update_static_world_objects(&mut self) -> usize {
        let newly_seen: Vec<ObjectId> = self
            .objects
            .values()
            .filter(|desc| desc.kind.is_map_parent() || desc.flags.force_track)
            .filter(|desc| !self.state.is_founded(desc.id) && is_object_visible(&self.state, desc))
            .map(|desc| desc.id)
            .collect();

        for &id in &newly_seen {
            self.track(id);
            self.state.set_founded(id, true);
        }
        if !newly_seen.is_empty() {
            debug!(count = newly_seen.len(), "Founded static world objects");
        }
        newly_seen.len()
    }

    /// Drains the dirty tracker into a frame and hands it to the sink.
    ///
    /// Features are learned on frames of `Full` severity or above during play.
    /// Empty frames are not delivered.
    pub fn update_graphics(&mut self) {
        let batch = self.state.dirty_mut().drain();
        let learned = if batch.severity >= Severity::Full && self.state.program_state() == ProgramState::Playing {
            self.features
                .learn(&self.state, self.config.features.learn_threshold)
        } else {
            Vec::new()
        };
        for index in &learned {
            if let Some(feature) = self.features.feature(*index) {
                info!(feature = %feature.name, "Learned world feature");
            }
        }

        let frame = FrameUpdate::from_batch(batch, learned);
        if frame == FrameUpdate::default() {
            return;
        }
        self.sink.regenerate(&frame, &self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TileGrid;
    use crate::mesh::RecordingSink;
    use fog_types::ObjectFlags;

    fn manager(width: u32, height: u32) -> ExplorationManager<TileGrid, RecordingSink> {
        ExplorationManager::new(
            TileGrid::square(width, height),
            RecordingSink::new(),
            EngineConfig::default(),
        )
    }

    fn caravan(id: u32, tile: u32) -> ObjectDescriptor {
        ObjectDescriptor::new(ObjectId(id), ObjectKind::Caravan, Some(TileId(tile)))
            .with_faction(FactionId(0), Allegiance::Player)
    }

    #[test]
    fn test_new_manager_is_dark() {
        let manager = manager(4, 4);
        assert_eq!(manager.state().explored_count(), 0);
        assert!(manager.sink().frames.is_empty());
    }

    #[test]
    fn test_added_player_caravan_reveals() {
        let mut manager = manager(20, 1);
        manager.on_object_added(caravan(1, 10)).unwrap();

        assert!(manager.is_followed(ObjectId(1)));
        assert!(manager.is_founded(ObjectId(1)));
        // Seven hops each way on a line
        assert_eq!(manager.state().explored_count(), 15);
        assert!(manager.is_tile_visible(TileId(3)).unwrap());
        assert!(!manager.is_tile_explored(TileId(2)).unwrap());

        let frame = manager.sink().last().unwrap();
        assert_eq!(frame.severity, Severity::Full);
        assert_eq!(frame.explored_tiles.len(), 15);
    }

    #[test]
    fn test_unnamed_objects_are_ignored() {
        let mut manager = manager(5, 1);
        manager.on_object_added(caravan(1, 2).unnamed()).unwrap();
        assert!(!manager.state().is_tracked(ObjectId(1)));
        assert_eq!(manager.state().explored_count(), 0);
    }

    #[test]
    fn test_move_is_batched_until_interval() {
        let mut manager = manager(30, 1);
        manager.on_object_added(caravan(1, 0)).unwrap();
        manager.on_object_moved(ObjectId(1), Some(TileId(20)));
        manager.on_object_moved(ObjectId(1), Some(TileId(21)));
        assert_eq!(manager.pending(), &[ObjectId(1)]);

        assert!(!manager.tick(2499));
        assert!(!manager.is_tile_explored(TileId(21)).unwrap());

        assert!(manager.tick(2500));
        assert!(manager.pending().is_empty());
        assert!(manager.is_tile_visible(TileId(21)).unwrap());
        assert!(!manager.is_tile_visible(TileId(0)).unwrap());
        assert!(manager.is_tile_explored(TileId(0)).unwrap());
    }

    #[test]
    fn test_bad_move_skips_only_that_object() {
        let mut manager = manager(20, 1);
        manager.on_object_added(caravan(1, 0)).unwrap();
        manager.on_object_added(caravan(2, 10)).unwrap();
        manager.on_object_moved(ObjectId(1), Some(TileId(500)));
        manager.on_object_moved(ObjectId(2), Some(TileId(15)));
        let frames = manager.sink().frames.len();

        assert!(manager.tick(2500));
        assert!(manager.pending().is_empty());
        assert!(manager.is_tile_visible(TileId(19)).unwrap());
        assert!(manager.is_tile_explored(TileId(18)).unwrap());

        assert_eq!(manager.sink().frames.len(), frames + 1);
        let frame = manager.sink().last().unwrap();
        assert!(frame.explored_tiles.contains(&TileId(18)));
    }

    #[test]
    fn test_unfollowed_move_not_queued() {
        let mut manager = manager(5, 1);
        let hostile = ObjectDescriptor::new(ObjectId(2), ObjectKind::Caravan, Some(TileId(0)))
            .with_faction(FactionId(1), Allegiance::Hostile);
        manager.on_object_added(hostile).unwrap();
        manager.on_object_moved(ObjectId(2), Some(TileId(1)));
        assert!(manager.pending().is_empty());
        assert_eq!(manager.descriptor(ObjectId(2)).unwrap().tile, Some(TileId(1)));
    }

    #[test]
    fn test_remove_object_retracts_vision() {
        let mut manager = manager(10, 1);
        manager.on_object_added(caravan(1, 5)).unwrap();
        manager.on_object_moved(ObjectId(1), Some(TileId(6)));
        manager.on_object_destroyed(ObjectId(1));

        assert!(!manager.state().is_tracked(ObjectId(1)));
        assert!(manager.pending().is_empty());
        assert_eq!(manager.state().visible_count(), 0);
        assert_eq!(manager.state().explored_count(), 10);
    }

    #[test]
    fn test_faction_change_retracts_and_restores() {
        let mut manager = manager(10, 1);
        manager.on_object_added(caravan(1, 5)).unwrap();

        manager
            .on_faction_changed(ObjectId(1), Some(FactionRef::new(FactionId(4), Allegiance::Hostile)))
            .unwrap();
        assert!(!manager.is_followed(ObjectId(1)));
        assert_eq!(manager.state().visible_count(), 0);
        // Still known
        assert!(manager.is_founded(ObjectId(1)));

        manager
            .on_faction_changed(ObjectId(1), Some(FactionRef::new(FactionId(0), Allegiance::Player)))
            .unwrap();
        assert!(manager.is_followed(ObjectId(1)));
        assert!(manager.state().visible_count() > 0);
    }

    #[test]
    fn test_aerial_snap_and_cooldown() {
        let mut manager = manager(30, 1);
        let aerial = ObjectDescriptor::new(ObjectId(7), ObjectKind::AerialUnit, Some(TileId(0)))
            .with_faction(FactionId(0), Allegiance::Player);
        manager.on_object_added(aerial).unwrap();

        // Drawn over tile 3
        assert!(manager.on_aerial_tick(ObjectId(7), Vec3::new(3.1, 0.0, 0.0)).unwrap());
        assert_eq!(manager.descriptor(ObjectId(7)).unwrap().tile, Some(TileId(3)));
        // Sight range 10 ignoring terrain
        assert!(manager.is_tile_visible(TileId(13)).unwrap());
        assert!(!manager.is_tile_visible(TileId(14)).unwrap());
        // Moving through the tile setter queues the unit
        assert_eq!(manager.pending(), &[ObjectId(7)]);

        // Cooldown skips the next 100 calls
        for _ in 0..100 {
            assert!(!manager.on_aerial_tick(ObjectId(7), Vec3::new(6.0, 0.0, 0.0)).unwrap());
        }
        assert!(manager.on_aerial_tick(ObjectId(7), Vec3::new(6.0, 0.0, 0.0)).unwrap());
        assert_eq!(manager.descriptor(ObjectId(7)).unwrap().tile, Some(TileId(6)));
    }

    #[test]
    fn test_aerial_snap_limited_to_radius() {
        let mut manager = manager(30, 1);
        let aerial = ObjectDescriptor::new(ObjectId(7), ObjectKind::AerialUnit, Some(TileId(0)))
            .with_faction(FactionId(0), Allegiance::Player);
        manager.on_object_added(aerial).unwrap();

        manager.on_aerial_tick(ObjectId(7), Vec3::new(25.0, 0.0, 0.0)).unwrap();
        assert_eq!(manager.descriptor(ObjectId(7)).unwrap().tile, Some(TileId(5)));
    }

    #[test]
    fn test_non_aerial_objects_ignore_aerial_tick() {
        let mut manager = manager(10, 1);
        manager.on_object_added(caravan(1, 0)).unwrap();
        assert!(!manager.on_aerial_tick(ObjectId(1), Vec3::new(5.0, 0.0, 0.0)).unwrap());
    }

    #[test]
    fn test_static_objects_founded_when_seen() {
        let mut manager = manager(20, 1);
        let settlement = ObjectDescriptor::new(ObjectId(3), ObjectKind::Settlement, Some(TileId(15)))
            .with_faction(FactionId(2), Allegiance::Neutral);
        manager.on_object_added(settlement).unwrap();
        manager.on_object_added(caravan(1, 0)).unwrap();
        assert!(!manager.is_founded(ObjectId(3)));

        manager.on_object_moved(ObjectId(1), Some(TileId(10)));
        manager.tick(5000);

        assert!(manager.is_founded(ObjectId(3)));
        assert!(manager.sink().last().unwrap().objects_dirty);
    }

    #[test]
    fn test_satellite_scans_world() {
        let mut manager = manager(4, 4);
        let satellite = ObjectDescriptor::new(ObjectId(9), ObjectKind::Other, None)
            .with_faction(FactionId(0), Allegiance::Player)
            .with_flags(ObjectFlags {
                satellite: true,
                ..ObjectFlags::default()
            });
        manager.on_object_added(satellite).unwrap();

        assert_eq!(manager.state().explored_count(), 16);
        assert_eq!(manager.state().object(ObjectId(9)).unwrap().illuminated_count(), 16);
        assert_eq!(manager.sink().last().unwrap().severity, Severity::Planet);
    }

    #[test]
    fn test_preview_rolls_back() {
        let mut manager = manager(20, 1);
        manager.preview_at(TileId(2)).unwrap();
        assert!(manager.is_tile_visible(TileId(9)).unwrap());

        manager.preview_at(TileId(19)).unwrap();
        assert!(!manager.is_tile_explored(TileId(2)).unwrap());
        assert!(manager.is_tile_visible(TileId(12)).unwrap());

        // No previews once playing
        manager.set_program_state(ProgramState::Playing);
        manager.preview_at(TileId(0)).unwrap();
        assert!(!manager.is_tile_explored(TileId(0)).unwrap());
    }

    #[test]
    fn test_preview_rollback_keeps_lit_tiles() {
        let mut manager = manager(30, 1);
        manager.on_object_added(caravan(1, 0)).unwrap();
        manager.preview_at(TileId(10)).unwrap();
        assert!(manager.is_tile_explored(TileId(17)).unwrap());

        manager.preview_at(TileId(29)).unwrap();
        // Lit by the caravan as well as the old preview
        assert!(manager.is_tile_visible(TileId(5)).unwrap());
        assert!(manager.is_tile_explored(TileId(5)).unwrap());
        // Only lit by the old preview
        assert!(!manager.is_tile_explored(TileId(12)).unwrap());
    }

    #[test]
    fn test_toggle_reveal_all() {
        let mut manager = manager(3, 3);
        assert!(manager.toggle_reveal_all());
        assert!(manager.is_tile_visible(TileId(8)).unwrap());
        let frame = manager.sink().last().unwrap();
        assert_eq!(frame.fog_tiles.len(), 9);
        assert_eq!(frame.severity, Severity::Full);

        assert!(!manager.toggle_reveal_all());
        assert!(!manager.is_tile_visible(TileId(8)).unwrap());
    }
}
