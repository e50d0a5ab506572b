//! Tile and object visibility store.
//!
//! [`VisibilityState`] owns every tile record, every tracked object record and
//! the frame's [`DirtyTracker`]. All mutation keeps two invariants:
//!
//! - a tile lists an object as beholder exactly when that object lists the
//!   tile as illuminated
//! - a visible tile is always explored
//!
//! The render layer receives a shared reference to this store and can only
//! read it.

use fog_types::{ObjectId, ProgramState, Severity, TileId};
use std::collections::BTreeMap;

use crate::config::FogSettings;
use crate::dirty::DirtyTracker;
use crate::error::VisibilityError;
use crate::object::ObjectVisibility;
use crate::tile::TileVisibility;

/// Visibility state of one session.
#[derive(Debug, Clone, Default)]
pub struct VisibilityState {
    tiles: Vec<TileVisibility>,
    objects: BTreeMap<ObjectId, ObjectVisibility>,
    dirty: DirtyTracker,
    reveal_all: bool,
    settings: FogSettings,
    program_state: ProgramState,
}

impl VisibilityState {
    /// Creates a store with `tile_count` unexplored tiles and no objects.
    pub fn new(tile_count: usize) -> Self {
        Self {
            tiles: vec![TileVisibility::default(); tile_count],
            ..Self::default()
        }
    }

    pub(crate) fn restored(
        tiles: Vec<TileVisibility>,
        objects: BTreeMap<ObjectId, ObjectVisibility>,
        reveal_all: bool,
    ) -> Self {
        Self {
            tiles,
            objects,
            reveal_all,
            ..Self::default()
        }
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Looks up a tile record.
    pub fn tile(&self, id: TileId) -> Result<&TileVisibility, VisibilityError> {
        self.tiles.get(id.index()).ok_or(VisibilityError::InvalidTile {
            tile: id,
            tile_count: self.tiles.len(),
        })
    }

    /// A tile record together with the dirty tracker its setters report to.
    fn tile_mut(
        &mut self,
        id: TileId,
    ) -> Result<(&mut TileVisibility, &mut DirtyTracker), VisibilityError> {
        let tile_count = self.tiles.len();
        let record = self
            .tiles
            .get_mut(id.index())
            .ok_or(VisibilityError::InvalidTile { tile: id, tile_count })?;
        Ok((record, &mut self.dirty))
    }

    /// Iterates tile records in ID order.
    pub fn tiles(&self) -> impl Iterator<Item = (TileId, &TileVisibility)> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(index, tile)| (TileId(index as u32), tile))
    }

    pub fn object(&self, id: ObjectId) -> Option<&ObjectVisibility> {
        self.objects.get(&id)
    }

    /// Iterates tracked objects in ID order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &ObjectVisibility)> {
        self.objects.iter().map(|(id, object)| (*id, object))
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn is_tracked(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn is_founded(&self, id: ObjectId) -> bool {
        self.objects.get(&id).map(|o| o.founded()).unwrap_or(false)
    }

    pub fn is_followed(&self, id: ObjectId) -> bool {
        self.objects.get(&id).map(|o| o.followed()).unwrap_or(false)
    }

    /// Global reveal flag (satellite scan or debug toggle).
    pub fn reveal_all(&self) -> bool {
        self.reveal_all
    }

    pub fn settings(&self) -> FogSettings {
        self.settings
    }

    pub fn program_state(&self) -> ProgramState {
        self.program_state
    }

    /// Severity accumulated since the last drain.
    pub fn severity(&self) -> Severity {
        self.dirty.severity()
    }

    pub fn dirty(&self) -> &DirtyTracker {
        &self.dirty
    }

    /// Whether a tile currently renders as visible.
    pub fn is_tile_visible(&self, id: TileId) -> Result<bool, VisibilityError> {
        Ok(self.tile(id)?.visible() || self.reveal_all)
    }

    /// Whether a tile currently renders as explored.
    ///
    /// During world selection with `reveal_initial_map` every tile counts as
    /// explored.
    pub fn is_tile_explored(&self, id: TileId) -> Result<bool, VisibilityError> {
        let tile = self.tile(id)?;
        if self.settings.reveal_initial_map && self.program_state == ProgramState::Entry {
            return Ok(true);
        }
        Ok(tile.explored() || self.reveal_all)
    }

    /// Number of tiles that render as explored.
    pub fn explored_count(&self) -> usize {
        self.tiles()
            .filter(|(id, _)| self.is_tile_explored(*id).unwrap_or(false))
            .count()
    }

    /// Number of tiles that render as visible.
    pub fn visible_count(&self) -> usize {
        self.tiles()
            .filter(|(id, _)| self.is_tile_visible(*id).unwrap_or(false))
            .count()
    }

    pub(crate) fn dirty_mut(&mut self) -> &mut DirtyTracker {
        &mut self.dirty
    }

    pub(crate) fn set_reveal_all(&mut self, value: bool) {
        self.reveal_all = value;
    }

    pub(crate) fn set_settings(&mut self, settings: FogSettings) {
        self.settings = settings;
    }

    pub(crate) fn set_program_state(&mut self, state: ProgramState) {
        self.program_state = state;
    }

    /// True when explored tiles must stay visible regardless of beholders.
    fn fog_disabled(&self) -> bool {
        self.settings.disable_fog_of_war && self.program_state != ProgramState::Entry
    }

    /// Creates a record for `id` if none exists.
    ///
    /// A new record starts founded when the object is player-owned or its home
    /// tile is already visible. Existing records are left untouched.
    pub(crate) fn ensure_tracked(&mut self, id: ObjectId, player_owned: bool, home: Option<TileId>) {
        if self.objects.contains_key(&id) {
            return;
        }
        let home_visible = home
            .map(|tile| self.is_tile_visible(tile).unwrap_or(false))
            .unwrap_or(false);
        self.objects
            .insert(id, ObjectVisibility::new(player_owned || home_visible));
        self.dirty.mark_objects_dirty();
    }

    /// Sets the followed flag, founding the object when following starts.
    pub(crate) fn follow(&mut self, id: ObjectId, value: bool) {
        let object = self.objects.entry(id).or_default();
        let was_founded = object.founded();
        object.follow(value);
        if object.founded() != was_founded {
            self.dirty.mark_objects_dirty();
        }
    }

    /// Sets the founded flag. Returns true if it changed.
    pub(crate) fn set_founded(&mut self, id: ObjectId, value: bool) -> bool {
        let changed = self.objects.entry(id).or_default().set_founded(value);
        if changed {
            self.dirty.mark_objects_dirty();
        }
        changed
    }

    /// Registers `object` as a beholder of `tile`, lighting and exploring it.
    ///
    /// Repeating the call for the same pair changes nothing.
    pub(crate) fn add_vision(&mut self, tile: TileId, object: ObjectId) -> Result<(), VisibilityError> {
        let (record, dirty) = self.tile_mut(tile)?;
        if record.insert_beholder(object) {
            record.set_visible(tile, true, dirty);
            record.set_explored(tile, true, dirty);
            self.objects.entry(object).or_default().illuminate(tile);
        }
        Ok(())
    }

    /// Retracts every tile `object` lights and recomputes their visibility.
    ///
    /// Explored flags are never cleared here.
    pub(crate) fn remove_vision(&mut self, object: ObjectId) {
        let fog_disabled = self.fog_disabled();
        if let Some(record) = self.objects.get_mut(&object) {
            for tile in record.take_illuminated() {
                if let Some(state) = self.tiles.get_mut(tile.index()) {
                    state.remove_beholder(object);
                    state.check_vision(tile, fog_disabled, &mut self.dirty);
                }
            }
        }
        self.dirty.raise(Severity::Fog);
    }

    /// Retracts the object's vision and forgets it.
    pub(crate) fn remove_object(&mut self, object: ObjectId) -> bool {
        self.remove_vision(object);
        let removed = self.objects.remove(&object).is_some();
        if removed {
            self.dirty.mark_objects_dirty();
        }
        removed
    }

    /// Marks a tile explored without lighting it.
    pub(crate) fn explore_tile(&mut self, tile: TileId) -> Result<(), VisibilityError> {
        let (record, dirty) = self.tile_mut(tile)?;
        record.set_explored(tile, true, dirty);
        Ok(())
    }

    /// Marks a tile explored and visible without registering a beholder.
    pub(crate) fn light_tile(&mut self, tile: TileId) -> Result<(), VisibilityError> {
        let (record, dirty) = self.tile_mut(tile)?;
        record.set_all(tile, true, dirty);
        Ok(())
    }

    /// Clears both flags of a tile, rolling back a preview reveal.
    ///
    /// A tile that still has beholders stays explored and visible.
    pub fn reset_tile(&mut self, tile: TileId) -> Result<(), VisibilityError> {
        let (record, dirty) = self.tile_mut(tile)?;
        let lit = record.beholders().next().is_some();
        record.set_all(tile, lit, dirty);
        Ok(())
    }

    /// Recomputes the visible flag of one tile.
    pub fn check_vision(&mut self, tile: TileId) -> Result<(), VisibilityError> {
        let fog_disabled = self.fog_disabled();
        let (record, dirty) = self.tile_mut(tile)?;
        record.check_vision(tile, fog_disabled, dirty);
        Ok(())
    }

    /// Recomputes the visible flag of every tile.
    pub fn mass_check(&mut self) {
        let fog_disabled = self.fog_disabled();
        for (index, record) in self.tiles.iter_mut().enumerate() {
            record.check_vision(TileId(index as u32), fog_disabled, &mut self.dirty);
        }
    }

    /// Explores and lights every tile and founds every tracked object.
    pub(crate) fn reveal_everything(&mut self) {
        for (index, record) in self.tiles.iter_mut().enumerate() {
            record.set_all(TileId(index as u32), true, &mut self.dirty);
        }
        let mut founded_any = false;
        for object in self.objects.values_mut() {
            founded_any |= object.set_founded(true);
        }
        if founded_any {
            self.dirty.mark_objects_dirty();
        }
        self.dirty.raise(Severity::Planet);
    }

    /// Marks every tile dirty in both overlay sets.
    pub(crate) fn mark_all_dirty(&mut self) {
        self.dirty.mark_all(self.tiles.len());
    }
}
