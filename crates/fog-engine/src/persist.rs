//! Save and load of exploration state.
//!
//! A save stores raw tile flags, tracked object records, the movement queue
//! and learned feature flags. Loading never trusts the stored beholder lists:
//! they are rebuilt from the surviving objects' illuminated sets, and the
//! caller re-derives visibility afterwards.

use fog_types::{ObjectId, ObjectRecord, TileRecord, VisibilitySave, SAVE_FORMAT_VERSION};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{PersistError, VisibilityError};
use crate::object::ObjectVisibility;
use crate::state::VisibilityState;
use crate::tile::TileVisibility;

/// Captures `state` together with the coordinator's queue and feature flags.
pub fn snapshot(state: &VisibilityState, pending: &[ObjectId], learned_features: &[bool]) -> VisibilitySave {
    let tiles = state
        .tiles()
        .map(|(_, tile)| TileRecord {
            explored: tile.explored(),
            visible: tile.visible(),
            beholders: tile.beholders().collect(),
        })
        .collect();

    let objects = state
        .objects()
        .map(|(id, object)| ObjectRecord {
            id,
            founded: object.founded(),
            followed: object.followed(),
            illuminated: object.illuminated().collect(),
        })
        .collect();

    VisibilitySave {
        version: SAVE_FORMAT_VERSION,
        reveal_all: state.reveal_all(),
        severity: state.severity(),
        tiles,
        objects,
        pending: pending.to_vec(),
        learned_features: learned_features.to_vec(),
    }
}

/// Rebuilds a state store from a save.
///
/// Object records for IDs not in `known` are dropped along with their vision.
/// Each surviving object's illuminated tiles become its beholder
/// registrations, so the two directions agree regardless of what the save
/// listed per tile.
pub fn restore(save: &VisibilitySave, tile_count: usize, known: &BTreeSet<ObjectId>) -> Result<VisibilityState, PersistError> {
    if save.tiles.len() != tile_count {
        return Err(PersistError::TileCountMismatch {
            expected: tile_count,
            found: save.tiles.len(),
        });
    }

    let mut tiles: Vec<TileVisibility> = save
        .tiles
        .iter()
        .map(|record| TileVisibility::restored(record.explored || record.visible, record.visible))
        .collect();

    let mut objects = BTreeMap::new();
    for record in save.objects.iter().filter(|record| known.contains(&record.id)) {
        let mut illuminated = BTreeSet::new();
        for &tile in &record.illuminated {
            let slot = tiles.get_mut(tile.index()).ok_or(VisibilityError::InvalidTile { tile, tile_count })?;
            slot.insert_beholder(record.id);
            illuminated.insert(tile);
        }
        objects.insert(
            record.id,
            ObjectVisibility::restored(record.founded, record.followed, illuminated),
        );
    }

    Ok(VisibilityState::restored(tiles, objects, save.reveal_all))
}

/// Writes a save as pretty-printed JSON.
pub fn write_save(path: &Path, save: &VisibilitySave) -> Result<(), PersistError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, save)?;
    Ok(())
}

/// Reads a save written by [`write_save`].
pub fn read_save(path: &Path) -> Result<VisibilitySave, PersistError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}
