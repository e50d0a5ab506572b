//! World Setup
//!
//! Procedural grid generation and world object spawning.

use bevy_ecs::prelude::*;
use fog_engine::{TileGrid, WorldFeature, WorldGrid};
use fog_types::{Allegiance, FactionId, Hilliness, ObjectDescriptor, ObjectId, ObjectKind, Terrain, TileId};
use rand::Rng;
use tracing::{debug, warn};

use crate::components::{Engine, Flight, Position, SimRng, Wanderer, WorldObject};
use crate::SimParams;

/// The player's faction.
pub const PLAYER_FACTION: FactionId = FactionId(0);

/// Non-player factions settlements are dealt out to, in turn.
const RIVALS: [(FactionId, Allegiance); 3] = [
    (FactionId(1), Allegiance::Hostile),
    (FactionId(2), Allegiance::Neutral),
    (FactionId(3), Allegiance::Ally),
];

/// Builds a `width` x `height` grid with random relief, swamps and the odd
/// polluted tile.
pub fn generate_grid<R: Rng>(width: u32, height: u32, rng: &mut R) -> TileGrid {
    let mut grid = TileGrid::square(width, height);
    for index in 0..grid.tile_count() {
        let roll: f32 = rng.gen();
        let hilliness = match roll {
            r if r < 0.50 => Hilliness::Flat,
            r if r < 0.75 => Hilliness::SmallHills,
            r if r < 0.90 => Hilliness::LargeHills,
            _ => Hilliness::Mountainous,
        };
        let swampiness = if rng.gen_bool(0.1) { rng.gen_range(0.0..0.4) } else { 0.0 };
        let pollution = if rng.gen_bool(0.02) { rng.gen_range(0.0..0.5) } else { 0.0 };
        grid.set_terrain(TileId(index as u32), Terrain::new(hilliness, pollution, swampiness));
    }
    grid
}

/// Splits the map into four named quadrants.
pub fn quadrant_features(width: u32, height: u32) -> Vec<WorldFeature> {
    let names = ["Northwest Reach", "Northeast Reach", "Southwest Reach", "Southeast Reach"];
    let mut tiles = vec![Vec::new(); names.len()];
    for y in 0..height {
        for x in 0..width {
            let quadrant = (usize::from(y >= height / 2) * 2) + usize::from(x >= width / 2);
            tiles[quadrant].push(TileId(y * width + x));
        }
    }
    names
        .into_iter()
        .zip(tiles)
        .map(|(name, tiles)| WorldFeature::new(name, tiles))
        .collect()
}

/// Allocates object IDs in spawn order.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn next_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next);
        self.next += 1;
        id
    }
}

fn random_tile<R: Rng>(tile_count: usize, rng: &mut R) -> TileId {
    TileId(rng.gen_range(0..tile_count as u32))
}

/// Spawns every world object as an entity and reports it to the engine.
///
/// Returns the number of objects spawned.
pub fn spawn_objects(world: &mut World, params: &SimParams) -> usize {
    let tile_count = world.resource::<Engine>().0.grid().tile_count();
    let mut ids = IdAllocator::default();
    let mut descriptors = Vec::new();

    // Take the RNG out to avoid borrow conflicts
    let Some(mut sim_rng) = world.remove_resource::<SimRng>() else {
        return 0;
    };
    let rng = &mut sim_rng.0;

    let home = random_tile(tile_count, rng);
    let colony = ObjectDescriptor::new(ids.next_id(), ObjectKind::Settlement, Some(home))
        .with_faction(PLAYER_FACTION, Allegiance::Player)
        .with_colonists(params.colonists);
    world.spawn((WorldObject(colony.id), Position(home)));
    descriptors.push(colony);

    for index in 0..params.settlements {
        let (faction, allegiance) = RIVALS[index as usize % RIVALS.len()];
        let tile = random_tile(tile_count, rng);
        let settlement = ObjectDescriptor::new(ids.next_id(), ObjectKind::Settlement, Some(tile))
            .with_faction(faction, allegiance);
        world.spawn((WorldObject(settlement.id), Position(tile)));
        descriptors.push(settlement);
    }

    for _ in 0..params.caravans {
        let caravan = ObjectDescriptor::new(ids.next_id(), ObjectKind::Caravan, Some(home))
            .with_faction(PLAYER_FACTION, Allegiance::Player);
        let step_interval = rng.gen_range(200..400);
        world.spawn((WorldObject(caravan.id), Position(home), Wanderer { step_interval }));
        descriptors.push(caravan);
    }

    for _ in 0..params.aircraft {
        let aerial = ObjectDescriptor::new(ids.next_id(), ObjectKind::AerialUnit, Some(home))
            .with_faction(PLAYER_FACTION, Allegiance::Player);
        let waypoint = random_tile(tile_count, rng);
        let position = world.resource::<Engine>().0.grid().tile_center(home);
        world.spawn((
            WorldObject(aerial.id),
            Position(home),
            Flight {
                position,
                waypoint,
                speed: params.flight_speed,
            },
        ));
        descriptors.push(aerial);
    }

    world.insert_resource(sim_rng);

    let count = descriptors.len();
    let mut engine = world.resource_mut::<Engine>();
    for desc in descriptors {
        debug!(object = %desc.id, kind = ?desc.kind, "Spawned world object");
        if let Err(e) = engine.0.on_object_added(desc) {
            warn!(error = %e, "Engine rejected spawned object");
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_grid_is_seeded() {
        let a = generate_grid(6, 4, &mut SmallRng::seed_from_u64(9));
        let b = generate_grid(6, 4, &mut SmallRng::seed_from_u64(9));
        assert_eq!(a.tile_count(), 24);
        for index in 0..24 {
            assert_eq!(a.terrain(TileId(index)), b.terrain(TileId(index)));
        }
    }

    #[test]
    fn test_quadrants_cover_map() {
        let features = quadrant_features(8, 6);
        assert_eq!(features.len(), 4);
        let total: usize = features.iter().map(|f| f.tiles.len()).sum();
        assert_eq!(total, 48);
        assert!(features[0].tiles.contains(&TileId(0)));
        assert!(features[3].tiles.contains(&TileId(47)));
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut ids = IdAllocator::default();
        assert_eq!(ids.next_id(), ObjectId(0));
        assert_eq!(ids.next_id(), ObjectId(1));
    }
}
