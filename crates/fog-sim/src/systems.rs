//! Host systems that drive the exploration engine.
//!
//! The schedule runs these in order each tick: caravans step, aircraft fly,
//! knowledge is learned, then the engine processes its movement batch.

use bevy_ecs::prelude::*;
use fog_engine::{KnowledgeSource, WorldGrid};
use fog_types::TileId;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::components::{Engine, Flight, KnowledgeSchedule, Position, SimClock, SimRng, Wanderer, WorldObject};

/// Steps each caravan whose interval has elapsed to a random neighbour.
pub fn wander_caravans(
    clock: Res<SimClock>,
    mut rng: ResMut<SimRng>,
    mut engine: ResMut<Engine>,
    mut query: Query<(&WorldObject, &mut Position, &Wanderer)>,
) {
    let mut neighbors = Vec::new();
    for (object, mut position, wanderer) in query.iter_mut() {
        if wanderer.step_interval == 0 || clock.tick % wanderer.step_interval != 0 {
            continue;
        }
        neighbors.clear();
        engine.0.grid().neighbors(position.0, &mut neighbors);
        let Some(&next) = neighbors.choose(&mut rng.0) else {
            continue;
        };
        position.0 = next;
        engine.0.on_object_moved(object.0, Some(next));
    }
}

/// Flies each aircraft toward its waypoint and reports its draw position.
///
/// A new waypoint is drawn once the current one is reached.
pub fn fly_aircraft(
    mut rng: ResMut<SimRng>,
    mut engine: ResMut<Engine>,
    mut query: Query<(&WorldObject, &mut Position, &mut Flight)>,
) {
    let tile_count = engine.0.grid().tile_count() as u32;
    for (object, mut position, mut flight) in query.iter_mut() {
        let target = engine.0.grid().tile_center(flight.waypoint);
        let offset = target - flight.position;
        if offset.length() <= flight.speed {
            flight.position = target;
            flight.waypoint = TileId(rng.0.gen_range(0..tile_count));
        } else {
            let speed = flight.speed;
            flight.position += offset.normalize() * speed;
        }

        match engine.0.on_aerial_tick(object.0, flight.position) {
            Ok(true) => {
                if let Some(tile) = engine.0.descriptor(object.0).and_then(|desc| desc.tile) {
                    position.0 = tile;
                }
            }
            Ok(false) => {}
            Err(e) => warn!(object = %object.0, error = %e, "Aerial update failed"),
        }
    }
}

/// Periodically recruits a prisoner who points out one unknown settlement.
pub fn learn_settlements(
    clock: Res<SimClock>,
    schedule: Res<KnowledgeSchedule>,
    mut rng: ResMut<SimRng>,
    mut engine: ResMut<Engine>,
) {
    if schedule.interval == 0 || clock.tick == 0 || clock.tick % schedule.interval != 0 {
        return;
    }
    match engine.0.learn_locations(KnowledgeSource::Recruitment, &mut rng.0) {
        Ok(revealed) if !revealed.is_empty() => {
            debug!(tick = clock.tick, ?revealed, "Recruit revealed settlements");
        }
        Ok(_) => {}
        Err(e) => warn!(error = %e, "Knowledge reveal failed"),
    }
}

/// Lets the engine process queued moves on its own interval.
pub fn process_exploration(clock: Res<SimClock>, mut engine: ResMut<Engine>) {
    if engine.0.tick(clock.tick) {
        debug!(tick = clock.tick, "Processed movement batch");
    }
}
