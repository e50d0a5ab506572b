//! ECS components and resources for the demo host.

use bevy_ecs::prelude::*;
use fog_engine::{ExplorationManager, OverlayMask, TileGrid};
use fog_types::{ObjectId, TileId};
use glam::Vec3;
use rand::rngs::SmallRng;

/// Links an entity to its engine-side world object.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldObject(pub ObjectId);

/// The tile an object currently occupies.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position(pub TileId);

/// A caravan that steps to a random neighbouring tile on a fixed interval.
#[derive(Component, Debug, Clone, Copy)]
pub struct Wanderer {
    /// Ticks between steps
    pub step_interval: u64,
}

/// An aerial unit drawn between tiles while it flies to a waypoint.
#[derive(Component, Debug, Clone, Copy)]
pub struct Flight {
    /// Current draw position
    pub position: Vec3,
    pub waypoint: TileId,
    /// World units travelled per tick
    pub speed: f32,
}

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);

/// Current simulation tick
#[derive(Resource, Debug, Default)]
pub struct SimClock {
    pub tick: u64,
}

/// The exploration engine, drawing into an overlay mask.
#[derive(Resource)]
pub struct Engine(pub ExplorationManager<TileGrid, OverlayMask>);

/// Interval between prisoner recruitments that reveal a settlement.
#[derive(Resource, Debug, Clone, Copy)]
pub struct KnowledgeSchedule {
    pub interval: u64,
}
