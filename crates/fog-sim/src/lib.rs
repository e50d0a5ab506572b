//! Headless demo host for the exploration engine.
//!
//! Generates a world, spawns caravans, settlements and aircraft as ECS
//! entities, and drives the engine through its trigger API on a fixed tick
//! loop.

use bevy_ecs::prelude::*;
use fog_engine::{ConfigError, EngineConfig, ExplorationManager, OverlayMask, PersistError, TileGrid};
use fog_types::{ProgramState, VisibilitySave};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::info;

pub mod components;
pub mod report;
pub mod setup;
pub mod systems;

pub use components::*;
pub use report::ProgressReport;

/// Errors that can stop a simulation run.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("save error: {0}")]
    Persist(#[from] PersistError),
}

/// Run parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SimParams {
    pub seed: u64,
    pub ticks: u64,
    pub width: u32,
    pub height: u32,
    pub caravans: u32,
    pub settlements: u32,
    pub aircraft: u32,
    /// Free colonists at the player's home settlement
    pub colonists: u32,
    /// World units an aircraft travels per tick
    pub flight_speed: f32,
    /// Ticks between recruited prisoners; zero disables them
    pub knowledge_interval: u64,
    /// Ticks between progress reports; zero disables them
    pub report_interval: u64,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            seed: 42,
            ticks: 20_000,
            width: 48,
            height: 32,
            caravans: 3,
            settlements: 12,
            aircraft: 1,
            colonists: 5,
            flight_speed: 0.02,
            knowledge_interval: 5_000,
            report_interval: 2_500,
        }
    }
}

/// A populated world and the schedule that advances it.
pub struct Simulation {
    pub world: World,
    schedule: Schedule,
    params: SimParams,
}

impl Simulation {
    /// Generates the world and reports every spawned object to the engine.
    pub fn new(params: SimParams, config: EngineConfig) -> Self {
        let mut rng = SmallRng::seed_from_u64(params.seed);
        let grid = setup::generate_grid(params.width, params.height, &mut rng);

        let mut engine = ExplorationManager::new(grid, OverlayMask::new(), config);
        engine.register_features(setup::quadrant_features(params.width, params.height));
        engine.set_program_state(ProgramState::Playing);

        let mut world = World::new();
        world.insert_resource(SimClock::default());
        world.insert_resource(SimRng(rng));
        world.insert_resource(Engine(engine));
        world.insert_resource(KnowledgeSchedule {
            interval: params.knowledge_interval,
        });

        let spawned = setup::spawn_objects(&mut world, &params);
        world.resource_mut::<Engine>().0.started_new_game();
        info!(
            seed = params.seed,
            width = params.width,
            height = params.height,
            objects = spawned,
            "World generated"
        );

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                systems::wander_caravans,
                systems::fly_aircraft,
                systems::learn_settlements,
                systems::process_exploration,
            )
                .chain(),
        );

        Self { world, schedule, params }
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn engine(&self) -> &ExplorationManager<TileGrid, OverlayMask> {
        &self.world.resource::<Engine>().0
    }

    /// Advances one tick.
    pub fn step(&mut self) {
        self.schedule.run(&mut self.world);
        self.world.resource_mut::<SimClock>().tick += 1;
    }

    /// Runs every remaining tick, handing a report to `on_report` on each
    /// report interval.
    pub fn run(&mut self, mut on_report: impl FnMut(&ProgressReport)) -> ProgressReport {
        let interval = self.params.report_interval;
        while self.world.resource::<SimClock>().tick < self.params.ticks {
            let tick = self.world.resource::<SimClock>().tick;
            self.step();
            if interval > 0 && tick > 0 && tick % interval == 0 {
                on_report(&ProgressReport::capture(tick, self.engine()));
            }
        }
        let tick = self.world.resource::<SimClock>().tick;
        ProgressReport::capture(tick, self.engine())
    }

    pub fn save(&self) -> VisibilitySave {
        self.engine().save()
    }
}

/// Runs a whole simulation silently and returns the final save.
pub fn run_to_save(params: SimParams, config: EngineConfig) -> VisibilitySave {
    let mut sim = Simulation::new(params, config);
    sim.run(|_| {});
    sim.save()
}
