//! Arena Duel simulation core
//!
//! Headless ECS simulation (Bevy 0.16) of a 2D sword duel driven by
//! finite-state combat AI.
//!
//! Layers:
//! - ai: per-fighter decision controller + ECS host (Decide)
//! - movement / combat: turn FighterCommand intents into motion, swings and
//!   shields (Act), then damage (Resolve)
//! - arena: match phases, death, respawn (Match)

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod ai;
pub mod arena;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod movement;

// Re-export the main types for convenience
pub use ai::{
    AIPlugin, AIState, AgentConfig, AiHostSettings, CombatAi, CombatAiController, FighterAction,
    FighterCommand,
};
pub use arena::{setup_arena, spawn_ai_fighter, spawn_fighter, ArenaMode, ArenaPlugin, MatchPhase, MatchPhaseChanged};
pub use combat::{CombatPlugin, Fighter, FighterDied, MeleeHit};
pub use components::*;
pub use config::{ConfigError, SimulationConfig, DEFAULT_SEED};
pub use movement::MovementPlugin;

/// Fixed-tick phases, chained in this order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArenaSet {
    /// AI controllers read the world and emit FighterCommand
    Decide,
    /// Commands become motion, swings and shield state
    Act,
    /// MeleeHit → Health
    Resolve,
    /// Deaths, phase changes, respawn
    Match,
}

/// Main simulation plugin (combines all subsystems)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                ArenaSet::Decide,
                ArenaSet::Act,
                ArenaSet::Resolve,
                ArenaSet::Match,
            )
                .chain(),
        );

        // Keep a seed chosen by create_headless_app
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::default());
        }

        app.add_plugins((MovementPlugin, CombatPlugin, AIPlugin, ArenaPlugin));
    }
}

/// Deterministic RNG resource (seeded)
///
/// Only used to seed per-fighter controller streams at spawn.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

/// Creates a minimal headless Bevy App at 60 Hz.
///
/// Time is advanced manually by one fixed step per `app.update()`, so a run
/// is reproducible tick for tick. The very first update has zero delta and
/// runs no fixed tick.
pub fn create_headless_app(seed: u64) -> App {
    create_headless_app_with_rate(seed, config::DEFAULT_TICK_HZ)
}

/// Same as `create_headless_app` at `tick_hz` (clamped, see
/// `config::sanitize_tick_hz`).
pub fn create_headless_app_with_rate(seed: u64, tick_hz: f64) -> App {
    let tick_hz = config::sanitize_tick_hz(tick_hz);
    let step = Duration::from_secs_f64(1.0 / tick_hz);
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(tick_hz))
        .insert_resource(TimeUpdateStrategy::ManualDuration(step));

    // Slow rates: one update must still carry a whole fixed step
    if let Some(mut virtual_time) = app.world_mut().get_resource_mut::<Time<Virtual>>() {
        if virtual_time.max_delta() < step {
            virtual_time.set_max_delta(step);
        }
    }

    app
}

/// Builds a complete arena from `config`: plugins, match phase and both
/// fighters for `config.mode`.
pub fn create_arena_app(config: &SimulationConfig) -> App {
    let mut app = create_headless_app_with_rate(config.seed, config.tick_hz);
    app.add_plugins(SimulationPlugin).insert_resource(AiHostSettings {
        observe_attacks: config.observe_attacks,
    });
    if config.final_fight {
        app.insert_resource(MatchPhase::FinalFight);
    }

    setup_arena(
        app.world_mut(),
        config.mode,
        config.spawn_positions(),
        config.ai,
    );
    app
}

/// World snapshot for determinism comparisons
///
/// Components are written in entity order through their Debug output.
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, _)| *entity);

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.to_bits().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
