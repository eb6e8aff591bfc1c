//! Combat AI: per-fighter decision controller and its ECS host.
//!
//! The controller (`controller.rs`) is engine-agnostic: it sees the world only
//! through the capability traits in `capabilities.rs` and writes intents into
//! a `CommandSink`. The ECS side (`systems.rs`) builds those capabilities from
//! a per-tick snapshot and turns recorded intents into `FighterCommand`
//! events for the movement and combat systems.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod capabilities;
pub mod commands;
pub mod config;
pub mod controller;
pub mod state;
pub mod systems;
pub mod timers;


pub use capabilities::{
    AgentContext, AgentId, AttackSignal, CombatSink, CommandSink, HealthQuery, MeleeSensor,
    MovementSink, RandomSource, SpatialQuery, TargetRegistry,
};
pub use commands::{CommandBuffer, FighterAction, FighterCommand};
pub use config::AgentConfig;
pub use controller::CombatAiController;
pub use state::AIState;
pub use systems::{ArenaSnapshot, FighterView};
pub use timers::{ScheduledTask, TaskKind, TaskQueue};

use crate::arena::{self, MatchPhase, MatchPhaseChanged};
use crate::combat::FighterDied;
use crate::ArenaSet;

/// AI controller attached to a fighter entity.
///
/// Each controller owns its own ChaCha8 stream, seeded once at spawn.
#[derive(Component, Debug)]
pub struct CombatAi(pub CombatAiController<ChaCha8Rng>);

impl CombatAi {
    pub fn new(entity: Entity, config: AgentConfig, seed: u64) -> Self {
        Self(CombatAiController::new(
            AgentId::from_entity(entity),
            config,
            ChaCha8Rng::seed_from_u64(seed),
        ))
    }
}

/// Host-side switches for the AI systems.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AiHostSettings {
    /// Feed controllers the real "opponent is swinging" signal instead of
    /// the per-tick guess
    pub observe_attacks: bool,
}

/// AI Plugin
///
/// Registers AI systems in FixedUpdate.
/// Execution order:
/// 1. acquire_ai_targets: one-shot opponent lookup for new controllers
/// 2. drive_combat_ai: tick every controller → FighterCommand events
///    (ArenaSet::Decide, skipped while the match phase pauses AI)
/// 3. cancel_ai_on_death / reset_ai_on_respawn (ArenaSet::Match)
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AiHostSettings>()
            .init_resource::<MatchPhase>()
            .add_event::<FighterCommand>()
            .add_event::<FighterDied>()
            .add_event::<MatchPhaseChanged>();

        app.add_systems(
            FixedUpdate,
            (
                (systems::acquire_ai_targets, systems::drive_combat_ai)
                    .chain()
                    .in_set(ArenaSet::Decide),
                (systems::cancel_ai_on_death, systems::reset_ai_on_respawn)
                    .chain()
                    .in_set(ArenaSet::Match)
                    .after(arena::handle_fighter_death)
                    .before(arena::respawn_fighters),
            ),
        );
    }
}
