//! Fighter spawning for the supported arena modes.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::{AgentConfig, CombatAi};
use crate::arena::ArenaMode;
use crate::combat::Fighter;
use crate::components::{ArenaPosition, Facing, MeleeRange, Side, SpawnPoint};
use crate::DeterministicRng;

/// Fighters spawned left of centre face right, the rest face left.
pub fn initial_facing(spawn: Vec2) -> Facing {
    Facing::from_sign(-spawn.x)
}

/// Spawns a fighter body without a controller (human slot).
pub fn spawn_fighter(world: &mut World, side: Side, at: Vec2) -> Entity {
    let facing = initial_facing(at);
    world
        .spawn((
            Fighter::default(),
            side,
            SpawnPoint(at),
            ArenaPosition(at),
            facing,
            MeleeRange {
                direction: facing.sign(),
                ..MeleeRange::default()
            },
        ))
        .id()
}

/// Spawns a fighter driven by a combat AI controller.
///
/// The controller's RNG is seeded from `DeterministicRng`, so spawn order
/// fixes every agent's random stream.
pub fn spawn_ai_fighter(world: &mut World, side: Side, at: Vec2, config: AgentConfig) -> Entity {
    let entity = spawn_fighter(world, side, at);
    let seed: u64 = world
        .get_resource_or_insert_with(DeterministicRng::default)
        .rng
        .gen();
    world.entity_mut(entity).insert(CombatAi::new(entity, config, seed));
    crate::logger::log(&format!(
        "Spawned AI fighter {:?} ({:?}) at {:?}",
        entity, side, at
    ));
    entity
}

/// Spawns both fighters for `mode`. Slot 0 goes to `spawn_points[0]`.
pub fn setup_arena(
    world: &mut World,
    mode: ArenaMode,
    spawn_points: [Vec2; 2],
    ai: AgentConfig,
) -> Vec<Entity> {
    let [first, second] = spawn_points;
    let fighters = match mode {
        ArenaMode::AiVsAi => vec![
            spawn_ai_fighter(world, Side::Ai2, first, ai),
            spawn_ai_fighter(world, Side::Ai1, second, ai),
        ],
        ArenaMode::PlayerVsBot => vec![
            spawn_fighter(world, Side::PlayerOne, first),
            spawn_ai_fighter(world, Side::Ai2, second, ai),
        ],
        ArenaMode::PlayerVsPlayer => vec![
            spawn_fighter(world, Side::PlayerOne, first),
            spawn_fighter(world, Side::PlayerTwo, second),
        ],
    };
    crate::logger::log_info(&format!("Arena ready: {:?}, {} fighters", mode, fighters.len()));
    fighters
}
