//! Arena match flow: phases, death handling, respawn, fighter spawning.
//!
//! Phase machine:
//! - GameOn: normal play, a death → Respawn
//! - FinalFight: a death ends the match → GameOver
//! - Respawn: every fighter back to its spawn point at full health, AI
//!   reset, then GameOn (same tick)
//! - GameOver: nothing moves, AI stays paused
//!
//! Every real phase change is announced with `MatchPhaseChanged`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod spawn;

pub use spawn::{setup_arena, spawn_ai_fighter, spawn_fighter};

use crate::combat::{Fighter, FighterDied};
use crate::components::{ArenaPosition, Facing, Health, MeleeRange, Motion, SpawnPoint};
use crate::config::ConfigError;
use crate::ArenaSet;

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum MatchPhase {
    #[default]
    GameOn,
    FinalFight,
    Respawn,
    GameOver,
}

impl MatchPhase {
    /// AI controllers only tick during live play.
    pub fn allows_ai(self) -> bool {
        matches!(self, MatchPhase::GameOn | MatchPhase::FinalFight)
    }
}

/// Event: the match phase changed (observers: AI reset, runner, UI).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPhaseChanged {
    pub from: MatchPhase,
    pub to: MatchPhase,
}

/// Moves the match to `next`. No-op (and no event) when already there.
pub fn request_phase(
    phase: &mut MatchPhase,
    next: MatchPhase,
    changed: &mut EventWriter<MatchPhaseChanged>,
) -> bool {
    if *phase == next {
        return false;
    }
    let from = *phase;
    *phase = next;
    changed.write(MatchPhaseChanged { from, to: next });
    crate::logger::log_info(&format!("Match phase: {:?} → {:?}", from, next));
    true
}

/// Who fights whom.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArenaMode {
    #[serde(alias = "AIvsAI")]
    AiVsAi,
    #[default]
    #[serde(alias = "PVB")]
    PlayerVsBot,
    #[serde(alias = "PVP")]
    PlayerVsPlayer,
}

impl std::str::FromStr for ArenaMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ai_vs_ai" | "AIvsAI" => Ok(ArenaMode::AiVsAi),
            "player_vs_bot" | "PVB" => Ok(ArenaMode::PlayerVsBot),
            "player_vs_player" | "PVP" => Ok(ArenaMode::PlayerVsPlayer),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

// ============================================================================
// Systems
// ============================================================================

/// System: a death ends the round (Respawn) or the match (GameOver)
///
/// Only the first death of a tick counts; later ones in the same tick find
/// the phase already changed.
pub fn handle_fighter_death(
    mut deaths: EventReader<FighterDied>,
    mut phase: ResMut<MatchPhase>,
    mut changed: EventWriter<MatchPhaseChanged>,
) {
    for death in deaths.read() {
        let next = match *phase {
            MatchPhase::FinalFight => MatchPhase::GameOver,
            MatchPhase::GameOn => MatchPhase::Respawn,
            MatchPhase::Respawn | MatchPhase::GameOver => continue,
        };
        crate::logger::log_info(&format!("{:?} died during {:?}", death.fighter, *phase));
        request_phase(&mut phase, next, &mut changed);
    }
}

/// System: reset every fighter body, then resume play
pub fn respawn_fighters(
    mut phase: ResMut<MatchPhase>,
    mut changed: EventWriter<MatchPhaseChanged>,
    mut fighters: Query<(
        &SpawnPoint,
        &mut ArenaPosition,
        &mut Health,
        &mut Motion,
        &mut Fighter,
        &mut Facing,
        &mut MeleeRange,
    )>,
) {
    if *phase != MatchPhase::Respawn {
        return;
    }

    for (point, mut position, mut health, mut motion, mut fighter, mut facing, mut range) in
        fighters.iter_mut()
    {
        position.0 = point.0;
        let max = health.max;
        health.heal(max);
        *motion = Motion::default();
        *fighter = Fighter::default();
        *facing = spawn::initial_facing(point.0);
        range.direction = facing.sign();
    }

    request_phase(&mut phase, MatchPhase::GameOn, &mut changed);
}

/// Arena Plugin
///
/// Runs in `ArenaSet::Match`, after damage has been applied:
/// 1. handle_fighter_death
/// 2. (AI reset on Respawn, registered by AIPlugin)
/// 3. respawn_fighters
pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MatchPhase>()
            .add_event::<FighterDied>()
            .add_event::<MatchPhaseChanged>();

        app.add_systems(
            FixedUpdate,
            (handle_fighter_death, respawn_fighters)
                .chain()
                .in_set(ArenaSet::Match),
        );
    }
}
