//! ECS host for the combat AI.
//!
//! Every tick the fighters are copied into an `ArenaSnapshot`, which answers
//! the controller's read-side queries. Controllers record intents in a
//! `CommandBuffer` that is flushed as `FighterCommand` events.

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::ai::capabilities::{
    AgentContext, AgentId, AttackSignal, HealthQuery, SpatialQuery, TargetRegistry,
};
use crate::ai::commands::{CommandBuffer, FighterCommand};
use crate::ai::{AiHostSettings, CombatAi};
use crate::arena::{MatchPhase, MatchPhaseChanged};
use crate::combat::{Fighter, FighterDied};
use crate::components::{ArenaPosition, Health, Side};

/// What an AI may know about one fighter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FighterView {
    pub entity: Entity,
    pub side: Side,
    pub position: Vec2,
    pub alive: bool,
    pub attacking: bool,
}

/// Read-only copy of every fighter, keyed by `AgentId` (ordered, so
/// opponent lookup does not depend on query iteration order).
#[derive(Debug, Clone, Default)]
pub struct ArenaSnapshot {
    fighters: BTreeMap<AgentId, FighterView>,
}

impl ArenaSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capture<'a>(
        fighters: impl IntoIterator<
            Item = (
                Entity,
                &'a Side,
                &'a ArenaPosition,
                &'a Health,
                Option<&'a Fighter>,
            ),
        >,
    ) -> Self {
        let mut snapshot = Self::new();
        for (entity, side, position, health, fighter) in fighters {
            snapshot.insert(FighterView {
                entity,
                side: *side,
                position: position.0,
                alive: health.is_alive(),
                attacking: fighter.is_some_and(Fighter::is_attacking),
            });
        }
        snapshot
    }

    pub fn insert(&mut self, view: FighterView) {
        self.fighters.insert(AgentId::from_entity(view.entity), view);
    }

    pub fn get(&self, agent: AgentId) -> Option<&FighterView> {
        self.fighters.get(&agent)
    }

    pub fn len(&self) -> usize {
        self.fighters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fighters.is_empty()
    }
}

impl SpatialQuery for ArenaSnapshot {
    fn position(&self, agent: AgentId) -> Option<Vec2> {
        self.get(agent).map(|view| view.position)
    }
}

impl HealthQuery for ArenaSnapshot {
    fn is_alive(&self, agent: AgentId) -> bool {
        self.get(agent).is_some_and(|view| view.alive)
    }
}

impl AttackSignal for ArenaSnapshot {
    fn is_attacking(&self, agent: AgentId) -> bool {
        self.get(agent).is_some_and(|view| view.attacking)
    }
}

impl TargetRegistry for ArenaSnapshot {
    /// First fighter (by id) on an opposing side.
    fn find_opponent(&self, agent: AgentId) -> Option<AgentId> {
        let side = self.get(agent)?.side;
        self.fighters
            .iter()
            .find(|(id, view)| **id != agent && side.opposes(view.side))
            .map(|(id, _)| *id)
    }
}

// ============================================================================
// Systems
// ============================================================================

/// System: one-shot opponent lookup for newly added controllers
pub fn acquire_ai_targets(
    mut agents: Query<&mut CombatAi, Added<CombatAi>>,
    fighters: Query<(Entity, &Side, &ArenaPosition, &Health, Option<&Fighter>)>,
) {
    if agents.is_empty() {
        return;
    }
    let snapshot = ArenaSnapshot::capture(fighters.iter());
    for mut ai in agents.iter_mut() {
        ai.0.acquire_target(&snapshot);
    }
}

/// System: tick every controller and publish its commands
///
/// Controllers are ticked in entity order against one snapshot taken at the
/// start of the tick. Paused phases (Respawn, GameOver) skip the tick
/// entirely, so AI clocks stand still.
pub fn drive_combat_ai(
    time: Res<Time<Fixed>>,
    phase: Res<MatchPhase>,
    settings: Res<AiHostSettings>,
    mut agents: Query<(Entity, &mut CombatAi)>,
    fighters: Query<(Entity, &Side, &ArenaPosition, &Health, Option<&Fighter>)>,
    mut commands: EventWriter<FighterCommand>,
) {
    if !phase.allows_ai() {
        return;
    }
    let delta = time.delta_secs();
    let snapshot = ArenaSnapshot::capture(fighters.iter());
    let attack_signal = settings
        .observe_attacks
        .then_some(&snapshot as &dyn AttackSignal);

    let mut order: Vec<Entity> = agents.iter().map(|(entity, _)| entity).collect();
    order.sort();

    let mut buffer = CommandBuffer::new();
    for entity in order {
        let Ok((_, mut ai)) = agents.get_mut(entity) else {
            continue;
        };

        let mut ctx = AgentContext {
            spatial: &snapshot,
            health: &snapshot,
            attack_signal,
            sink: &mut buffer,
        };
        ai.0.tick(delta, &mut ctx);

        for action in buffer.drain() {
            commands.write(FighterCommand {
                fighter: entity,
                action,
            });
        }
    }
}

/// System: a dead fighter's pending block release / entry never fires
pub fn cancel_ai_on_death(mut deaths: EventReader<FighterDied>, mut agents: Query<&mut CombatAi>) {
    for death in deaths.read() {
        if let Ok(mut ai) = agents.get_mut(death.fighter) {
            ai.0.cancel_pending();
        }
    }
}

/// System: every controller back to a fresh Idle when a respawn starts
pub fn reset_ai_on_respawn(
    mut changes: EventReader<MatchPhaseChanged>,
    mut agents: Query<&mut CombatAi>,
) {
    let respawning = changes
        .read()
        .fold(false, |seen, change| seen || change.to == MatchPhase::Respawn);
    if !respawning {
        return;
    }
    for mut ai in agents.iter_mut() {
        ai.0.reset();
    }
    crate::logger::log("AI controllers reset for respawn");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(index: u32, side: Side, x: f32) -> FighterView {
        FighterView {
            entity: Entity::from_raw(index),
            side,
            position: Vec2::new(x, 0.0),
            alive: true,
            attacking: false,
        }
    }

    #[test]
    fn test_snapshot_finds_first_opponent() {
        let mut snapshot = ArenaSnapshot::new();
        snapshot.insert(view(1, Side::Ai1, 0.0));
        snapshot.insert(view(2, Side::Ai1, 1.0));
        snapshot.insert(view(3, Side::Ai2, 5.0));

        let me = AgentId::from_entity(Entity::from_raw(1));
        let foe = AgentId::from_entity(Entity::from_raw(3));
        assert_eq!(snapshot.find_opponent(me), Some(foe));
        assert_eq!(snapshot.distance(me, foe), Some(5.0));
    }

    #[test]
    fn test_snapshot_unknown_agent() {
        let snapshot = ArenaSnapshot::new();
        let ghost = AgentId::from_entity(Entity::from_raw(7));
        assert!(!snapshot.is_alive(ghost));
        assert!(!snapshot.is_attacking(ghost));
        assert_eq!(snapshot.find_opponent(ghost), None);
        assert_eq!(snapshot.position(ghost), None);
    }

    #[test]
    fn test_snapshot_without_opponent() {
        let mut snapshot = ArenaSnapshot::new();
        snapshot.insert(view(1, Side::PlayerOne, 0.0));
        assert_eq!(
            snapshot.find_opponent(AgentId::from_entity(Entity::from_raw(1))),
            None
        );
    }
}
