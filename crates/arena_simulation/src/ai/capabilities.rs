//! Capability interfaces consumed by the combat AI.
//!
//! The controller never looks anything up globally. Positions, vitals, the
//! command outlets and the opponent lookup are handed in by the host:
//! - ECS host: `ai::systems` implements the read side over a per-tick
//!   `ArenaSnapshot` and collects commands in a `CommandBuffer`
//! - tests: plain structs
//!
//! Randomness is injected too (`RandomSource`), so a seeded or scripted source
//! makes every decision reproducible.

use bevy::prelude::*;
use rand::{Rng, RngCore};

use crate::components::Facing;

/// Stable, non-owning handle to an agent.
///
/// ECS hosts derive it from `Entity::to_bits`, so it is unique for the
/// lifetime of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u64);

impl AgentId {
    pub fn from_entity(entity: Entity) -> Self {
        Self(entity.to_bits())
    }
}

impl From<Entity> for AgentId {
    fn from(entity: Entity) -> Self {
        Self::from_entity(entity)
    }
}

// ============================================================================
// Read side
// ============================================================================

pub trait SpatialQuery {
    /// Current position, `None` when the agent no longer exists.
    fn position(&self, agent: AgentId) -> Option<Vec2>;

    fn distance(&self, from: AgentId, to: AgentId) -> Option<f32> {
        Some(self.position(from)?.distance(self.position(to)?))
    }

    /// +1.0 when `to` is right of `from`, otherwise -1.0.
    fn direction(&self, from: AgentId, to: AgentId) -> Option<f32> {
        let (from, to) = (self.position(from)?, self.position(to)?);
        Some(if to.x > from.x { 1.0 } else { -1.0 })
    }
}

pub trait HealthQuery {
    fn is_alive(&self, agent: AgentId) -> bool;
}

/// Explicit "is this agent swinging right now" signal.
///
/// Optional: without it the reactive block falls back to a per-tick chance.
pub trait AttackSignal {
    fn is_attacking(&self, agent: AgentId) -> bool;
}

/// One-shot opponent lookup, used when the agent spawns.
pub trait TargetRegistry {
    fn find_opponent(&self, agent: AgentId) -> Option<AgentId>;
}

// ============================================================================
// Write side
// ============================================================================

pub trait MovementSink {
    /// Signed fraction of full run speed (-1..=1).
    fn move_horizontal(&mut self, fraction: f32);
    fn jump(&mut self);
    fn roll(&mut self);
    fn face(&mut self, facing: Facing);
}

pub trait CombatSink {
    fn attack(&mut self);
    fn block(&mut self, enable: bool);
}

/// Orientation of the melee hit sensor (±1).
pub trait MeleeSensor {
    fn set_orientation(&mut self, direction: i32);
}

/// Everything the controller writes to in one tick.
pub trait CommandSink: MovementSink + CombatSink {
    /// Hosts without a melee sensor keep the default and orientation
    /// updates become no-ops.
    fn melee_sensor(&mut self) -> Option<&mut dyn MeleeSensor> {
        None
    }
}

/// Collaborators for a single `CombatAiController::tick`.
pub struct AgentContext<'a> {
    pub spatial: &'a dyn SpatialQuery,
    pub health: &'a dyn HealthQuery,
    pub attack_signal: Option<&'a dyn AttackSignal>,
    pub sink: &'a mut dyn CommandSink,
}

// ============================================================================
// Randomness
// ============================================================================

/// Uniform draws in [0, 1).
pub trait RandomSource {
    fn value(&mut self) -> f32;

    /// Uniform draw in [min, max).
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.value()
    }
}

impl<R: RngCore> RandomSource for R {
    fn value(&mut self) -> f32 {
        self.gen::<f32>()
    }
}
