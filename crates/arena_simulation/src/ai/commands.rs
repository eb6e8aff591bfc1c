//! Commands emitted by the combat AI and the buffer that records them.
//!
//! The controller writes into a `CommandSink`. `CommandBuffer` is the sink
//! used by the ECS host (drained into `FighterCommand` events after each tick)
//! and by tests (inspected directly).

use bevy::prelude::*;

use crate::ai::capabilities::{CombatSink, CommandSink, MeleeSensor, MovementSink};
use crate::components::Facing;

/// Single fighter intent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FighterAction {
    /// Signed fraction of run speed
    MoveHorizontal(f32),
    Jump,
    Roll,
    Face(Facing),
    OrientMeleeSensor(i32),
    Attack,
    Block(bool),
}

/// Fighter intent addressed to an entity (AI or human input source).
///
/// Movement and combat systems read these; the AI never touches fighter
/// components directly.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct FighterCommand {
    pub fighter: Entity,
    pub action: FighterAction,
}

/// Records actions in emission order.
#[derive(Debug, Clone, Default)]
pub struct CommandBuffer {
    actions: Vec<FighterAction>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn actions(&self) -> &[FighterAction] {
        &self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    pub fn drain(&mut self) -> impl Iterator<Item = FighterAction> + '_ {
        self.actions.drain(..)
    }

    /// Number of recorded actions matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&FighterAction) -> bool) -> usize {
        self.actions.iter().filter(|action| predicate(action)).count()
    }
}

impl MovementSink for CommandBuffer {
    fn move_horizontal(&mut self, fraction: f32) {
        self.actions.push(FighterAction::MoveHorizontal(fraction));
    }

    fn jump(&mut self) {
        self.actions.push(FighterAction::Jump);
    }

    fn roll(&mut self) {
        self.actions.push(FighterAction::Roll);
    }

    fn face(&mut self, facing: Facing) {
        self.actions.push(FighterAction::Face(facing));
    }
}

impl CombatSink for CommandBuffer {
    fn attack(&mut self) {
        self.actions.push(FighterAction::Attack);
    }

    fn block(&mut self, enable: bool) {
        self.actions.push(FighterAction::Block(enable));
    }
}

impl MeleeSensor for CommandBuffer {
    fn set_orientation(&mut self, direction: i32) {
        self.actions.push(FighterAction::OrientMeleeSensor(direction));
    }
}

impl CommandSink for CommandBuffer {
    fn melee_sensor(&mut self) -> Option<&mut dyn MeleeSensor> {
        Some(self)
    }
}
