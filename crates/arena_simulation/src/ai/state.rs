//! Combat AI states.

use bevy::prelude::*;

/// AI FSM states
///
/// Cycles forever while the agent is alive; there is no terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
pub enum AIState {
    /// Waiting for the target to come into detection range
    #[default]
    Idle,
    /// Closing distance to the target
    Chase,
    /// In melee range, swinging on cooldown
    Attack,
    /// Shield up until the pending release fires
    Block,
    /// Backing off from the target
    Retreat,
}
