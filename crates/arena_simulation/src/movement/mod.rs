//! Movement domain: fighter commands → kinematics → arena position
//!
//! Contains:
//! - apply_movement_commands (MoveHorizontal/Jump/Roll/Face/OrientMeleeSensor)
//! - integrate_motion (run, roll, jump arc, floor at y = 0)

use bevy::prelude::*;

pub mod systems;

pub use systems::{apply_movement_commands, integrate_motion};

use crate::ai::FighterCommand;
use crate::ArenaSet;

/// Movement Plugin
///
/// Both systems run in `ArenaSet::Act`: commands first, then integration,
/// so a move issued this tick already moves the body this tick.
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<FighterCommand>();
        app.add_systems(
            FixedUpdate,
            (apply_movement_commands, integrate_motion)
                .chain()
                .in_set(ArenaSet::Act),
        );
    }
}
