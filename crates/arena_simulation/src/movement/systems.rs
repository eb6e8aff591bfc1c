//! Movement systems.

use bevy::prelude::*;

use crate::ai::{FighterAction, FighterCommand};
use crate::components::{ArenaPosition, Facing, Health, MeleeRange, Motion};

/// System: apply movement-related `FighterCommand`s
///
/// Dead fighters ignore commands. A non-zero move turns the body and the
/// melee sensor toward the move; rolls go the way the fighter faces.
pub fn apply_movement_commands(
    mut commands: EventReader<FighterCommand>,
    mut bodies: Query<(&mut Motion, &mut Facing, &mut MeleeRange, &Health)>,
) {
    for command in commands.read() {
        let Ok((mut motion, mut facing, mut range, health)) = bodies.get_mut(command.fighter) else {
            continue;
        };
        if !health.is_alive() {
            continue;
        }

        match command.action {
            FighterAction::MoveHorizontal(fraction) => {
                motion.set_input(fraction);
                if fraction != 0.0 {
                    let next = Facing::from_sign(fraction);
                    if *facing != next {
                        *facing = next;
                    }
                    range.direction = next.sign();
                }
            }
            FighterAction::Jump => {
                motion.try_jump();
            }
            FighterAction::Roll => {
                let direction = facing.sign() as f32;
                motion.try_roll(direction);
            }
            FighterAction::Face(next) => {
                if *facing != next {
                    *facing = next;
                }
            }
            FighterAction::OrientMeleeSensor(direction) => {
                if direction != 0 {
                    range.direction = direction.signum();
                }
            }
            FighterAction::Attack | FighterAction::Block(_) => {}
        }
    }
}

/// System: integrate Motion into ArenaPosition
pub fn integrate_motion(mut bodies: Query<(&mut Motion, &mut ArenaPosition)>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();
    if delta <= 0.0 {
        return;
    }

    for (mut motion, mut position) in bodies.iter_mut() {
        let displacement = motion.step(delta, position.0.y);
        if displacement != Vec2::ZERO {
            position.0 += displacement;
        }
    }
}
