//! Melee systems: swing/shield commands, strike resolution, damage.
//!
//! Flow per fixed tick:
//! 1. `tick_fighters` advances combo clocks
//! 2. `apply_combat_commands` turns `FighterAction::Attack` / `Block` into
//!    fighter state; an accepted swing strikes every opponent inside the
//!    attacker's `MeleeRange` → `MeleeHit`
//! 3. `apply_melee_damage` applies `MeleeHit` to Health → `FighterDied`

use bevy::prelude::*;

use crate::ai::{FighterAction, FighterCommand};
use crate::combat::fighter::{incoming_damage, swing_damage, Fighter};
use crate::components::{ArenaPosition, Facing, Health, MeleeRange, Motion, Side};

/// Event: an accepted swing connected with `target`.
///
/// `damage` is the raw swing damage; block and roll are applied by the
/// receiver.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct MeleeHit {
    pub attacker: Entity,
    pub target: Entity,
    pub combo: u8,
    pub damage: f32,
}

/// Event: a fighter's health reached zero.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct FighterDied {
    pub fighter: Entity,
    pub killer: Option<Entity>,
}

/// System: advance combo clocks
pub fn tick_fighters(mut fighters: Query<&mut Fighter>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();
    for mut fighter in fighters.iter_mut() {
        fighter.tick(delta);
    }
}

/// System: apply Attack / Block commands
///
/// Dead fighters ignore commands. Shield changes are ignored mid-roll.
pub fn apply_combat_commands(
    mut commands: EventReader<FighterCommand>,
    mut hits: EventWriter<MeleeHit>,
    mut fighters: Query<(
        &mut Fighter,
        &Motion,
        &ArenaPosition,
        &MeleeRange,
        &Side,
        &Health,
    )>,
    bodies: Query<(Entity, &ArenaPosition, &Side, &Health)>,
) {
    for command in commands.read() {
        let Ok((mut fighter, motion, position, range, side, health)) =
            fighters.get_mut(command.fighter)
        else {
            continue;
        };
        if !health.is_alive() {
            continue;
        }

        match command.action {
            FighterAction::Block(enable) => {
                if !motion.is_rolling() {
                    fighter.is_blocking = enable;
                }
            }
            FighterAction::Attack => {
                let Some(combo) = fighter.try_start_attack(motion.is_rolling()) else {
                    continue;
                };
                let damage = swing_damage(combo);

                // Entity order
                let mut targets: Vec<Entity> = bodies
                    .iter()
                    .filter(|(entity, body_position, body_side, body_health)| {
                        *entity != command.fighter
                            && side.opposes(**body_side)
                            && body_health.is_alive()
                            && range.contains(position.0, body_position.0)
                    })
                    .map(|(entity, ..)| entity)
                    .collect();
                targets.sort();

                for target in targets {
                    hits.write(MeleeHit {
                        attacker: command.fighter,
                        target,
                        combo,
                        damage,
                    });
                }
            }
            _ => {}
        }
    }
}

/// System: apply MeleeHit damage
///
/// Emits `FighterDied` exactly once, on the hit that takes health to zero.
pub fn apply_melee_damage(
    mut hits: EventReader<MeleeHit>,
    mut deaths: EventWriter<FighterDied>,
    mut defenders: Query<(&mut Health, &Fighter, &Motion, &Facing, &ArenaPosition)>,
    positions: Query<&ArenaPosition>,
) {
    for hit in hits.read() {
        let Ok(attacker_position) = positions.get(hit.attacker).map(|p| p.0) else {
            continue;
        };
        let Ok((mut health, fighter, motion, facing, position)) = defenders.get_mut(hit.target) else {
            crate::logger::log_warning(&format!("MeleeHit: target {:?} is not a fighter", hit.target));
            continue;
        };
        if !health.is_alive() {
            continue;
        }

        let damage = incoming_damage(
            hit.damage,
            fighter,
            motion.is_rolling(),
            *facing,
            attacker_position.x - position.0.x,
        );
        if damage <= 0.0 {
            continue;
        }

        health.take_damage(damage);
        crate::logger::log(&format!(
            "{:?} hit {:?} (combo {}) for {:.1}, health {:.1}",
            hit.attacker, hit.target, hit.combo, damage, health.current
        ));

        if !health.is_alive() {
            deaths.write(FighterDied {
                fighter: hit.target,
                killer: Some(hit.attacker),
            });
            crate::logger::log_info(&format!("{:?} killed by {:?}", hit.target, hit.attacker));
        }
    }
}
