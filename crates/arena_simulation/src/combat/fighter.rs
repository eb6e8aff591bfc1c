//! Fighter component: sword combo and shield state.

use bevy::prelude::*;

use crate::components::{ArenaPosition, Facing, Health, MeleeRange, Motion};

/// Minimum seconds between two accepted swings
pub const MIN_ATTACK_INTERVAL: f32 = 0.25;
/// Combo restarts at 1 after this long without swinging
pub const COMBO_RESET_TIME: f32 = 1.0;
/// Longest combo chain (the last hit is the finisher)
pub const MAX_COMBO: u8 = 3;
pub const BASE_DAMAGE: f32 = 10.0;
pub const FINISHER_DAMAGE: f32 = 15.0;
/// A fighter counts as "attacking" for this long after a swing
pub const SWING_DURATION: f32 = 0.25;
/// Blocked hits deal damage / this
pub const BLOCK_DAMAGE_DIVISOR: f32 = 5.0;

/// Melee state of one fighter.
///
/// Spawning a `Fighter` pulls in the rest of the body with defaults.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
#[require(Health, Motion, Facing, MeleeRange, ArenaPosition)]
pub struct Fighter {
    /// Current combo step (0 = never swung, then 1..=MAX_COMBO)
    pub combo: u8,
    pub time_since_attack: f32,
    pub is_blocking: bool,
}

impl Default for Fighter {
    fn default() -> Self {
        Self {
            combo: 0,
            time_since_attack: 0.0,
            is_blocking: false,
        }
    }
}

impl Fighter {
    /// Starts a swing if the interval allows it. Returns the combo step.
    ///
    /// Rolling fighters cannot swing.
    pub fn try_start_attack(&mut self, rolling: bool) -> Option<u8> {
        if rolling || self.time_since_attack <= MIN_ATTACK_INTERVAL {
            return None;
        }

        self.combo = if self.combo >= MAX_COMBO || self.time_since_attack > COMBO_RESET_TIME {
            1
        } else {
            self.combo + 1
        };
        self.time_since_attack = 0.0;
        Some(self.combo)
    }

    /// True during the swing window right after an accepted attack.
    pub fn is_attacking(&self) -> bool {
        self.combo > 0 && self.time_since_attack < SWING_DURATION
    }

    pub fn tick(&mut self, delta: f32) {
        self.time_since_attack += delta;
    }
}

/// Damage dealt by a swing at combo step `combo`.
pub fn swing_damage(combo: u8) -> f32 {
    if combo < MAX_COMBO {
        BASE_DAMAGE
    } else {
        FINISHER_DAMAGE
    }
}

/// Damage actually taken by a defender.
///
/// - rolling: invulnerable
/// - blocking and facing the attacker: damage / BLOCK_DAMAGE_DIVISOR
/// - otherwise: full damage
///
/// `attacker_dx` is attacker.x − defender.x.
pub fn incoming_damage(
    damage: f32,
    defender: &Fighter,
    defender_rolling: bool,
    defender_facing: Facing,
    attacker_dx: f32,
) -> f32 {
    if defender_rolling {
        return 0.0;
    }
    let facing_attack = attacker_dx * defender_facing.sign() as f32 > 0.0;
    if defender.is_blocking && facing_attack {
        damage / BLOCK_DAMAGE_DIVISOR
    } else {
        damage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready() -> Fighter {
        Fighter {
            time_since_attack: 0.5,
            ..Fighter::default()
        }
    }

    #[test]
    fn test_swing_needs_interval() {
        let mut fighter = Fighter::default();
        assert_eq!(fighter.try_start_attack(false), None);

        fighter.tick(0.3);
        assert_eq!(fighter.try_start_attack(false), Some(1));
        assert!(fighter.is_attacking());

        fighter.tick(0.2);
        assert_eq!(fighter.try_start_attack(false), None);

        fighter.tick(0.1);
        assert!(!fighter.is_attacking());
    }

    #[test]
    fn test_combo_wraps_after_finisher() {
        let mut fighter = ready();
        let mut steps = Vec::new();
        for _ in 0..4 {
            steps.push(fighter.try_start_attack(false));
            fighter.tick(0.3);
        }
        assert_eq!(steps, vec![Some(1), Some(2), Some(3), Some(1)]);
    }

    #[test]
    fn test_combo_resets_after_pause() {
        let mut fighter = ready();
        fighter.try_start_attack(false);
        fighter.tick(0.3);
        assert_eq!(fighter.try_start_attack(false), Some(2));

        fighter.tick(1.2);
        assert_eq!(fighter.try_start_attack(false), Some(1));
    }

    #[test]
    fn test_no_swing_while_rolling() {
        let mut fighter = ready();
        assert_eq!(fighter.try_start_attack(true), None);
        assert_eq!(fighter.combo, 0);
    }

    #[test]
    fn test_finisher_hits_harder() {
        assert_eq!(swing_damage(1), 10.0);
        assert_eq!(swing_damage(2), 10.0);
        assert_eq!(swing_damage(3), 15.0);
    }

    #[test]
    fn test_block_only_works_facing_the_attacker() {
        let blocking = Fighter {
            is_blocking: true,
            ..Fighter::default()
        };

        // attacker on the right, defender facing right → blocked
        assert_eq!(incoming_damage(10.0, &blocking, false, Facing::Right, 1.0), 2.0);
        // attacker behind
        assert_eq!(incoming_damage(10.0, &blocking, false, Facing::Left, 1.0), 10.0);
        // not blocking
        assert_eq!(incoming_damage(10.0, &Fighter::default(), false, Facing::Right, 1.0), 10.0);
        // rolling
        assert_eq!(incoming_damage(15.0, &blocking, true, Facing::Right, 1.0), 0.0);
    }
}
