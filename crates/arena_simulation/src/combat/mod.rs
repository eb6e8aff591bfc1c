//! Combat module: sword combos, shields, damage.
//!
//! The AI never touches fighter state directly. It emits `FighterCommand`s
//! (so does any human input source) and this module resolves them:
//! - `Fighter`: combo counter, swing interval, shield flag
//! - `MeleeHit`: accepted swing connected with an opponent in range
//! - `FighterDied`: health reached zero (consumed by `arena` and `ai`)

use bevy::prelude::*;

pub mod fighter;
pub mod melee;


pub use fighter::{
    incoming_damage, swing_damage, Fighter, BASE_DAMAGE, BLOCK_DAMAGE_DIVISOR, FINISHER_DAMAGE,
    MIN_ATTACK_INTERVAL, SWING_DURATION,
};
pub use melee::{FighterDied, MeleeHit};

use crate::ai::FighterCommand;
use crate::movement;
use crate::ArenaSet;

/// Combat Plugin
///
/// Order inside FixedUpdate:
/// 1. tick_fighters (ArenaSet::Act, after the bodies moved)
/// 2. apply_combat_commands (ArenaSet::Act)
/// 3. apply_melee_damage (ArenaSet::Resolve)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<FighterCommand>()
            .add_event::<MeleeHit>()
            .add_event::<FighterDied>();

        app.add_systems(
            FixedUpdate,
            (
                (melee::tick_fighters, melee::apply_combat_commands)
                    .chain()
                    .in_set(ArenaSet::Act)
                    .after(movement::integrate_motion),
                melee::apply_melee_damage.in_set(ArenaSet::Resolve),
            ),
        );
    }
}
