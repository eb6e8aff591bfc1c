//! Fighter identity and vitals: Side, Health

use bevy::prelude::*;

/// Which slot of the arena a fighter occupies.
///
/// Human slots (PlayerOne/PlayerTwo) are driven by an outside input source,
/// AI slots carry a `CombatAi` controller. Any two different sides are
/// opponents; a fighter never targets its own side.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum Side {
    PlayerOne,
    PlayerTwo,
    Ai1,
    Ai2,
}

impl Side {
    pub fn opposes(self, other: Side) -> bool {
        self != other
    }

    pub fn is_ai(self) -> bool {
        matches!(self, Side::Ai1 | Side::Ai2)
    }
}

/// Fighter health
///
/// Invariant: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(500.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.current = (self.current - amount).clamp(0.0, self.max);
    }

    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).clamp(0.0, self.max);
    }

    /// Percent of max, the way the health bar shows it (0..=100).
    pub fn percent(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current * 100.0 / self.max
    }
}
