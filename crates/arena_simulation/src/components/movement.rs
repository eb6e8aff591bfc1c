//! Movement components: arena position, facing, jump/roll state, melee sensor

use bevy::prelude::*;

/// Horizontal run speed (units/sec at full input)
pub const RUN_SPEED: f32 = 4.0;
/// Initial upward velocity of a jump
pub const JUMP_FORCE: f32 = 7.5;
/// Horizontal speed during a roll
pub const ROLL_FORCE: f32 = 8.0;
/// Roll length (8 animation frames at 14 fps)
pub const ROLL_DURATION: f32 = 8.0 / 14.0;
/// Downward acceleration while airborne
pub const GRAVITY: f32 = 20.0;
/// How long one horizontal move command keeps driving the body
pub const MOVE_INPUT_HOLD: f32 = 0.2;

/// Position on the 2D arena plane (x = horizontal, y = height above floor).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ArenaPosition(pub Vec2);

/// Where a fighter is put back on respawn.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SpawnPoint(pub Vec2);

/// Sprite orientation.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    /// Positive sign faces right; zero and negative face left.
    pub fn from_sign(sign: f32) -> Self {
        if sign > 0.0 {
            Facing::Right
        } else {
            Facing::Left
        }
    }

    pub fn sign(self) -> i32 {
        match self {
            Facing::Right => 1,
            Facing::Left => -1,
        }
    }
}

/// Kinematic state driven by movement commands.
///
/// Stand-in for the physics body: the host integrates it every fixed tick.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Motion {
    /// Last horizontal input (-1..=1)
    pub horizontal_input: f32,
    /// Seconds the current input keeps applying
    pub input_timer: f32,
    pub vertical_velocity: f32,
    pub grounded: bool,
    /// Seconds left in the current roll (0 = not rolling)
    pub roll_timer: f32,
    /// Roll direction captured at roll start (±1)
    pub roll_direction: f32,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            horizontal_input: 0.0,
            input_timer: 0.0,
            vertical_velocity: 0.0,
            grounded: true,
            roll_timer: 0.0,
            roll_direction: 1.0,
        }
    }
}

impl Motion {
    pub fn is_rolling(&self) -> bool {
        self.roll_timer > 0.0
    }

    pub fn set_input(&mut self, fraction: f32) {
        self.horizontal_input = fraction.clamp(-1.0, 1.0);
        self.input_timer = MOVE_INPUT_HOLD;
    }

    /// Starts a jump. Only from the ground and never mid-roll.
    pub fn try_jump(&mut self) -> bool {
        if !self.grounded || self.is_rolling() {
            return false;
        }
        self.grounded = false;
        self.vertical_velocity = JUMP_FORCE;
        true
    }

    /// Starts a roll in `direction`. Only from the ground and never mid-roll.
    pub fn try_roll(&mut self, direction: f32) -> bool {
        if !self.grounded || self.is_rolling() {
            return false;
        }
        self.roll_timer = ROLL_DURATION;
        self.roll_direction = if direction < 0.0 { -1.0 } else { 1.0 };
        true
    }

    /// Advances one tick and returns the displacement to apply.
    pub fn step(&mut self, delta: f32, height: f32) -> Vec2 {
        let dx = if self.is_rolling() {
            self.roll_timer = (self.roll_timer - delta).max(0.0);
            self.roll_direction * ROLL_FORCE * delta
        } else if self.input_timer > 0.0 {
            self.input_timer = (self.input_timer - delta).max(0.0);
            self.horizontal_input * RUN_SPEED * delta
        } else {
            self.horizontal_input = 0.0;
            0.0
        };

        let mut dy = 0.0;
        if !self.grounded {
            self.vertical_velocity -= GRAVITY * delta;
            dy = self.vertical_velocity * delta;
            if height + dy <= 0.0 {
                dy = -height;
                self.vertical_velocity = 0.0;
                self.grounded = true;
            }
        }

        Vec2::new(dx, dy)
    }
}

/// Melee hit sensor attached in front of the fighter.
///
/// `direction` follows horizontal moves and is also set directly through
/// `FighterAction::OrientMeleeSensor`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MeleeRange {
    /// ±1
    pub direction: i32,
    /// Horizontal reach in front of the fighter
    pub reach: f32,
    /// Max vertical offset still counted as a hit
    pub height: f32,
}

impl Default for MeleeRange {
    fn default() -> Self {
        Self {
            direction: 1,
            reach: 1.6,
            height: 1.0,
        }
    }
}

impl MeleeRange {
    /// Does a body at `target` (relative to `origin`) sit inside the sensor?
    pub fn contains(&self, origin: Vec2, target: Vec2) -> bool {
        let offset = target - origin;
        let forward = offset.x * self.direction as f32;
        forward >= 0.0 && forward <= self.reach && offset.y.abs() <= self.height
    }
}
