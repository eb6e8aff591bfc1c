//! ECS components for arena fighters
//!
//! Organised by domain:
//! - actor: identity and vitals (Side, Health)
//! - movement: position, facing, jump/roll kinematics, melee sensor

pub mod actor;
pub mod movement;

pub use actor::*;
pub use movement::*;
