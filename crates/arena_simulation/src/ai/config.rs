//! Per-agent tuning knobs for the combat AI.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::logger;

/// Combat AI parameters (immutable once the controller is built)
///
/// Invariant after `sanitized()`: probabilities in [0, 1], durations and
/// ranges ≥ 0. Out-of-range values are clamped, never rejected, so a bad
/// preset cannot stop a running match.
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Seconds between decision ticks
    pub decision_interval: f32,
    /// Distance at which the target is noticed
    pub detection_range: f32,
    /// Desired melee distance
    pub ideal_attack_range: f32,
    /// Delay between noticing an incoming attack and raising the shield
    pub block_reaction_time: f32,
    /// Chance to block when the target is seen attacking
    pub block_chance: f32,
    /// Chance a dodge is a roll rather than a jump
    pub roll_instead_of_jump_chance: f32,
    /// Chance to keep comboing after an attack
    pub random_aggression: f32,
    /// Minimum seconds between two attacks
    pub action_cooldown: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            decision_interval: 0.15,
            detection_range: 500.0,
            ideal_attack_range: 1.5,
            block_reaction_time: 0.15,
            block_chance: 0.5,
            roll_instead_of_jump_chance: 0.3,
            random_aggression: 0.6,
            action_cooldown: 0.15,
        }
    }
}

impl AgentConfig {
    /// Parses a TOML table of agent knobs; missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        Ok(config.sanitized())
    }

    /// Clamps every knob into its valid range.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            decision_interval: non_negative(
                "decision_interval",
                self.decision_interval,
                defaults.decision_interval,
            ),
            detection_range: non_negative(
                "detection_range",
                self.detection_range,
                defaults.detection_range,
            ),
            ideal_attack_range: non_negative(
                "ideal_attack_range",
                self.ideal_attack_range,
                defaults.ideal_attack_range,
            ),
            block_reaction_time: non_negative(
                "block_reaction_time",
                self.block_reaction_time,
                defaults.block_reaction_time,
            ),
            block_chance: probability("block_chance", self.block_chance, defaults.block_chance),
            roll_instead_of_jump_chance: probability(
                "roll_instead_of_jump_chance",
                self.roll_instead_of_jump_chance,
                defaults.roll_instead_of_jump_chance,
            ),
            random_aggression: probability(
                "random_aggression",
                self.random_aggression,
                defaults.random_aggression,
            ),
            action_cooldown: non_negative(
                "action_cooldown",
                self.action_cooldown,
                defaults.action_cooldown,
            ),
        }
    }
}

fn probability(name: &str, value: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        logger::log_warning(&format!("AgentConfig: {} is NaN, using {}", name, fallback));
        return fallback;
    }
    let clamped = value.clamp(0.0, 1.0);
    if clamped != value {
        logger::log_warning(&format!(
            "AgentConfig: {} = {} outside [0, 1], clamped to {}",
            name, value, clamped
        ));
    }
    clamped
}

fn non_negative(name: &str, value: f32, fallback: f32) -> f32 {
    if !value.is_finite() {
        logger::log_warning(&format!(
            "AgentConfig: {} = {} is not finite, using {}",
            name, value, fallback
        ));
        return fallback;
    }
    if value < 0.0 {
        logger::log_warning(&format!("AgentConfig: {} = {} is negative, clamped to 0", name, value));
        return 0.0;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_config_default() {
        let config = AgentConfig::default();
        assert_eq!(config.decision_interval, 0.15);
        assert_eq!(config.detection_range, 500.0);
        assert_eq!(config.ideal_attack_range, 1.5);
        assert_eq!(config.block_chance, 0.5);
        assert_eq!(config.random_aggression, 0.6);
        assert_eq!(config.action_cooldown, 0.15);
        assert_eq!(config, config.sanitized());
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let config = AgentConfig {
            block_chance: 1.7,
            random_aggression: -0.2,
            roll_instead_of_jump_chance: f32::NAN,
            decision_interval: -1.0,
            action_cooldown: f32::INFINITY,
            ..AgentConfig::default()
        }
        .sanitized();

        assert_eq!(config.block_chance, 1.0);
        assert_eq!(config.random_aggression, 0.0);
        assert_eq!(config.roll_instead_of_jump_chance, 0.3);
        assert_eq!(config.decision_interval, 0.0);
        assert_eq!(config.action_cooldown, 0.15);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AgentConfig::from_toml_str(
            r#"
            detection_range = 8.0
            block_chance = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.detection_range, 8.0);
        assert_eq!(config.block_chance, 1.0);
        assert_eq!(config.ideal_attack_range, 1.5);
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let result = AgentConfig::from_toml_str("block_chance = \"often\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
