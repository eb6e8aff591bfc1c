//! Simulation configuration (TOML).
//!
//! ```toml
//! seed = 7
//! tick_hz = 60.0
//! ticks = 3600
//! mode = "ai_vs_ai"        # or "AIvsAI" / "PVB" / "PVP"
//! final_fight = false
//! observe_attacks = false
//! spawn_points = [[-3.0, 0.0], [3.0, 0.0]]
//!
//! [ai]
//! block_chance = 0.5
//! ```
//!
//! Every key is optional. Values are clamped by `sanitized()`, never
//! rejected; only unreadable files and malformed TOML are errors.

use std::path::{Path, PathBuf};

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::AgentConfig;
use crate::arena::ArenaMode;
use crate::logger;

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_TICK_HZ: f64 = 60.0;
/// Accepted fixed-rate range; anything outside is clamped
pub const MIN_TICK_HZ: f64 = 1.0;
pub const MAX_TICK_HZ: f64 = 10_000.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown arena mode `{0}` (expected ai_vs_ai, player_vs_bot or player_vs_player)")]
    UnknownMode(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Master seed for `DeterministicRng`
    pub seed: u64,
    /// Fixed simulation rate
    pub tick_hz: f64,
    /// Ticks the headless runner simulates before stopping
    pub ticks: u64,
    pub mode: ArenaMode,
    /// Start in FinalFight: the first death ends the match
    pub final_fight: bool,
    /// Give controllers the real attack signal instead of the per-tick guess
    pub observe_attacks: bool,
    /// Slot 0 and slot 1 spawn positions
    pub spawn_points: [[f32; 2]; 2],
    pub ai: AgentConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            tick_hz: DEFAULT_TICK_HZ,
            ticks: 3600,
            mode: ArenaMode::AiVsAi,
            final_fight: false,
            observe_attacks: false,
            spawn_points: [[-3.0, 0.0], [3.0, 0.0]],
            ai: AgentConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        logger::log_info(&format!("Loaded config from {}", path.display()));
        Self::from_toml_str(&source)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        Ok(config.sanitized())
    }

    /// Clamps every value into range.
    pub fn sanitized(self) -> Self {
        let tick_hz = sanitize_tick_hz(self.tick_hz);

        let defaults = Self::default().spawn_points;
        let mut spawn_points = self.spawn_points;
        for (slot, point) in spawn_points.iter_mut().enumerate() {
            if !point.iter().all(|v| v.is_finite()) {
                logger::log_warning(&format!(
                    "SimulationConfig: spawn point {} = {:?} is not finite, using {:?}",
                    slot, point, defaults[slot]
                ));
                *point = defaults[slot];
            }
        }

        Self {
            tick_hz,
            spawn_points,
            ai: self.ai.sanitized(),
            ..self
        }
    }

    pub fn spawn_positions(&self) -> [Vec2; 2] {
        self.spawn_points.map(Vec2::from_array)
    }
}

/// Clamps a fixed rate into `MIN_TICK_HZ..=MAX_TICK_HZ`.
///
/// Non-finite or non-positive rates fall back to `DEFAULT_TICK_HZ`.
pub fn sanitize_tick_hz(tick_hz: f64) -> f64 {
    let sane = if !tick_hz.is_finite() || tick_hz <= 0.0 {
        DEFAULT_TICK_HZ
    } else {
        tick_hz.clamp(MIN_TICK_HZ, MAX_TICK_HZ)
    };
    if sane != tick_hz {
        logger::log_warning(&format!(
            "SimulationConfig: tick_hz = {} is out of range, using {}",
            tick_hz, sane
        ));
    }
    sane
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = SimulationConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(
            config.spawn_positions(),
            [Vec2::new(-3.0, 0.0), Vec2::new(3.0, 0.0)]
        );
    }

    #[test]
    fn test_full_config() {
        let config = SimulationConfig::from_toml_str(
            r#"
            seed = 7
            tick_hz = 30.0
            ticks = 120
            mode = "PVB"
            final_fight = true
            observe_attacks = true
            spawn_points = [[-5.0, 0.0], [5.0, 0.0]]

            [ai]
            block_chance = 0.9
            detection_range = 12.0
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, 7);
        assert_eq!(config.tick_hz, 30.0);
        assert_eq!(config.ticks, 120);
        assert_eq!(config.mode, ArenaMode::PlayerVsBot);
        assert!(config.final_fight);
        assert!(config.observe_attacks);
        assert_eq!(config.spawn_points, [[-5.0, 0.0], [5.0, 0.0]]);
        assert_eq!(config.ai.block_chance, 0.9);
        assert_eq!(config.ai.detection_range, 12.0);
        assert_eq!(config.ai.decision_interval, 0.15);
    }

    #[test]
    fn test_mode_spellings() {
        for (text, mode) in [
            ("ai_vs_ai", ArenaMode::AiVsAi),
            ("AIvsAI", ArenaMode::AiVsAi),
            ("player_vs_player", ArenaMode::PlayerVsPlayer),
            ("PVP", ArenaMode::PlayerVsPlayer),
        ] {
            let config = SimulationConfig::from_toml_str(&format!("mode = \"{}\"", text)).unwrap();
            assert_eq!(config.mode, mode);
            assert_eq!(text.parse::<ArenaMode>().unwrap(), mode);
        }
        assert!(matches!(
            "arcade".parse::<ArenaMode>(),
            Err(ConfigError::UnknownMode(_))
        ));
    }

    #[test]
    fn test_bad_values_are_clamped() {
        let config = SimulationConfig::from_toml_str(
            r#"
            tick_hz = -5.0
            [ai]
            random_aggression = 4.0
            "#,
        )
        .unwrap();
        assert_eq!(config.tick_hz, DEFAULT_TICK_HZ);
        assert_eq!(config.ai.random_aggression, 1.0);
    }

    #[test]
    fn test_extreme_tick_rates_are_clamped() {
        let slow = SimulationConfig::from_toml_str("tick_hz = 1e-30").unwrap();
        assert_eq!(slow.tick_hz, MIN_TICK_HZ);

        let fast = SimulationConfig::from_toml_str("tick_hz = 1e30").unwrap();
        assert_eq!(fast.tick_hz, MAX_TICK_HZ);

        assert_eq!(sanitize_tick_hz(f64::INFINITY), DEFAULT_TICK_HZ);
        assert_eq!(sanitize_tick_hz(120.0), 120.0);
    }

    #[test]
    fn test_extreme_tick_rates_still_run() {
        for source in ["tick_hz = 1e-30", "tick_hz = 1e30"] {
            let config = SimulationConfig::from_toml_str(source).unwrap();
            let mut app = crate::create_arena_app(&config);
            app.update();
            app.update();
        }

        // unsanitized rates handed straight to the app builder
        let mut app = crate::create_headless_app_with_rate(1, 1e-30);
        app.update();
        app.update();
    }

    #[test]
    fn test_unknown_mode_in_file_is_a_parse_error() {
        let result = SimulationConfig::from_toml_str("mode = \"arcade\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = SimulationConfig::load("/definitely/not/here/arena.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
