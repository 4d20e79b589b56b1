use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::types::Direction;
use crate::components::grid::GridMap;
use crate::core::collision::DETECTION_WIDTH;
use crate::systems::destination::SPEED;

/// Configuration for the simulation, provided by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Interpolation speed in grid cells per second (default: 8).
    pub speed: f32,
    /// Overlap width for unit AABB tests (default: 0.9).
    pub detection_width: f32,
    /// Iteration cap for slide and collision loops.
    /// `None` uses the map diameter, `max(width, height)`.
    pub slide_limit: Option<u32>,
    /// Maximum fixed steps run per frame (default: 10).
    pub max_steps_per_frame: u32,
    /// Swipes shorter than this (in host pixels) are ignored (default: 24).
    pub swipe_min_length: f32,
    /// Key code to direction bindings.
    pub bindings: KeyBindings,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            speed: SPEED,
            detection_width: DETECTION_WIDTH,
            slide_limit: None,
            max_steps_per_frame: 10,
            swipe_min_length: 24.0,
            bindings: KeyBindings::default(),
        }
    }
}

impl SimConfig {
    /// Parse and validate a config from a JSON string. Missing fields keep defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json).map_err(ConfigError::Json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_dt > 0.0) {
            return Err(ConfigError::Invalid { field: "fixed_dt", value: self.fixed_dt });
        }
        if !(self.speed > 0.0) {
            return Err(ConfigError::Invalid { field: "speed", value: self.speed });
        }
        if !(self.detection_width > 0.0 && self.detection_width <= 1.0) {
            return Err(ConfigError::Invalid {
                field: "detection_width",
                value: self.detection_width,
            });
        }
        if self.max_steps_per_frame == 0 {
            return Err(ConfigError::Invalid { field: "max_steps_per_frame", value: 0.0 });
        }
        Ok(())
    }

    /// Slide/collision iteration cap for `map`.
    pub fn slide_limit_for(&self, map: &GridMap) -> u32 {
        self.slide_limit.unwrap_or_else(|| map.diameter()).max(1)
    }
}

/// Maps host key codes to direction flags and the grab key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub up: Vec<u32>,
    pub down: Vec<u32>,
    pub left: Vec<u32>,
    pub right: Vec<u32>,
    pub grab: Vec<u32>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        // DOM key codes: arrows, then WASD. Grab is Z.
        Self {
            up: vec![38, 87],
            down: vec![40, 83],
            left: vec![37, 65],
            right: vec![39, 68],
            grab: vec![90],
        }
    }
}

impl KeyBindings {
    /// Direction bound to a key code, if any.
    pub fn direction_for(&self, key_code: u32) -> Option<Direction> {
        if self.up.contains(&key_code) {
            Some(Direction::UP)
        } else if self.down.contains(&key_code) {
            Some(Direction::DOWN)
        } else if self.left.contains(&key_code) {
            Some(Direction::LEFT)
        } else if self.right.contains(&key_code) {
            Some(Direction::RIGHT)
        } else {
            None
        }
    }

    pub fn is_grab(&self, key_code: u32) -> bool {
        self.grab.contains(&key_code)
    }

    /// First key code bound to a single direction flag.
    pub fn primary_code(&self, dir: Direction) -> Option<u32> {
        let codes = match dir {
            Direction::UP => &self.up,
            Direction::DOWN => &self.down,
            Direction::LEFT => &self.left,
            Direction::RIGHT => &self.right,
            _ => return None,
        };
        codes.first().copied()
    }
}

/// Errors raised while loading a [`SimConfig`].
#[derive(Debug)]
pub enum ConfigError {
    Json(serde_json::Error),
    Invalid { field: &'static str, value: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid config json: {err}"),
            Self::Invalid { field, value } => write!(f, "config field `{field}` out of range: {value}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SimConfig::from_json(r#"{ "speed": 12.0 }"#).unwrap();
        assert_eq!(config.speed, 12.0);
        assert_eq!(config.detection_width, DETECTION_WIDTH);
        assert_eq!(config.bindings, KeyBindings::default());
    }

    #[test]
    fn rejects_zero_speed() {
        let err = SimConfig::from_json(r#"{ "speed": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "speed", .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(SimConfig::from_json("{ speed"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn slide_limit_defaults_to_map_diameter() {
        let map = GridMap::filled(12, 30);
        let config = SimConfig::default();
        assert_eq!(config.speed, SPEED);
        assert_eq!(config.slide_limit_for(&map), 30);
        let capped = SimConfig { slide_limit: Some(4), ..SimConfig::default() };
        assert_eq!(capped.slide_limit_for(&map), 4);
        let zero = SimConfig { slide_limit: Some(0), ..SimConfig::default() };
        assert_eq!(zero.slide_limit_for(&map), 1);
    }

    #[test]
    fn default_bindings_cover_arrows_and_wasd() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.direction_for(38), Some(Direction::UP));
        assert_eq!(bindings.direction_for(68), Some(Direction::RIGHT));
        assert_eq!(bindings.direction_for(13), None);
        assert!(bindings.is_grab(90));
        assert_eq!(bindings.direction_for(90), None);
        assert_eq!(bindings.primary_code(Direction::LEFT), Some(37));
        assert_eq!(bindings.primary_code(Direction::UP | Direction::DOWN), None);
    }
}
