//! Persisted physics and object-default configuration
//!
//! Loaded once at program start from a JSON file and passed by value into
//! the factory and simulator setup; the core never reads ambient global
//! state. Missing or corrupt files fall back to the documented defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts;

/// Global physics parameters consumed at simulator setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Gravity vector (m/s², y up)
    pub gravity: [f32; 2],
    pub time_scale: f32,
    pub collision_detection: bool,
    pub default_friction: f32,
    pub default_restitution: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: [0.0, consts::GRAVITY_Y],
            time_scale: 1.0,
            collision_detection: true,
            default_friction: consts::DEFAULT_FRICTION,
            default_restitution: consts::DEFAULT_RESTITUTION,
        }
    }
}

/// Per-shape-kind defaults. Only the options a kind recognizes are read;
/// absent keys fall back to the numeric defaults in [`crate::consts`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeDefaults {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub radius: Option<f32>,
    pub mass: Option<f32>,
    pub k: Option<f32>,
    pub segments: Option<u32>,
    pub friction: Option<f32>,
    /// "#RRGGBB"
    pub color: Option<String>,
}

/// Defaults for every shape kind the factory can create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectDefaults {
    #[serde(rename = "box")]
    pub box_: ShapeDefaults,
    pub circle: ShapeDefaults,
    pub triangle: ShapeDefaults,
    pub spring: ShapeDefaults,
    pub rope: ShapeDefaults,
    pub ramp: ShapeDefaults,
}

impl Default for ObjectDefaults {
    fn default() -> Self {
        Self {
            box_: ShapeDefaults {
                width: Some(consts::BOX_WIDTH),
                height: Some(consts::BOX_HEIGHT),
                mass: Some(1.0),
                color: Some("#C8C8FF".into()),
                ..Default::default()
            },
            circle: ShapeDefaults {
                radius: Some(consts::CIRCLE_RADIUS),
                mass: Some(1.0),
                color: Some("#FFC8C8".into()),
                ..Default::default()
            },
            triangle: ShapeDefaults {
                width: Some(1.0),
                height: Some(1.0),
                mass: Some(1.0),
                color: Some("#C8FFC8".into()),
                ..Default::default()
            },
            spring: ShapeDefaults {
                k: Some(consts::SPRING_K),
                color: Some("#C8C8C8".into()),
                ..Default::default()
            },
            rope: ShapeDefaults {
                segments: Some(consts::ROPE_SEGMENTS),
                color: Some("#964B00".into()),
                ..Default::default()
            },
            ramp: ShapeDefaults {
                width: Some(consts::RAMP_WIDTH),
                height: Some(consts::RAMP_HEIGHT),
                friction: Some(consts::DEFAULT_FRICTION),
                color: Some("#E6E6E6".into()),
                ..Default::default()
            },
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub physics: PhysicsConfig,
    pub object_defaults: ObjectDefaults,
}

impl Config {
    /// Load from a JSON file. A missing or unreadable file yields the
    /// defaults with a warning; this never fails.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => {
                    log::info!("loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("config {} is corrupt ({e}), using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("no config at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save as pretty-printed JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, json)?;
        log::info!("config saved to {}", path.display());
        Ok(())
    }
}

/// Parse a "#RRGGBB" color string; None on any malformed input
pub fn parse_color(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([r, g, b])
}
