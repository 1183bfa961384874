use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::GameError;

// ── Sections ──────────────────────────────────────────────────────────────────

/// OS window and simulation rate.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Fixed simulation updates per second.
    pub target_ups: u32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self { title: "Coin Knight".into(), width: 800, height: 600, target_ups: 60 }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Downward acceleration in px/s².
    pub gravity: f32,
    /// Per-axis speed cap in px/s.
    pub max_velocity: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self { gravity: 500.0, max_velocity: 10_000.0 }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Spawn point of the sprite's bottom-left corner.
    pub spawn: [f32; 2],
    pub run_speed: f32,
    pub jump_velocity: f32,
    /// Upward speed given to the player after stomping a slime.
    pub stomp_bounce: f32,
    pub frame_size: [f32; 2],
    pub body_size: [f32; 2],
    /// Offset of the collision box from the sprite's top-left corner.
    pub body_offset: [f32; 2],
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            spawn: [100.0, 100.0],
            run_speed: 120.0,
            jump_velocity: 275.0,
            stomp_bounce: 200.0,
            frame_size: [32.0, 32.0],
            body_size: [20.0, 24.0],
            body_offset: [6.0, 4.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnemySettings {
    pub patrol_speed: f32,
    pub frame_size: [f32; 2],
    /// Collision box, centred inside the frame.
    pub body_size: [f32; 2],
    /// How far below the body a patrolling slime looks for ground, in px.
    pub edge_check_depth: f32,
}

impl Default for EnemySettings {
    fn default() -> Self {
        Self {
            patrol_speed: 30.0,
            frame_size: [24.0, 24.0],
            body_size: [20.0, 20.0],
            edge_check_depth: 2.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Zoom change per mouse-wheel line.
    pub wheel_step: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self { zoom: 1.5, min_zoom: 0.5, max_zoom: 2.5, wheel_step: 0.1 }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub music_volume: f32,
    pub sfx_volume: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self { music_volume: 0.5, sfx_volume: 1.0 }
    }
}

// ── GameConfig ────────────────────────────────────────────────────────────────

/// Top-level configuration. Every field falls back to its default, so a
/// config file only needs the values it wants to change.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowSettings,
    pub physics: PhysicsSettings,
    pub player: PlayerSettings,
    pub enemy: EnemySettings,
    pub camera: CameraSettings,
    pub audio: AudioSettings,
    /// Root folder holding `maps/`, `tilesets/`, `sprites/` and `audio/`.
    pub asset_dir: PathBuf,
    /// Draw physics bodies on top of the scene.
    pub debug: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            physics: PhysicsSettings::default(),
            player: PlayerSettings::default(),
            enemy: EnemySettings::default(),
            camera: CameraSettings::default(),
            audio: AudioSettings::default(),
            asset_dir: PathBuf::from("assets"),
            debug: true,
        }
    }
}

impl GameConfig {
    pub fn from_json_str(s: &str) -> Result<Self, GameError> {
        serde_json::from_str(s).map_err(|source| GameError::Json { what: "config".into(), source })
    }

    /// Load the config at `path`. A missing file yields the defaults; a file
    /// that exists but does not parse is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => {
                log::info!("loading config from {}", path.display());
                Self::from_json_str(&content)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("{} not found, using default config", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(GameError::Io { path: path.to_path_buf(), source }),
        }
    }
}
