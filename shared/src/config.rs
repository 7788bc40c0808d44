//! Static world configuration.
//!
//! Every spatial constant the simulation needs lives in [`WorldConfig`]. The
//! defaults are the values the station ships with; the client may override
//! them from `assets/world.ron`.

use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::anomaly::AnomalyZone;
use crate::collision::{Axis, Crossing, Doorway, InvisibleWall, WallFeedback};

/// One-way wall at the top of the stairs.
pub const STAIRS_Z_LIMIT: f32 = 37.0;
/// Wall at the far end of the platform.
pub const EXTRA_WALL_Z: f32 = -16.97;
/// Track-side walls.
pub const EXTRA_WALL_X1: f32 = 6.3887;
pub const EXTRA_WALL_X2: f32 = 18.5848;

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Where the camera rig starts.
    pub spawn_position: Vec3,
    pub walls: Vec<InvisibleWall>,
    pub doorway: Option<Doorway>,
    pub anomaly_zone: Option<AnomalyZone>,
    /// Full size of the player box (not half-extents).
    pub player_hitbox_size: Vec3,
    pub eye_height: f32,
    /// Eye height never exceeds this while standing on stairs.
    pub stairs_max_eye_y: f32,
    pub jump_height: f32,
    pub jump_duration_ticks: u32,
    /// Jumping is only allowed below this height (the railway level).
    pub jump_max_start_y: f32,
    /// Units per tick.
    pub walk_speed: f32,
    pub noclip_speed: f32,
    pub pitch_limit: f32,
    pub mouse_sensitivity: f32,
    pub interact_distance: f32,
    pub warning_cooldown_ms: u64,
    /// Node name prefix of the object the player can collect from.
    pub collectible_prefix: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            spawn_position: Vec3::new(15.0, 3.0, 0.0),
            walls: vec![
                InvisibleWall {
                    axis: Axis::Z,
                    threshold: STAIRS_Z_LIMIT,
                    crossing: Crossing::Forward,
                    feedback: WallFeedback::Warn,
                },
                InvisibleWall {
                    axis: Axis::Z,
                    threshold: EXTRA_WALL_Z,
                    crossing: Crossing::Both,
                    feedback: WallFeedback::Warn,
                },
                InvisibleWall {
                    axis: Axis::X,
                    threshold: EXTRA_WALL_X1,
                    crossing: Crossing::Both,
                    feedback: WallFeedback::Silent,
                },
                InvisibleWall {
                    axis: Axis::X,
                    threshold: EXTRA_WALL_X2,
                    crossing: Crossing::Both,
                    feedback: WallFeedback::Silent,
                },
            ],
            doorway: Some(Doorway {
                center: Vec2::new(15.0, 5.0),
                half_extents: Vec2::new(1.2, 1.0),
                passable_prefix: "entrance_wall".to_string(),
            }),
            anomaly_zone: Some(AnomalyZone {
                center: Vec3::new(10.5, 1.6, 20.0),
                radius: 2.0,
                vertical_tolerance: 2.5,
            }),
            player_hitbox_size: Vec3::new(0.6, 1.6, 0.6),
            eye_height: 1.6,
            stairs_max_eye_y: 3.2,
            jump_height: 0.6,
            jump_duration_ticks: 30,
            jump_max_start_y: 2.0,
            walk_speed: 0.12,
            noclip_speed: 0.25,
            pitch_limit: 1.4,
            mouse_sensitivity: 0.002,
            interact_distance: 3.0,
            warning_cooldown_ms: 4000,
            collectible_prefix: "Vending_machine".to_string(),
        }
    }
}

impl WorldConfig {
    pub fn warning_cooldown(&self) -> Duration {
        Duration::from_millis(self.warning_cooldown_ms)
    }

    pub fn move_speed(&self, noclip: bool) -> f32 {
        if noclip {
            self.noclip_speed
        } else {
            self.walk_speed
        }
    }
}

/// Parse a config from RON text. Missing fields keep their defaults.
pub fn load_world_config_from_str(text: &str) -> Result<WorldConfig, String> {
    ron::from_str(text).map_err(|e| format!("world config parse failed: {e}"))
}

/// Load a config from a RON file.
pub fn load_world_config_from_file(path: impl AsRef<Path>) -> Result<WorldConfig, String> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| format!("failed to read {path:?}: {e}"))?;
    load_world_config_from_str(&text)
}

/// Load the config at `path`, falling back to the defaults (with a warning)
/// when the file is absent or malformed.
pub fn load_world_config_or_default(path: impl AsRef<Path>) -> WorldConfig {
    match load_world_config_from_file(path) {
        Ok(config) => {
            info!("Loaded world config ({} invisible walls)", config.walls.len());
            config
        }
        Err(err) => {
            warn!("Using default world config: {err}");
            WorldConfig::default()
        }
    }
}
