//! Player state: camera rig pose, no-clip and jump arc.

use bevy::prelude::*;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct JumpState {
    pub active: bool,
    /// Ticks elapsed since the jump started.
    pub frame: u32,
    pub start_y: f32,
}

/// The single player. Position is private: it only changes through the
/// motion controller's resolved moves.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub noclip: bool,
    pub jump: JumpState,
    pub on_stairs: bool,
}

impl PlayerState {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            noclip: false,
            jump: JumpState::default(),
            on_stairs: false,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Apply a mouse delta (pixels). Pitch stays within `±pitch_limit`.
    pub fn apply_look(&mut self, delta: Vec2, sensitivity: f32, pitch_limit: f32) {
        self.yaw -= delta.x * sensitivity;
        self.pitch = (self.pitch - delta.y * sensitivity).clamp(-pitch_limit, pitch_limit);
    }

    /// Horizontal facing axis. Walking forward moves along its negation.
    pub fn facing(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    /// Camera orientation (yaw on the rig, pitch on the camera).
    pub fn view_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Direction the camera looks.
    pub fn view_direction(&self) -> Vec3 {
        self.view_rotation() * Vec3::NEG_Z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_clamped() {
        let mut player = PlayerState::new(Vec3::ZERO);
        player.apply_look(Vec2::new(0.0, -100_000.0), 0.002, 1.4);
        assert_eq!(player.pitch, 1.4);
        player.apply_look(Vec2::new(0.0, 100_000.0), 0.002, 1.4);
        assert_eq!(player.pitch, -1.4);
    }

    #[test]
    fn test_view_direction_matches_walk_forward() {
        let mut player = PlayerState::new(Vec3::ZERO);
        player.yaw = 0.7;
        let view = player.view_direction();
        let walk = -player.facing();
        assert!((view - walk).length() < 1e-5);
    }
}
