//! Per-tick walking and jump arc.

use bevy::prelude::*;

use crate::config::WorldConfig;
use crate::player::PlayerState;

/// Movement keys held this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// One displacement per held key, in the order forward, backward, right, left.
///
/// Each is arbitrated separately, so holding W+D against a wall still lets
/// the sideways component through.
pub fn key_displacements(keys: HeldKeys, player: &PlayerState, speed: f32) -> Vec<Vec3> {
    let facing = player.facing();
    let right = player.right();
    [
        (keys.forward, -facing),
        (keys.backward, facing),
        (keys.right, right),
        (keys.left, -right),
    ]
    .into_iter()
    .filter(|(held, _)| *held)
    .map(|(_, dir)| dir * speed)
    .collect()
}

/// Jumps start only from the railway level and never under no-clip.
pub fn can_start_jump(player: &PlayerState, config: &WorldConfig) -> bool {
    !player.jump.active && !player.noclip && player.position().y < config.jump_max_start_y
}

pub fn start_jump(player: &mut PlayerState) {
    player.jump.active = true;
    player.jump.frame = 0;
    player.jump.start_y = player.position().y;
}

/// Advance the arc one tick. Returns `true` on the tick the jump lands.
pub fn advance_jump(player: &mut PlayerState, config: &WorldConfig) -> bool {
    if !player.jump.active {
        return false;
    }
    player.jump.frame += 1;
    let duration = config.jump_duration_ticks.max(1) as f32;
    let t = (player.jump.frame as f32 / duration).min(1.0);
    let lift = 4.0 * config.jump_height * t * (1.0 - t);

    let mut position = player.position();
    position.y = player.jump.start_y + lift;
    player.set_position(position);

    if t >= 1.0 {
        player.jump.active = false;
        return true;
    }
    false
}
