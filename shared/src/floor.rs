//! Vertical placement of the camera rig on walkable geometry.

use bevy::prelude::*;

use crate::config::WorldConfig;
use crate::naming::is_stair_name;
use crate::player::PlayerState;
use crate::scene::{RayHit, SceneGraph};
use crate::spatial::SpatialIndex;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloorResolution {
    /// Eye height to place the rig at, or `None` when nothing is below.
    pub eye_y: Option<f32>,
    pub on_stairs: bool,
}

/// Among every floor hit straight below `position`, the one with the lowest
/// world Y. Stacked floor meshes resolve to the bottom one, not the nearest.
pub fn lowest_floor_hit(scene: &SceneGraph, index: &SpatialIndex, position: Vec3) -> Option<RayHit> {
    let ray = Ray3d::new(position, Dir3::NEG_Y);
    scene
        .raycast(&ray, &index.floor_nodes())
        .into_iter()
        .min_by(|a, b| a.point.y.total_cmp(&b.point.y))
}

/// Resolve the eye height for a rig at `position`.
pub fn resolve_floor(
    scene: &SceneGraph,
    index: &SpatialIndex,
    config: &WorldConfig,
    position: Vec3,
) -> FloorResolution {
    let Some(hit) = lowest_floor_hit(scene, index, position) else {
        return FloorResolution {
            eye_y: None,
            on_stairs: false,
        };
    };

    let on_stairs = is_stair_name(surface_name(scene, hit));
    let mut eye_y = hit.point.y + config.eye_height;
    if on_stairs {
        eye_y = eye_y.min(config.stairs_max_eye_y);
    }

    FloorResolution {
        eye_y: Some(eye_y),
        on_stairs,
    }
}

/// The struck node's name, or its parent's when the node itself is unnamed.
fn surface_name(scene: &SceneGraph, hit: RayHit) -> &str {
    match scene.name(hit.node) {
        "" => scene.parent(hit.node).map(|p| scene.name(p)).unwrap_or(""),
        name => name,
    }
}

/// Snap the player onto the floor below.
///
/// Does nothing during a jump arc, under no-clip, or before any floor exists.
/// With nothing below, the height is kept and the stairs flag cleared.
pub fn settle_player(
    scene: &SceneGraph,
    index: Option<&SpatialIndex>,
    config: &WorldConfig,
    player: &mut PlayerState,
) {
    let Some(index) = index else { return };
    if index.floors().is_empty() || player.noclip || player.jump.active {
        return;
    }

    let resolution = resolve_floor(scene, index, config, player.position());
    player.on_stairs = resolution.on_stairs;
    if let Some(eye_y) = resolution.eye_y {
        let mut position = player.position();
        position.y = eye_y;
        player.set_position(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER_XZ: Vec3 = Vec3::new(0.3, 0.0, 0.2);

    fn at_height(y: f32) -> Vec3 {
        PLAYER_XZ + Vec3::Y * y
    }

    #[test]
    fn test_lowest_hit_wins_over_nearest() {
        let mut scene = SceneGraph::new();
        scene.add_quad_floor("Floor_upper", None, Vec3::new(0.0, 2.0, 0.0), Vec2::splat(5.0));
        scene.add_quad_floor("Floor_lower", None, Vec3::new(0.0, 1.0, 0.0), Vec2::splat(5.0));
        let index = SpatialIndex::from_scene(&scene);
        let config = WorldConfig::default();

        let resolution = resolve_floor(&scene, &index, &config, at_height(4.0));
        let eye_y = resolution.eye_y.unwrap();
        assert!((eye_y - 2.6).abs() < 1e-5);
        assert!(!resolution.on_stairs);
    }

    #[test]
    fn test_stairs_clamp() {
        let mut scene = SceneGraph::new();
        scene.add_quad_floor("Stairs_exit", None, Vec3::new(0.0, 2.5, 0.0), Vec2::splat(5.0));
        let index = SpatialIndex::from_scene(&scene);
        let config = WorldConfig::default();

        let resolution = resolve_floor(&scene, &index, &config, at_height(5.0));
        assert_eq!(resolution.eye_y, Some(3.2));
        assert!(resolution.on_stairs);
    }

    #[test]
    fn test_low_stairs_not_clamped() {
        let mut scene = SceneGraph::new();
        scene.add_quad_floor("stair_step", None, Vec3::new(0.0, 0.5, 0.0), Vec2::splat(5.0));
        let index = SpatialIndex::from_scene(&scene);
        let config = WorldConfig::default();

        let resolution = resolve_floor(&scene, &index, &config, at_height(3.0));
        assert!((resolution.eye_y.unwrap() - 2.1).abs() < 1e-5);
        assert!(resolution.on_stairs);
    }

    #[test]
    fn test_unnamed_surface_uses_parent_name() {
        let mut scene = SceneGraph::new();
        let stairs = scene.add_node("Stairs", None, Transform::IDENTITY, None);
        let step = scene.add_quad_floor("", Some(stairs), Vec3::new(0.0, 2.0, 0.0), Vec2::splat(5.0));
        let hit = RayHit {
            node: step,
            point: Vec3::new(0.0, 2.0, 0.0),
            distance: 1.0,
        };
        assert_eq!(surface_name(&scene, hit), "Stairs");
    }

    #[test]
    fn test_ceiling_above_is_ignored() {
        let mut scene = SceneGraph::new();
        scene.add_quad_floor("Floor", None, Vec3::new(0.0, 6.0, 0.0), Vec2::splat(5.0));
        let index = SpatialIndex::from_scene(&scene);
        let config = WorldConfig::default();
        let resolution = resolve_floor(&scene, &index, &config, at_height(3.0));
        assert_eq!(resolution.eye_y, None);
        assert!(!resolution.on_stairs);
    }

    #[test]
    fn test_settle_player() {
        let mut scene = SceneGraph::new();
        scene.add_quad_floor("Stairs_a", None, Vec3::new(0.0, 1.0, 0.0), Vec2::splat(5.0));
        let index = SpatialIndex::from_scene(&scene);
        let config = WorldConfig::default();

        let mut player = PlayerState::new(at_height(4.0));
        settle_player(&scene, Some(&index), &config, &mut player);
        assert!((player.position().y - 2.6).abs() < 1e-5);
        assert!(player.on_stairs);

        // Walk off the edge: height kept, stairs flag cleared.
        player.set_position(Vec3::new(20.0, 2.6, 0.0));
        settle_player(&scene, Some(&index), &config, &mut player);
        assert_eq!(player.position().y, 2.6);
        assert!(!player.on_stairs);

        // Skipped while jumping or no-clipping.
        player.set_position(at_height(4.0));
        player.jump.active = true;
        settle_player(&scene, Some(&index), &config, &mut player);
        assert_eq!(player.position().y, 4.0);
        player.jump.active = false;
        player.noclip = true;
        settle_player(&scene, Some(&index), &config, &mut player);
        assert_eq!(player.position().y, 4.0);
    }
}
