//! Move arbitration against invisible walls and obstacle volumes.
//!
//! A proposed move is either taken whole or rejected whole; there is no
//! sliding along walls.

use bevy::math::bounding::{Aabb3d, IntersectsVolume};
use bevy::prelude::*;
use serde::Deserialize;

use crate::config::WorldConfig;
use crate::geometry::box_from_center_size;
use crate::naming::starts_with_ignore_case;
use crate::scene::SceneGraph;
use crate::spatial::SpatialIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum Axis {
    X,
    Z,
}

impl Axis {
    fn of(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Z => v.z,
        }
    }
}

/// Which crossings of a wall are refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum Crossing {
    /// Only moving from `<= threshold` to `> threshold`.
    Forward,
    /// Moving across the threshold in either direction.
    Both,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum WallFeedback {
    /// Refuse and ask for the (throttled) warning line and sound.
    Warn,
    Silent,
}

/// An invisible plane perpendicular to `axis` at `threshold`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct InvisibleWall {
    pub axis: Axis,
    pub threshold: f32,
    pub crossing: Crossing,
    pub feedback: WallFeedback,
}

impl InvisibleWall {
    /// Whether moving from `from` to `to` crosses the wall the forbidden way.
    ///
    /// Only the two endpoints are compared; a position exactly on a two-way
    /// wall may leave it in either direction.
    pub fn blocks(&self, from: Vec3, to: Vec3) -> bool {
        let (a, b, t) = (self.axis.of(from), self.axis.of(to), self.threshold);
        match self.crossing {
            Crossing::Forward => a <= t && b > t,
            Crossing::Both => (a < t && b >= t) || (a > t && b <= t),
        }
    }
}

/// Horizontal opening where obstacles named with `passable_prefix` are ignored.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Doorway {
    /// Center on the X/Z plane (`y` holds world Z).
    pub center: Vec2,
    pub half_extents: Vec2,
    pub passable_prefix: String,
}

impl Doorway {
    /// Height is unconstrained.
    pub fn contains(&self, position: Vec3) -> bool {
        (position.x - self.center.x).abs() <= self.half_extents.x
            && (position.z - self.center.y).abs() <= self.half_extents.y
    }

    pub fn lets_through(&self, obstacle_name: &str) -> bool {
        starts_with_ignore_case(obstacle_name, &self.passable_prefix)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveOutcome {
    Accepted(Vec3),
    Blocked { warn: bool },
}

/// Everything the resolver reads.
pub struct CollisionContext<'a> {
    pub scene: &'a SceneGraph,
    /// `None` until the scene has loaded.
    pub index: Option<&'a SpatialIndex>,
    pub config: &'a WorldConfig,
    pub noclip: bool,
}

/// Decide whether the player may move from `from` by `delta`.
pub fn resolve_move(ctx: &CollisionContext, from: Vec3, delta: Vec3) -> MoveOutcome {
    let target = from + delta;

    let Some(index) = ctx.index else {
        return MoveOutcome::Accepted(target);
    };
    if ctx.noclip {
        return MoveOutcome::Accepted(target);
    }

    if let Some(wall) = ctx.config.walls.iter().find(|w| w.blocks(from, target)) {
        return MoveOutcome::Blocked {
            warn: wall.feedback == WallFeedback::Warn,
        };
    }

    if overlaps_obstacle(ctx.scene, index, ctx.config, target) {
        return MoveOutcome::Blocked { warn: false };
    }

    MoveOutcome::Accepted(target)
}

/// Player box centered on the camera rig.
pub fn player_box(config: &WorldConfig, center: Vec3) -> Aabb3d {
    box_from_center_size(center, config.player_hitbox_size)
}

/// Whether the player box at `position` touches any obstacle, honouring the
/// doorway exception.
pub fn overlaps_obstacle(
    scene: &SceneGraph,
    index: &SpatialIndex,
    config: &WorldConfig,
    position: Vec3,
) -> bool {
    let player = player_box(config, position);
    let doorway = config.doorway.as_ref().filter(|d| d.contains(position));

    index.obstacles().iter().any(|obstacle| {
        if doorway.is_some_and(|d| d.lets_through(&obstacle.name)) {
            return false;
        }
        obstacle
            .world_bounds(scene)
            .is_some_and(|bounds| player.intersects(&bounds))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_world() -> (SceneGraph, SpatialIndex) {
        (SceneGraph::new(), SpatialIndex::new())
    }

    fn ctx<'a>(
        scene: &'a SceneGraph,
        index: Option<&'a SpatialIndex>,
        config: &'a WorldConfig,
        noclip: bool,
    ) -> CollisionContext<'a> {
        CollisionContext {
            scene,
            index,
            config,
            noclip,
        }
    }

    #[test]
    fn test_noclip_accepts_exactly() {
        let mut scene = SceneGraph::new();
        scene.add_box_mesh("Wall", None, Vec3::new(15.0, 3.0, 2.0), Vec3::splat(1.0));
        let index = SpatialIndex::from_scene(&scene);
        let config = WorldConfig::default();

        let from = Vec3::new(15.0, 3.0, 0.0);
        for delta in [
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(0.0, 0.0, 40.0),
            Vec3::new(-9.0, 0.0, 0.0),
        ] {
            let outcome = resolve_move(&ctx(&scene, Some(&index), &config, true), from, delta);
            assert_eq!(outcome, MoveOutcome::Accepted(from + delta));
        }
    }

    #[test]
    fn test_unloaded_scene_accepts() {
        let (scene, _) = empty_world();
        let config = WorldConfig::default();
        let from = Vec3::new(15.0, 3.0, 36.0);
        let outcome = resolve_move(&ctx(&scene, None, &config, false), from, Vec3::Z * 2.0);
        assert_eq!(outcome, MoveOutcome::Accepted(Vec3::new(15.0, 3.0, 38.0)));
    }

    #[test]
    fn test_one_way_stairs_wall() {
        let (scene, index) = empty_world();
        let config = WorldConfig::default();
        let c = ctx(&scene, Some(&index), &config, false);

        let forward = resolve_move(&c, Vec3::new(15.0, 3.0, 36.0), Vec3::Z * 2.0);
        assert_eq!(forward, MoveOutcome::Blocked { warn: true });

        let backward = resolve_move(&c, Vec3::new(15.0, 3.0, 38.0), Vec3::NEG_Z * 2.0);
        assert_eq!(backward, MoveOutcome::Accepted(Vec3::new(15.0, 3.0, 36.0)));
    }

    #[test]
    fn test_two_way_walls() {
        let (scene, index) = empty_world();
        let config = WorldConfig::default();
        let c = ctx(&scene, Some(&index), &config, false);

        let z_wall = resolve_move(&c, Vec3::new(15.0, 3.0, -16.0), Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(z_wall, MoveOutcome::Blocked { warn: true });
        let z_back = resolve_move(&c, Vec3::new(15.0, 3.0, -18.0), Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(z_back, MoveOutcome::Blocked { warn: true });

        let x_wall = resolve_move(&c, Vec3::new(18.0, 3.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(x_wall, MoveOutcome::Blocked { warn: false });
        let x_back = resolve_move(&c, Vec3::new(7.0, 3.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(x_back, MoveOutcome::Blocked { warn: false });
    }

    #[test]
    fn test_move_across_several_walls_is_rejected_whole() {
        let (scene, index) = empty_world();
        let config = WorldConfig::default();
        let c = ctx(&scene, Some(&index), &config, false);

        // Both Z walls in one step.
        let from = Vec3::new(15.0, 3.0, -20.0);
        let outcome = resolve_move(&c, from, Vec3::new(0.0, 0.0, 60.0));
        assert_eq!(outcome, MoveOutcome::Blocked { warn: true });

        // Both track-side walls in one step.
        let from = Vec3::new(5.0, 3.0, 0.0);
        let outcome = resolve_move(&c, from, Vec3::new(15.0, 0.0, 0.0));
        assert_eq!(outcome, MoveOutcome::Blocked { warn: false });
    }

    #[test]
    fn test_leaving_a_two_way_wall_from_on_top() {
        let wall = InvisibleWall {
            axis: Axis::X,
            threshold: 5.0,
            crossing: Crossing::Both,
            feedback: WallFeedback::Silent,
        };
        assert!(!wall.blocks(Vec3::new(5.0, 0.0, 0.0), Vec3::new(6.0, 0.0, 0.0)));
        assert!(!wall.blocks(Vec3::new(5.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 0.0)));
        assert!(wall.blocks(Vec3::new(4.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn test_obstacle_rejects_whole_move() {
        let mut scene = SceneGraph::new();
        scene.add_box_mesh("Pillar", None, Vec3::new(15.0, 3.0, 2.0), Vec3::splat(0.5));
        let index = SpatialIndex::from_scene(&scene);
        let config = WorldConfig::default();
        let c = ctx(&scene, Some(&index), &config, false);

        let from = Vec3::new(15.0, 3.0, 0.0);
        let outcome = resolve_move(&c, from, Vec3::new(0.0, 0.0, 1.5));
        assert_eq!(outcome, MoveOutcome::Blocked { warn: false });

        // Side-step clear of the pillar.
        let outcome = resolve_move(&c, from, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(outcome, MoveOutcome::Accepted(Vec3::new(14.0, 3.0, 0.0)));
    }

    #[test]
    fn test_floor_surfaces_never_block() {
        let mut scene = SceneGraph::new();
        scene.add_box_mesh("Floor_slab", None, Vec3::new(15.0, 3.0, 1.0), Vec3::splat(2.0));
        let index = SpatialIndex::from_scene(&scene);
        let config = WorldConfig::default();
        let c = ctx(&scene, Some(&index), &config, false);
        let outcome = resolve_move(&c, Vec3::new(15.0, 3.0, 0.0), Vec3::Z * 0.5);
        assert_eq!(outcome, MoveOutcome::Accepted(Vec3::new(15.0, 3.0, 0.5)));
    }

    #[test]
    fn test_doorway_region() {
        let doorway = WorldConfig::default().doorway.unwrap();
        assert!(doorway.contains(Vec3::new(15.0, 3.0, 5.0)));
        assert!(!doorway.contains(Vec3::new(17.0, 3.0, 5.0)));
        // Height does not matter.
        assert!(doorway.contains(Vec3::new(15.0, -40.0, 5.0)));
    }

    #[test]
    fn test_doorway_lets_only_matching_obstacles_through() {
        let mut scene = SceneGraph::new();
        scene.add_box_mesh("Entrance_wall_01", None, Vec3::new(15.0, 3.0, 5.0), Vec3::new(3.0, 2.0, 0.2));
        let index = SpatialIndex::from_scene(&scene);
        let config = WorldConfig::default();
        let c = ctx(&scene, Some(&index), &config, false);

        let outcome = resolve_move(&c, Vec3::new(15.0, 3.0, 4.5), Vec3::Z * 0.5);
        assert_eq!(outcome, MoveOutcome::Accepted(Vec3::new(15.0, 3.0, 5.0)));

        // Same wall, but the target is outside the doorway rectangle.
        let outcome = resolve_move(&c, Vec3::new(17.0, 3.0, 4.5), Vec3::Z * 0.5);
        assert_eq!(outcome, MoveOutcome::Blocked { warn: false });

        let mut scene = SceneGraph::new();
        scene.add_box_mesh("Wall_solid", None, Vec3::new(15.0, 3.0, 5.0), Vec3::new(3.0, 2.0, 0.2));
        let index = SpatialIndex::from_scene(&scene);
        let c = ctx(&scene, Some(&index), &config, false);
        let outcome = resolve_move(&c, Vec3::new(15.0, 3.0, 4.5), Vec3::Z * 0.5);
        assert_eq!(outcome, MoveOutcome::Blocked { warn: false });
    }
}
