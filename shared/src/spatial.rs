//! Spatial index over the loaded station.
//!
//! Splits the scene's mesh nodes into obstacle volumes and floor surfaces
//! once, at load. Only node ids and names are stored: world boxes are always
//! asked of the [`SceneGraph`] at query time, since ancestors may move.

use bevy::math::bounding::Aabb3d;
use bevy::prelude::*;

use crate::naming::{is_floor_like, is_platform_segment};
use crate::scene::{NodeId, SceneGraph};

/// A mesh node that blocks player movement.
#[derive(Clone, Debug, PartialEq)]
pub struct ObstacleVolume {
    pub node: NodeId,
    pub name: String,
}

impl ObstacleVolume {
    /// Current world box of the obstacle.
    pub fn world_bounds(&self, scene: &SceneGraph) -> Option<Aabb3d> {
        scene.world_bounds(self.node)
    }
}

/// A mesh node the player can stand on.
#[derive(Clone, Debug, PartialEq)]
pub struct FloorSurface {
    pub node: NodeId,
}

#[derive(Resource, Clone, Debug, Default)]
pub struct SpatialIndex {
    obstacles: Vec<ObstacleVolume>,
    floors: Vec<FloorSurface>,
    /// Platform segments in scene order; the glitch detector scans these.
    platform_segments: Vec<NodeId>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify every mesh node of `scene`. Nodes without geometry are skipped.
    pub fn from_scene(scene: &SceneGraph) -> Self {
        let mut index = Self::new();
        for (id, node) in scene.mesh_nodes() {
            if is_floor_like(&node.name) {
                index.floors.push(FloorSurface { node: id });
            } else {
                index.obstacles.push(ObstacleVolume {
                    node: id,
                    name: node.name.clone(),
                });
            }
            if is_platform_segment(&node.name) {
                index.platform_segments.push(id);
            }
        }
        index
    }

    pub fn obstacles(&self) -> &[ObstacleVolume] {
        &self.obstacles
    }

    pub fn floors(&self) -> &[FloorSurface] {
        &self.floors
    }

    pub fn floor_nodes(&self) -> Vec<NodeId> {
        self.floors.iter().map(|f| f.node).collect()
    }

    pub fn platform_segments(&self) -> &[NodeId] {
        &self.platform_segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let mut scene = SceneGraph::new();
        let group = scene.add_node("Station", None, Transform::IDENTITY, None);
        let wall = scene.add_box_mesh("Wall_north", Some(group), Vec3::ZERO, Vec3::ONE);
        let floor = scene.add_quad_floor("Floor_hall", Some(group), Vec3::ZERO, Vec2::ONE);
        let stairs = scene.add_quad_floor("Stairs_exit", Some(group), Vec3::ZERO, Vec2::ONE);
        let segment = scene.add_quad_floor("St_02_4", Some(group), Vec3::ZERO, Vec2::ONE);

        let index = SpatialIndex::from_scene(&scene);

        assert_eq!(index.obstacles().len(), 1);
        assert_eq!(index.obstacles()[0].node, wall);
        assert_eq!(index.obstacles()[0].name, "Wall_north");
        assert_eq!(index.floor_nodes(), vec![floor, stairs, segment]);
        assert_eq!(index.platform_segments(), &[segment]);
    }

    #[test]
    fn test_no_node_in_both_sets() {
        let mut scene = SceneGraph::new();
        for name in ["Wall", "Floor", "rail_1", "Bench", "st_9"] {
            scene.add_box_mesh(name, None, Vec3::ZERO, Vec3::ONE);
        }
        let index = SpatialIndex::from_scene(&scene);
        for obstacle in index.obstacles() {
            assert!(!index.floor_nodes().contains(&obstacle.node));
        }
        assert_eq!(index.obstacles().len() + index.floors().len(), scene.len());
    }
}
