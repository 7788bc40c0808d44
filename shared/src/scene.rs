//! Static scene graph consumed by the spatial resolvers.
//!
//! The client mirrors the loaded glTF into a [`SceneGraph`]: one node per
//! named scene entity, with its local transform, parent link and (for mesh
//! nodes) triangles in local space. World transforms and world boxes are
//! derived from the parent chain on every query and never cached, so a moved
//! ancestor is always reflected.

use bevy::math::bounding::Aabb3d;
use bevy::prelude::*;
use std::collections::HashSet;

use crate::geometry::{box_from_points, merge_boxes, ray_triangle, transform_box};

/// Index of a node inside a [`SceneGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Triangle geometry in the node's local space.
#[derive(Clone, Debug)]
pub struct MeshShape {
    triangles: Vec<[Vec3; 3]>,
    bounds: Aabb3d,
}

impl MeshShape {
    /// Build from a triangle list. Returns `None` when there is no geometry.
    pub fn from_triangles(triangles: Vec<[Vec3; 3]>) -> Option<Self> {
        let points: Vec<Vec3> = triangles.iter().flatten().copied().collect();
        let bounds = box_from_points(&points)?;
        Some(Self { triangles, bounds })
    }

    /// Build from a vertex buffer and an optional index buffer
    /// (non-indexed buffers are read as consecutive triples).
    pub fn from_indexed(positions: &[Vec3], indices: Option<&[u32]>) -> Option<Self> {
        let triangles = match indices {
            Some(indices) => indices
                .chunks_exact(3)
                .filter_map(|tri| {
                    Some([
                        *positions.get(tri[0] as usize)?,
                        *positions.get(tri[1] as usize)?,
                        *positions.get(tri[2] as usize)?,
                    ])
                })
                .collect(),
            None => positions
                .chunks_exact(3)
                .map(|tri| [tri[0], tri[1], tri[2]])
                .collect(),
        };
        Self::from_triangles(triangles)
    }

    /// Closed axis-aligned box centered on the origin.
    pub fn cuboid(half_extents: Vec3) -> Self {
        let h = half_extents;
        let corner = |x: f32, y: f32, z: f32| Vec3::new(x * h.x, y * h.y, z * h.z);
        let quad = |a: Vec3, b: Vec3, c: Vec3, d: Vec3| [[a, b, c], [a, c, d]];
        let faces = [
            quad(corner(-1., -1., 1.), corner(1., -1., 1.), corner(1., 1., 1.), corner(-1., 1., 1.)),
            quad(corner(1., -1., -1.), corner(-1., -1., -1.), corner(-1., 1., -1.), corner(1., 1., -1.)),
            quad(corner(-1., 1., 1.), corner(1., 1., 1.), corner(1., 1., -1.), corner(-1., 1., -1.)),
            quad(corner(-1., -1., -1.), corner(1., -1., -1.), corner(1., -1., 1.), corner(-1., -1., 1.)),
            quad(corner(1., -1., 1.), corner(1., -1., -1.), corner(1., 1., -1.), corner(1., 1., 1.)),
            quad(corner(-1., -1., -1.), corner(-1., -1., 1.), corner(-1., 1., 1.), corner(-1., 1., -1.)),
        ];
        let triangles = faces.into_iter().flatten().collect::<Vec<_>>();
        let bounds = Aabb3d::new(Vec3::ZERO, half_extents);
        Self { triangles, bounds }
    }

    /// Flat horizontal rectangle at local Y = 0, facing up.
    pub fn quad_xz(half_extents: Vec2) -> Self {
        let (x, z) = (half_extents.x, half_extents.y);
        let a = Vec3::new(-x, 0.0, z);
        let b = Vec3::new(x, 0.0, z);
        let c = Vec3::new(x, 0.0, -z);
        let d = Vec3::new(-x, 0.0, -z);
        let bounds = Aabb3d {
            min: Vec3::new(-x, 0.0, -z).into(),
            max: Vec3::new(x, 0.0, z).into(),
        };
        Self {
            triangles: vec![[a, b, c], [a, c, d]],
            bounds,
        }
    }

    pub fn triangles(&self) -> &[[Vec3; 3]] {
        &self.triangles
    }

    /// Local-space bounds.
    pub fn bounds(&self) -> Aabb3d {
        self.bounds
    }
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub local: Transform,
    pub mesh: Option<MeshShape>,
}

impl SceneNode {
    pub fn is_mesh(&self) -> bool {
        self.mesh.is_some()
    }
}

/// A ray intersection with a mesh node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub node: NodeId,
    pub point: Vec3,
    pub distance: f32,
}

#[derive(Resource, Clone, Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node. A parent must already exist.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
        local: Transform,
        mesh: Option<MeshShape>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = parent.filter(|p| p.0 < self.nodes.len());
        self.nodes.push(SceneNode {
            name: name.into(),
            parent,
            children: Vec::new(),
            local,
            mesh,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// Shorthand for a solid box node centered at `center`.
    pub fn add_box_mesh(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
        center: Vec3,
        half_extents: Vec3,
    ) -> NodeId {
        self.add_node(
            name,
            parent,
            Transform::from_translation(center),
            Some(MeshShape::cuboid(half_extents)),
        )
    }

    /// Shorthand for a walkable rectangle whose surface sits at `center.y`.
    pub fn add_quad_floor(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
        center: Vec3,
        half_extents: Vec2,
    ) -> NodeId {
        self.add_node(
            name,
            parent,
            Transform::from_translation(center),
            Some(MeshShape::quad_xz(half_extents)),
        )
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn name(&self, id: NodeId) -> &str {
        self.node(id).map(|n| n.name.as_str()).unwrap_or("")
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Nodes that carry geometry.
    pub fn mesh_nodes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.iter().filter(|(_, n)| n.is_mesh())
    }

    pub fn set_local_transform(&mut self, id: NodeId, local: Transform) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.local = local;
        }
    }

    /// World matrix composed from the parent chain.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut mat = Mat4::IDENTITY;
        let mut current = Some(id);
        // Parents are always older than their children, so the walk terminates.
        while let Some(node) = current.and_then(|c| self.node(c)) {
            mat = node.local.to_matrix() * mat;
            current = node.parent;
        }
        mat
    }

    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).transform_point3(Vec3::ZERO)
    }

    /// World box of a node's geometry including all of its descendants.
    /// `None` when neither the node nor any descendant has geometry.
    pub fn world_bounds(&self, id: NodeId) -> Option<Aabb3d> {
        let node = self.node(id)?;
        let own = node
            .mesh
            .as_ref()
            .map(|mesh| transform_box(&mesh.bounds(), &self.world_matrix(id)));
        node.children
            .iter()
            .fold(own, |acc, child| merge_boxes(acc, self.world_bounds(*child)))
    }

    /// Intersect `ray` with the geometry of `targets` and their descendants.
    /// Hits come back sorted nearest first.
    pub fn raycast(&self, ray: &Ray3d, targets: &[NodeId]) -> Vec<RayHit> {
        let mut visited = HashSet::new();
        let mut hits = Vec::new();
        for target in targets {
            self.raycast_node(ray, *target, &mut visited, &mut hits);
        }
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn raycast_node(
        &self,
        ray: &Ray3d,
        id: NodeId,
        visited: &mut HashSet<NodeId>,
        hits: &mut Vec<RayHit>,
    ) {
        let Some(node) = self.node(id) else { return };
        if !visited.insert(id) {
            return;
        }

        if let Some(mesh) = &node.mesh {
            let matrix = self.world_matrix(id);
            let nearest = mesh
                .triangles()
                .iter()
                .filter_map(|tri| ray_triangle(ray, &tri.map(|v| matrix.transform_point3(v))))
                .min_by(|a, b| a.total_cmp(b));
            if let Some(distance) = nearest {
                hits.push(RayHit {
                    node: id,
                    point: ray.get_point(distance),
                    distance,
                });
            }
        }

        for child in &node.children {
            self.raycast_node(ray, *child, visited, hits);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_bounds_follow_parent() {
        let mut scene = SceneGraph::new();
        let root = scene.add_node("Root", None, Transform::from_xyz(10.0, 0.0, 0.0), None);
        let child = scene.add_box_mesh("Crate", Some(root), Vec3::new(1.0, 0.0, 0.0), Vec3::splat(0.5));

        let bounds = scene.world_bounds(child).unwrap();
        assert!((bounds.min.x - 10.5).abs() < 1e-5);

        // Moving the parent moves the child's box on the next query.
        scene.set_local_transform(root, Transform::from_xyz(-10.0, 0.0, 0.0));
        let bounds = scene.world_bounds(child).unwrap();
        assert!((bounds.min.x + 9.5).abs() < 1e-5);
    }

    #[test]
    fn test_group_bounds_include_children() {
        let mut scene = SceneGraph::new();
        let group = scene.add_node("Group", None, Transform::IDENTITY, None);
        scene.add_box_mesh("A", Some(group), Vec3::new(-2.0, 0.0, 0.0), Vec3::splat(0.5));
        scene.add_box_mesh("B", Some(group), Vec3::new(2.0, 0.0, 0.0), Vec3::splat(0.5));

        let bounds = scene.world_bounds(group).unwrap();
        assert!((bounds.min.x + 2.5).abs() < 1e-5);
        assert!((bounds.max.x - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_empty_node_has_no_bounds() {
        let mut scene = SceneGraph::new();
        let empty = scene.add_node("Empty", None, Transform::IDENTITY, None);
        assert!(scene.world_bounds(empty).is_none());
    }

    #[test]
    fn test_raycast_sorted_and_recursive() {
        let mut scene = SceneGraph::new();
        let group = scene.add_node("Machine", None, Transform::IDENTITY, None);
        let near = scene.add_box_mesh("Front", Some(group), Vec3::new(0.0, 0.0, -2.0), Vec3::splat(0.5));
        let far = scene.add_box_mesh("Back", None, Vec3::new(0.0, 0.0, -6.0), Vec3::splat(0.5));

        let ray = Ray3d::new(Vec3::ZERO, Dir3::NEG_Z);
        let hits = scene.raycast(&ray, &[far, group]);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].node, near);
        assert!((hits[0].distance - 1.5).abs() < 1e-5);
        assert_eq!(hits[1].node, far);
    }

    #[test]
    fn test_from_indexed_skips_bad_indices() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Z];
        let shape = MeshShape::from_indexed(&positions, Some(&[0, 1, 2, 0, 1, 9])).unwrap();
        assert_eq!(shape.triangles().len(), 1);
        assert!(MeshShape::from_indexed(&[], None).is_none());
    }
}
