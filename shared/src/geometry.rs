//! Box and ray primitives shared by the resolvers.

use bevy::math::bounding::{Aabb3d, BoundingVolume};
use bevy::prelude::*;

/// Rays pointing closer than this to a triangle's plane are treated as parallel.
const RAY_EPSILON: f32 = 1e-7;

/// Slack on the barycentric bounds so rays through a shared edge hit one side.
const EDGE_EPSILON: f32 = 1e-6;

/// Box with the given center and full size.
pub fn box_from_center_size(center: Vec3, size: Vec3) -> Aabb3d {
    Aabb3d::new(center, size * 0.5)
}

/// Box enclosing `points`, or `None` for an empty slice.
pub fn box_from_points(points: &[Vec3]) -> Option<Aabb3d> {
    let (first, rest) = points.split_first()?;
    let (min, max) = rest
        .iter()
        .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
    Some(Aabb3d {
        min: min.into(),
        max: max.into(),
    })
}

/// Axis-aligned box enclosing `local` after transforming it by `matrix`.
///
/// All eight corners are transformed so rotated and scaled nodes still get a
/// conservative world box.
pub fn transform_box(local: &Aabb3d, matrix: &Mat4) -> Aabb3d {
    let min = Vec3::from(local.min);
    let max = Vec3::from(local.max);
    let corners = [
        Vec3::new(min.x, min.y, min.z),
        Vec3::new(max.x, min.y, min.z),
        Vec3::new(min.x, max.y, min.z),
        Vec3::new(max.x, max.y, min.z),
        Vec3::new(min.x, min.y, max.z),
        Vec3::new(max.x, min.y, max.z),
        Vec3::new(min.x, max.y, max.z),
        Vec3::new(max.x, max.y, max.z),
    ]
    .map(|corner| matrix.transform_point3(corner));
    // Eight corners are never empty.
    box_from_points(&corners).unwrap_or(*local)
}

/// Union of two optional boxes.
pub fn merge_boxes(a: Option<Aabb3d>, b: Option<Aabb3d>) -> Option<Aabb3d> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.merge(&b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Two-sided Möller–Trumbore ray/triangle test.
///
/// Returns the distance along the ray to the hit; hits behind the origin are
/// ignored.
pub fn ray_triangle(ray: &Ray3d, triangle: &[Vec3; 3]) -> Option<f32> {
    let [a, b, c] = *triangle;
    let dir = *ray.direction;
    let edge1 = b - a;
    let edge2 = c - a;
    let pvec = dir.cross(edge2);
    let det = edge1.dot(pvec);
    if det.abs() < RAY_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;

    let tvec = ray.origin - a;
    let u = tvec.dot(pvec) * inv_det;
    if !(-EDGE_EPSILON..=1.0 + EDGE_EPSILON).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(edge1);
    let v = dir.dot(qvec) * inv_det;
    if v < -EDGE_EPSILON || u + v > 1.0 + EDGE_EPSILON {
        return None;
    }

    let t = edge2.dot(qvec) * inv_det;
    (t >= 0.0).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::bounding::IntersectsVolume;

    fn floor_triangle(y: f32) -> [Vec3; 3] {
        [
            Vec3::new(-1.0, y, -1.0),
            Vec3::new(1.0, y, -1.0),
            Vec3::new(0.0, y, 1.0),
        ]
    }

    #[test]
    fn test_ray_hits_triangle_below() {
        let ray = Ray3d::new(Vec3::new(0.0, 3.0, 0.0), Dir3::NEG_Y);
        let t = ray_triangle(&ray, &floor_triangle(1.0)).unwrap();
        assert!((t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_ignores_triangle_behind() {
        let ray = Ray3d::new(Vec3::new(0.0, 3.0, 0.0), Dir3::NEG_Y);
        assert!(ray_triangle(&ray, &floor_triangle(4.0)).is_none());
    }

    #[test]
    fn test_ray_misses_outside_triangle() {
        let ray = Ray3d::new(Vec3::new(5.0, 3.0, 0.0), Dir3::NEG_Y);
        assert!(ray_triangle(&ray, &floor_triangle(1.0)).is_none());
    }

    #[test]
    fn test_transform_box_rotated() {
        let local = box_from_center_size(Vec3::ZERO, Vec3::new(2.0, 2.0, 4.0));
        let matrix = Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let world = transform_box(&local, &matrix);
        assert!((world.max.x - 2.0).abs() < 1e-5);
        assert!((world.max.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_touching_boxes_intersect() {
        let a = box_from_center_size(Vec3::ZERO, Vec3::ONE);
        let b = box_from_center_size(Vec3::new(1.0, 0.0, 0.0), Vec3::ONE);
        assert!(a.intersects(&b));
    }
}
