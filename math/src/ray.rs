//! 3D ray primitives for hitscan weapons and sight checks.
//!
//! All tests are stateless and return the ray parameter of the nearest
//! acceptable hit, or `None`. Direction vectors are expected normalized;
//! the returned `t` is then a world distance.

use glam::Vec3;

use crate::INTERSECT_EPSILON;

/// Nearest non-negative intersection of a ray with a sphere.
#[inline]
pub fn ray_sphere_intercept(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let a = dir.dot(dir);
    let b = 2.0 * oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    // Smallest non-negative root; the ray may start inside the sphere.
    let t0 = (-b - sqrt_d) / (2.0 * a);
    if t0 >= 0.0 {
        return Some(t0);
    }
    let t1 = (-b + sqrt_d) / (2.0 * a);
    if t1 >= 0.0 {
        return Some(t1);
    }
    None
}

/// Intersection with the front face of a plane.
///
/// The plane is given by any `point` on it and its `normal`; hits from
/// behind (ray travelling with the normal) are rejected.
#[inline]
pub fn ray_plane_intercept(origin: Vec3, dir: Vec3, point: Vec3, normal: Vec3) -> Option<f32> {
    let denominator = dir.dot(normal);
    if denominator >= -INTERSECT_EPSILON {
        return None;
    }
    let t = (point - origin).dot(normal) / denominator;
    if t >= 0.0 {
        return Some(t);
    }
    None
}

/// Möller–Trumbore ray/triangle test.
///
/// Rejects hits outside the triangle (barycentric bounds) and behind the
/// ray origin. Either winding is accepted.
#[inline]
pub fn ray_triangle_intercept(origin: Vec3, dir: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = dir.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() <= INTERSECT_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = dir.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(q) * inv_det;
    if t >= 0.0 {
        return Some(t);
    }
    None
}

/// Intersection with a camera-facing sprite quad.
///
/// Coordinates are x/y ground plane with z up. The quad is centred on
/// `center`, `half_width` × `half_height`, rotated about the vertical
/// axis to face `camera`, and decomposed into two triangles which are
/// tested in turn.
#[inline]
pub fn ray_billboard_intercept(
    origin: Vec3,
    dir: Vec3,
    center: Vec3,
    half_width: f32,
    half_height: f32,
    camera: Vec3,
) -> Option<f32> {
    let mut facing = camera - center;
    facing.z = 0.0;
    if facing.length_squared() <= INTERSECT_EPSILON {
        // Camera directly above: fall back to facing against the ray
        facing = Vec3::new(-dir.x, -dir.y, 0.0);
        if facing.length_squared() <= INTERSECT_EPSILON {
            return None;
        }
    }
    let facing = facing.normalize();
    let right = Vec3::Z.cross(facing).normalize() * half_width;
    let up = Vec3::Z * half_height;

    let bl = center - right - up;
    let br = center + right - up;
    let tr = center + right + up;
    let tl = center - right + up;

    let first = ray_triangle_intercept(origin, dir, bl, br, tr);
    let second = ray_triangle_intercept(origin, dir, bl, tr, tl);
    match (first, second) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (hit, None) => hit,
        (None, hit) => hit,
    }
}
