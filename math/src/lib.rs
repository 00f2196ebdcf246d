mod intercept;
mod ray;

use glam::Vec2;
pub use intercept::*;
pub use ray::*;

/// Shared denominator guard for the parametric intersection tests.
pub const INTERSECT_EPSILON: f32 = 1e-6;

/// True if `point` lies strictly inside the circle.
#[inline]
pub fn circle_point_intersect(origin: Vec2, radius: f32, point: Vec2) -> bool {
    (point - origin).length_squared() < radius * radius
}

/// True if the line segment from `s_start` to `s_end` penetrates the circle.
///
/// Projection of the centre onto the segment is clamped to the segment
/// extents, so endpoints count.
#[inline]
pub fn circle_seg_collide(c_origin: Vec2, c_radius: f32, s_start: Vec2, s_end: Vec2) -> bool {
    let d = s_end - s_start;
    let len_sq = d.length_squared();
    if len_sq <= INTERSECT_EPSILON {
        return circle_point_intersect(c_origin, c_radius, s_start);
    }
    let t = ((c_origin - s_start).dot(d) / len_sq).clamp(0.0, 1.0);
    circle_point_intersect(c_origin, c_radius, s_start + d * t)
}
