use glam::Vec2;

use crate::INTERSECT_EPSILON;

/// A finite 2D probe: origin plus travel. Both the movement solver and the
/// world raycast sweep one of these against collision segments.
#[derive(Debug, Clone, Copy)]
pub struct Trace {
    pub origin: Vec2,
    pub delta: Vec2,
}

impl Trace {
    #[inline]
    pub const fn new(origin: Vec2, delta: Vec2) -> Self {
        Self { origin, delta }
    }

    #[inline]
    pub fn between(start: Vec2, end: Vec2) -> Self {
        Self {
            origin: start,
            delta: end - start,
        }
    }

    #[inline]
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.origin + self.delta * t
    }
}

#[inline]
fn cross(lhs: Vec2, rhs: Vec2) -> f32 {
    lhs.x * rhs.y - lhs.y * rhs.x
}

/// Fractional intercept of `trace` against the finite segment `other`.
///
/// Parametric cross-product test. Parallel segments never intersect, and a
/// hit requires both parameters in `[0,1]`. Returns the fraction along
/// `trace` so callers can order hits by distance.
#[inline]
pub fn segment_intercept(trace: Trace, other: Trace) -> Option<f32> {
    let denominator = cross(trace.delta, other.delta);
    if denominator.abs() <= INTERSECT_EPSILON {
        return None;
    }
    let offset = other.origin - trace.origin;
    let t = cross(offset, other.delta) / denominator;
    let u = cross(offset, trace.delta) / denominator;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        return Some(t);
    }
    None
}

/// Which side of the trace line the point falls on: 0 front, 1 back.
#[inline]
pub fn point_on_side(trace: Trace, point: Vec2) -> usize {
    let offset = point - trace.origin;
    if cross(trace.delta, offset) <= 0.0 {
        return 0;
    }
    1
}
