//! World raycasts: shots and sight checks that travel the level and pass
//! through open doorways.

use glam::{Vec2, Vec3};
use math::{
    Trace, circle_seg_collide, ray_billboard_intercept, ray_sphere_intercept, segment_intercept,
};

use crate::level::Level;
use crate::level::map_defs::{CollisionSegment, RoomId, SegKind};

/// Doorway crossings allowed per raycast. Two facing open portals must
/// never loop a ray forever.
pub const MAX_PORTAL_CROSSINGS: u32 = 8;

/// A solid contact returned by a world raycast.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub point: Vec2,
    /// Room whose boundary was struck.
    pub room: RoomId,
    pub kind: SegKind,
    pub normal: Vec2,
}

impl Level {
    /// Cast a finite ray from `origin` to `end`.
    ///
    /// Starts in the room containing the origin. Walls, pillars and closed
    /// portals stop the ray and return the contact; an open portal lets it
    /// continue just past the doorway into the neighbouring room, bounded
    /// by [`MAX_PORTAL_CROSSINGS`]. `None` means an unobstructed line (or
    /// an origin outside every room).
    pub fn raycast_segment(&self, origin: Vec2, end: Vec2) -> Option<RayHit> {
        let step = self.map_data.tile_size() * 1e-3;
        let mut origin = origin;
        let mut room = self.leaf_at(origin)?;

        for _ in 0..MAX_PORTAL_CROSSINGS {
            let probe = Trace::between(origin, end);
            let Some((t, seg)) = nearest_ray_hit(self.map_data.segments_of(room), probe) else {
                return None;
            };
            let point = probe.point_at(t);

            if seg.kind == SegKind::Portal && seg.disabled {
                // Open doorway: step through and keep going on the far side
                let Some(dir) = (end - origin).try_normalize() else {
                    return None;
                };
                origin = point + dir * step;
                room = self.leaf_at(origin)?;
                continue;
            }
            return Some(RayHit {
                point,
                room,
                kind: seg.kind,
                normal: seg.normal,
            });
        }
        None
    }

    /// True when nothing solid blocks the straight line between two
    /// points. Positions outside every room never have sight.
    pub fn line_of_sight(&self, from: Vec2, to: Vec2) -> bool {
        if self.leaf_at(from).is_none() || self.leaf_at(to).is_none() {
            return false;
        }
        self.raycast_segment(from, to).is_none()
    }
}

/// Closest segment the ray crosses. Open portals stay candidates, since
/// the caller needs to see the crossing to continue into the next room;
/// any other disabled segment is out of play.
fn nearest_ray_hit<'a>(
    segments: &'a [CollisionSegment],
    probe: Trace,
) -> Option<(f32, &'a CollisionSegment)> {
    let mut best: Option<(f32, &CollisionSegment)> = None;
    for seg in segments {
        if seg.disabled && seg.kind != SegKind::Portal {
            continue;
        }
        if let Some(t) = segment_intercept(probe, seg.trace()) {
            if best.is_none_or(|(closest, _)| t < closest) {
                best = Some((t, seg));
            }
        }
    }
    best
}

/// Hitscan test against a sprite-billboarded thing.
///
/// Three stages, cheap to precise: a flat broad test along the shot, the
/// sprite's bounding sphere, then the camera-facing quad itself. The
/// camera pose comes in as a parameter; nothing here reaches for global
/// state. Returns the ray distance of a confirmed hit within `range`.
pub fn ray_hits_thing(
    origin: Vec3,
    dir: Vec3,
    range: f32,
    thing_pos: Vec3,
    sprite_half_width: f32,
    sprite_half_height: f32,
    camera: Vec3,
) -> Option<f32> {
    let flat_end = (origin + dir * range).truncate();
    if !circle_seg_collide(
        thing_pos.truncate(),
        sprite_half_width,
        origin.truncate(),
        flat_end,
    ) {
        return None;
    }
    let bound = sprite_half_width.hypot(sprite_half_height);
    ray_sphere_intercept(origin, dir, thing_pos, bound)?;
    let t = ray_billboard_intercept(
        origin,
        dir,
        thing_pos,
        sprite_half_width,
        sprite_half_height,
        camera,
    )?;
    (t <= range).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thing_hit_three_stage() {
        // Shooter and camera share a pose; target 10 units down +y
        let camera = Vec3::new(0.0, 0.0, 1.6);
        let dir = Vec3::Y;
        let thing = Vec3::new(0.0, 10.0, 1.0);

        let hit = ray_hits_thing(camera, dir, 20.0, thing, 0.6, 1.2, camera);
        assert!(hit.is_some());
        assert!((hit.unwrap() - 10.0).abs() < 0.1);

        // Out of range
        assert!(ray_hits_thing(camera, dir, 5.0, thing, 0.6, 1.2, camera).is_none());
        // Broad phase rejects a wide miss before any 3D work
        let off = Vec3::new(5.0, 0.0, 1.6);
        assert!(ray_hits_thing(off, dir, 20.0, thing, 0.6, 1.2, off).is_none());
    }
}
