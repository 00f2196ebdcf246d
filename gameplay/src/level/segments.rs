//! Per-room collision boundaries.
//!
//! Walks each room's four edges cell-by-cell, collapsing solid runs into
//! single Wall segments and cutting a one-tile Portal segment wherever
//! connectivity placed a doorway. Must run after portal placement and
//! before anything collides with the level. Winding is counter-clockwise
//! with outward normals; the neighbouring room walks the same boundary the
//! other way, which is what twin matching relies on.

use glam::Vec2;

use super::map_data::MapData;
use super::map_defs::{CollisionSegment, EdgeDir, RoomId, SegKind};

pub(super) fn derive_segments(map: &mut MapData) {
    for leaf in 0..map.room_count() {
        let segments = build_room_segments(map, leaf);
        map.room_mut(leaf).segments = segments;
    }
}

fn build_room_segments(map: &MapData, leaf: RoomId) -> Vec<CollisionSegment> {
    let ts = map.tile_size();
    let area = map.room(leaf).area;

    // Doorway cells per edge, keyed by the coordinate that varies along it.
    let mut doors_north = Vec::new();
    let mut doors_south = Vec::new();
    let mut doors_east = Vec::new();
    let mut doors_west = Vec::new();
    for portal in &map.portals {
        if !portal.rooms.contains(&leaf) {
            continue;
        }
        let (dir, cx, cy) = map.portal_side(portal, leaf);
        match dir {
            EdgeDir::North => doors_north.push(cx),
            EdgeDir::South => doors_south.push(cx),
            EdgeDir::East => doors_east.push(cy),
            EdgeDir::West => doors_west.push(cy),
        }
    }

    let mut segments = Vec::new();
    // South: left to right, then east, north and west to close the loop.
    walk_edge(
        &mut segments,
        EdgeDir::South,
        area.y0 as f32 * ts,
        (area.x0..=area.x1).collect(),
        true,
        &doors_south,
        ts,
    );
    walk_edge(
        &mut segments,
        EdgeDir::East,
        (area.x1 + 1) as f32 * ts,
        (area.y0..=area.y1).collect(),
        true,
        &doors_east,
        ts,
    );
    walk_edge(
        &mut segments,
        EdgeDir::North,
        (area.y1 + 1) as f32 * ts,
        (area.x0..=area.x1).rev().collect(),
        false,
        &doors_north,
        ts,
    );
    walk_edge(
        &mut segments,
        EdgeDir::West,
        area.x0 as f32 * ts,
        (area.y0..=area.y1).rev().collect(),
        false,
        &doors_west,
        ts,
    );

    for &(px, py) in &map.room(leaf).pillars {
        push_pillar(&mut segments, px, py, ts);
    }
    segments
}

/// Emit the segments of one edge. `cells` comes in winding order; runs of
/// plain boundary cells merge into one Wall segment, every doorway cell
/// gets its own Portal segment, solid until opened.
fn walk_edge(
    segments: &mut Vec<CollisionSegment>,
    dir: EdgeDir,
    fixed: f32,
    cells: Vec<i32>,
    ascending: bool,
    doors: &[i32],
    ts: f32,
) {
    let point = |along: f32| match dir {
        EdgeDir::East | EdgeDir::West => Vec2::new(fixed, along),
        EdgeDir::North | EdgeDir::South => Vec2::new(along, fixed),
    };
    let push = |segments: &mut Vec<CollisionSegment>, from: f32, to: f32, kind: SegKind| {
        segments.push(CollisionSegment {
            start: point(from),
            end: point(to),
            normal: dir.normal(),
            kind,
            disabled: false,
        });
    };

    let mut run_start: Option<f32> = None;
    let mut last_end = 0.0;
    for c in cells {
        let (c_start, c_end) = if ascending {
            (c as f32 * ts, (c + 1) as f32 * ts)
        } else {
            ((c + 1) as f32 * ts, c as f32 * ts)
        };
        if doors.contains(&c) {
            if let Some(from) = run_start.take() {
                push(segments, from, c_start, SegKind::Wall);
            }
            push(segments, c_start, c_end, SegKind::Portal);
        } else if run_start.is_none() {
            run_start = Some(c_start);
        }
        last_end = c_end;
    }
    if let Some(from) = run_start {
        push(segments, from, last_end, SegKind::Wall);
    }
}

/// Four faces of a single-tile obstacle, wound clockwise (a hole in the
/// room) with normals pointing away from the pillar.
fn push_pillar(segments: &mut Vec<CollisionSegment>, px: i32, py: i32, ts: f32) {
    let x0 = px as f32 * ts;
    let y0 = py as f32 * ts;
    let x1 = (px + 1) as f32 * ts;
    let y1 = (py + 1) as f32 * ts;
    let faces = [
        (Vec2::new(x1, y0), Vec2::new(x0, y0), Vec2::new(0.0, -1.0)),
        (Vec2::new(x0, y0), Vec2::new(x0, y1), Vec2::new(-1.0, 0.0)),
        (Vec2::new(x0, y1), Vec2::new(x1, y1), Vec2::new(0.0, 1.0)),
        (Vec2::new(x1, y1), Vec2::new(x1, y0), Vec2::new(1.0, 0.0)),
    ];
    for (start, end, normal) in faces {
        segments.push(CollisionSegment {
            start,
            end,
            normal,
            kind: SegKind::Pillar,
            disabled: false,
        });
    }
}

/// Open or close one portal: flip its flag and the disabled state of the
/// segment pair on both sides. The neighbour's segment is located through
/// twin matching (swapped endpoints, negated normal).
pub(super) fn set_portal_state(map: &mut MapData, portal_idx: usize, open: bool) {
    let [room_a, room_b] = map.portals[portal_idx].rooms;

    let seg_a = {
        let (dir, cx, cy) = {
            let portal = &map.portals[portal_idx];
            map.portal_side(portal, room_a)
        };
        let mid = portal_cell_midpoint(map, dir, cx, cy);
        let idx = find_portal_segment(map, room_a, mid)
            .expect("every placed portal has a boundary segment");
        let room = map.room_mut(room_a);
        room.segments[idx].disabled = open;
        room.segments[idx]
    };

    let twin = map
        .room(room_b)
        .segments
        .iter()
        .position(|s| s.kind == SegKind::Portal && s.is_twin(&seg_a))
        .expect("shared portal has a twin segment in the neighbouring room");
    map.room_mut(room_b).segments[twin].disabled = open;

    map.portals[portal_idx].open = open;
}

fn portal_cell_midpoint(map: &MapData, dir: EdgeDir, cx: i32, cy: i32) -> Vec2 {
    let ts = map.tile_size();
    match dir {
        EdgeDir::North => Vec2::new((cx as f32 + 0.5) * ts, (cy + 1) as f32 * ts),
        EdgeDir::South => Vec2::new((cx as f32 + 0.5) * ts, cy as f32 * ts),
        EdgeDir::East => Vec2::new((cx + 1) as f32 * ts, (cy as f32 + 0.5) * ts),
        EdgeDir::West => Vec2::new(cx as f32 * ts, (cy as f32 + 0.5) * ts),
    }
}

fn find_portal_segment(map: &MapData, leaf: RoomId, midpoint: Vec2) -> Option<usize> {
    map.segments_of(leaf).iter().position(|s| {
        s.kind == SegKind::Portal && ((s.start + s.end) * 0.5).abs_diff_eq(midpoint, 1e-3)
    })
}
