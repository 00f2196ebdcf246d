//! The data structures a generated level is made of.

use glam::Vec2;
use math::Trace;
use rand::Rng;
use rand::rngs::SmallRng;

/// Index of a node in the level's arena. Parents refer to children by id,
/// room leaves are additionally registered in a flat list; there is no
/// pointer graph to keep alive.
pub type NodeId = usize;

/// Stable index of a Room leaf in the level's flat leaf list. This is the
/// handle gameplay code passes around; it never dangles because the list
/// is immutable after generation.
pub type RoomId = usize;

/// Axis a Wall node splits along. `Vertical` is a split line at constant
/// x (the children sit left/right of it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitAxis {
    Vertical,
    Horizontal,
}

/// Which boundary edge of a room a cell sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeDir {
    North,
    South,
    East,
    West,
}

impl EdgeDir {
    /// Outward normal of this edge, away from the room interior.
    #[inline]
    pub const fn normal(self) -> Vec2 {
        match self {
            EdgeDir::North => Vec2::new(0.0, 1.0),
            EdgeDir::South => Vec2::new(0.0, -1.0),
            EdgeDir::East => Vec2::new(1.0, 0.0),
            EdgeDir::West => Vec2::new(-1.0, 0.0),
        }
    }
}

/// Inclusive rectangle of tile coordinates: `[x0,x1] × [y0,y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileArea {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

/// Overlapping span of two areas that share a boundary edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedEdge {
    pub axis: SplitAxis,
    /// First shared tile along the edge.
    pub lo: i32,
    /// Last shared tile along the edge.
    pub hi: i32,
}

impl TileArea {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        debug_assert!(x0 <= x1 && y0 <= y1);
        Self { x0, y0, x1, y1 }
    }

    #[inline]
    pub const fn width(&self) -> i32 {
        self.x1 - self.x0 + 1
    }

    #[inline]
    pub const fn height(&self) -> i32 {
        self.y1 - self.y0 + 1
    }

    #[inline]
    pub const fn tile_count(&self) -> i32 {
        self.width() * self.height()
    }

    /// World-space point containment, given the tile scale. The area spans
    /// `[x0*ts, (x1+1)*ts)` on each axis.
    #[inline]
    pub fn contains_point(&self, p: Vec2, tile_size: f32) -> bool {
        p.x >= self.x0 as f32 * tile_size
            && p.x < (self.x1 + 1) as f32 * tile_size
            && p.y >= self.y0 as f32 * tile_size
            && p.y < (self.y1 + 1) as f32 * tile_size
    }

    /// The edge span shared with `other`, if the two areas are contiguous.
    ///
    /// Contiguous means an abutting boundary with at least one full tile of
    /// overlap. Areas that meet only at a corner share nothing a doorway
    /// could occupy and return `None`.
    pub fn shared_edge(&self, other: &TileArea) -> Option<SharedEdge> {
        if self.x1 + 1 == other.x0 || other.x1 + 1 == self.x0 {
            let lo = self.y0.max(other.y0);
            let hi = self.y1.min(other.y1);
            if lo <= hi {
                return Some(SharedEdge {
                    axis: SplitAxis::Vertical,
                    lo,
                    hi,
                });
            }
        }
        if self.y1 + 1 == other.y0 || other.y1 + 1 == self.y0 {
            let lo = self.x0.max(other.x0);
            let hi = self.x1.min(other.x1);
            if lo <= hi {
                return Some(SharedEdge {
                    axis: SplitAxis::Horizontal,
                    lo,
                    hi,
                });
            }
        }
        None
    }
}

/// Thematic category a room is dressed as. The weight skews the draw, the
/// pillar scale multiplies the configured pillar density.
#[derive(Debug)]
pub struct RoomProfile {
    pub name: &'static str,
    pub weight: u32,
    pub pillar_scale: f32,
}

pub const ROOM_PROFILES: [RoomProfile; 5] = [
    RoomProfile {
        name: "bare_hall",
        weight: 6,
        pillar_scale: 0.0,
    },
    RoomProfile {
        name: "gallery",
        weight: 4,
        pillar_scale: 0.6,
    },
    RoomProfile {
        name: "storeroom",
        weight: 3,
        pillar_scale: 1.0,
    },
    RoomProfile {
        name: "colonnade",
        weight: 2,
        pillar_scale: 1.8,
    },
    RoomProfile {
        name: "crypt",
        weight: 1,
        pillar_scale: 2.4,
    },
];

/// Weighted roll over `ROOM_PROFILES`, returning the profile index.
pub(crate) fn roll_profile(rng: &mut SmallRng) -> usize {
    let total: u32 = ROOM_PROFILES.iter().map(|p| p.weight).sum();
    let mut pick = rng.gen_range(0..total);
    for (i, profile) in ROOM_PROFILES.iter().enumerate() {
        if pick < profile.weight {
            return i;
        }
        pick -= profile.weight;
    }
    ROOM_PROFILES.len() - 1
}

/// A playable leaf of the partition tree.
#[derive(Debug)]
pub struct RoomNode {
    /// Sequential index into the level's flat leaf list.
    pub leaf: usize,
    pub area: TileArea,
    /// Index into [`ROOM_PROFILES`].
    pub profile: usize,
    /// Tile coordinates of single-tile obstacles inside the room.
    pub pillars: Vec<(i32, i32)>,
    /// Boundary collision segments. Empty until connectivity is final,
    /// then derived once and only flag-mutated afterwards.
    pub segments: Vec<CollisionSegment>,
}

/// One node of the partition tree.
#[derive(Debug)]
pub enum BspNode {
    /// A split plane with exactly two children tiling the parent area.
    Wall {
        area: TileArea,
        axis: SplitAxis,
        split: i32,
        children: [NodeId; 2],
    },
    Room(RoomNode),
    /// Dead space too small to be a room. Never rendered or collided with.
    Empty { area: TileArea },
}

impl BspNode {
    #[inline]
    pub fn area(&self) -> &TileArea {
        match self {
            BspNode::Wall { area, .. } => area,
            BspNode::Room(room) => &room.area,
            BspNode::Empty { area } => area,
        }
    }
}

/// A doorway between two geometrically adjacent rooms, homed on their
/// lowest common Wall ancestor.
#[derive(Debug)]
pub struct Portal {
    pub wall: NodeId,
    /// Leaf indices of the two rooms, lower index first.
    pub rooms: [usize; 2],
    /// Tile coordinate along the shared edge.
    pub position: i32,
    pub open: bool,
}

/// A shortcut linking two rooms that have no doorway path between them.
#[derive(Debug)]
pub struct Teleport {
    /// Leaf indices of the two linked rooms.
    pub rooms: [usize; 2],
    /// Fixed world-space landing point in each room.
    pub positions: [Vec2; 2],
    pub open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegKind {
    Wall,
    Portal,
    Pillar,
}

/// One collision boundary of a room.
///
/// `disabled` turns the collider *off*: movement and solid raycasts pass
/// through. Portal segments start with `disabled == false` (a closed door
/// is solid) and open by disabling the segment and its twin.
#[derive(Debug, Clone, Copy)]
pub struct CollisionSegment {
    pub start: Vec2,
    pub end: Vec2,
    /// Unit normal pointing out of the room (or out of the pillar).
    pub normal: Vec2,
    pub kind: SegKind,
    pub disabled: bool,
}

impl CollisionSegment {
    #[inline]
    pub fn blocks(&self) -> bool {
        !self.disabled
    }

    #[inline]
    pub fn tangent(&self) -> Vec2 {
        (self.end - self.start).normalize()
    }

    #[inline]
    pub fn trace(&self) -> Trace {
        Trace::between(self.start, self.end)
    }

    /// The same boundary seen from the neighbouring room: endpoints
    /// swapped, normal negated.
    pub fn is_twin(&self, other: &CollisionSegment) -> bool {
        const EPS: f32 = 1e-3;
        self.start.abs_diff_eq(other.end, EPS)
            && self.end.abs_diff_eq(other.start, EPS)
            && self.normal.abs_diff_eq(-other.normal, EPS)
    }
}
