//! The node arena and the recursive partitioner that fills it.
//!
//! Everything here is built once per generation call and is read-only for
//! the rest of the level's life; only segment/portal flags flip later.

use glam::Vec2;
use log::debug;
use rand::Rng;
use rand::rngs::SmallRng;

use super::map_defs::{
    BspNode, CollisionSegment, EdgeDir, NodeId, Portal, ROOM_PROFILES, RoomId, RoomNode,
    SplitAxis, Teleport, TileArea, roll_profile,
};
use super::{GenerationError, GenerationSettings};

/// How many draws a rejection-sampled free tile gets, per tile wanted,
/// before the map is declared broken for this seed.
const FREE_TILE_ATTEMPTS: usize = 16;

pub struct MapData {
    nodes: Vec<BspNode>,
    parents: Vec<Option<NodeId>>,
    /// Non-owning registry of Room leaves in leaf-index order.
    room_leafs: Vec<NodeId>,
    pub(super) portals: Vec<Portal>,
    pub(super) teleports: Vec<Teleport>,
    tile_size: f32,
}

impl MapData {
    /// Carve the full tile grid into the partition tree. Settings are
    /// assumed validated by the caller.
    pub(super) fn generate(
        settings: &GenerationSettings,
        rng: &mut SmallRng,
    ) -> Result<Self, GenerationError> {
        let mut map = MapData {
            nodes: Vec::new(),
            parents: Vec::new(),
            room_leafs: Vec::new(),
            portals: Vec::new(),
            teleports: Vec::new(),
            tile_size: settings.tile_size,
        };

        let full = TileArea::new(0, 0, settings.tile_count - 1, settings.tile_count - 1);
        map.partition(full, 0, settings, rng)?;

        if map.room_leafs.is_empty() {
            return Err(GenerationError::EmptyLeafList);
        }
        debug!(
            "partitioned {} nodes, {} room leaves",
            map.nodes.len(),
            map.room_leafs.len()
        );
        Ok(map)
    }

    fn push(&mut self, node: BspNode) -> NodeId {
        self.nodes.push(node);
        self.parents.push(None);
        self.nodes.len() - 1
    }

    fn partition(
        &mut self,
        area: TileArea,
        depth: u32,
        settings: &GenerationSettings,
        rng: &mut SmallRng,
    ) -> Result<NodeId, GenerationError> {
        if area.width() < settings.min_tile_count || area.height() < settings.min_tile_count {
            return Ok(self.push(BspNode::Empty { area }));
        }

        // A single tile can't split no matter what the depth rules want
        let unsplittable = area.width() < 2 && area.height() < 2;
        if unsplittable || self.can_be_room(&area, depth, settings, rng) {
            let room = self.build_room(area, settings, rng)?;
            let id = self.push(BspNode::Room(room));
            self.room_leafs.push(id);
            return Ok(id);
        }

        // Split axis alternates with depth; a degenerate extent falls back
        // to the other axis (never both: a lone tile stopped above).
        let prefer = if depth % 2 == 0 {
            SplitAxis::Vertical
        } else {
            SplitAxis::Horizontal
        };
        let axis = match prefer {
            SplitAxis::Vertical if area.width() < 2 => SplitAxis::Horizontal,
            SplitAxis::Horizontal if area.height() < 2 => SplitAxis::Vertical,
            other => other,
        };

        let (split, first, second) = match axis {
            SplitAxis::Vertical => {
                let split = rng.gen_range(area.x0..area.x1);
                (
                    split,
                    TileArea::new(area.x0, area.y0, split, area.y1),
                    TileArea::new(split + 1, area.y0, area.x1, area.y1),
                )
            }
            SplitAxis::Horizontal => {
                let split = rng.gen_range(area.y0..area.y1);
                (
                    split,
                    TileArea::new(area.x0, area.y0, area.x1, split),
                    TileArea::new(area.x0, split + 1, area.x1, area.y1),
                )
            }
        };

        let a = self.partition(first, depth + 1, settings, rng)?;
        let b = self.partition(second, depth + 1, settings, rng)?;
        let id = self.push(BspNode::Wall {
            area,
            axis,
            split,
            children: [a, b],
        });
        self.parents[a] = Some(id);
        self.parents[b] = Some(id);
        Ok(id)
    }

    /// The stop/split decision. Keep-splitting conditions win over
    /// must-stop conditions, so an oversized area keeps shrinking even past
    /// the depth cap (each split strictly shrinks, so this terminates).
    fn can_be_room(
        &self,
        area: &TileArea,
        depth: u32,
        settings: &GenerationSettings,
        rng: &mut SmallRng,
    ) -> bool {
        if depth < settings.min_depth
            || area.width() > settings.max_tile_count
            || area.height() > settings.max_tile_count
        {
            return false;
        }
        if depth >= settings.max_depth
            || area.width() <= settings.min_tile_count
            || area.height() <= settings.min_tile_count
        {
            return true;
        }
        rng.gen_bool(settings.prob_room as f64)
    }

    fn build_room(
        &self,
        area: TileArea,
        settings: &GenerationSettings,
        rng: &mut SmallRng,
    ) -> Result<RoomNode, GenerationError> {
        let leaf = self.room_leafs.len();
        let profile = roll_profile(rng);
        let pillars = scatter_pillars(leaf, &area, profile, settings, rng)?;
        Ok(RoomNode {
            leaf,
            area,
            profile,
            pillars,
            segments: Vec::new(),
        })
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &BspNode {
        &self.nodes[id]
    }

    #[inline]
    pub(super) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents[id]
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    #[inline]
    pub fn room_count(&self) -> usize {
        self.room_leafs.len()
    }

    pub fn room(&self, leaf: RoomId) -> &RoomNode {
        match &self.nodes[self.room_leafs[leaf]] {
            BspNode::Room(room) => room,
            _ => unreachable!("leaf registry holds only Room nodes"),
        }
    }

    pub(super) fn room_mut(&mut self, leaf: RoomId) -> &mut RoomNode {
        match &mut self.nodes[self.room_leafs[leaf]] {
            BspNode::Room(room) => room,
            _ => unreachable!("leaf registry holds only Room nodes"),
        }
    }

    #[inline]
    pub(super) fn leaf_node_id(&self, leaf: RoomId) -> NodeId {
        self.room_leafs[leaf]
    }

    pub fn rooms(&self) -> impl Iterator<Item = &RoomNode> {
        self.room_leafs.iter().map(|&id| match &self.nodes[id] {
            BspNode::Room(room) => room,
            _ => unreachable!("leaf registry holds only Room nodes"),
        })
    }

    /// The room containing a world position. Linear scan; the leaf count
    /// is small and this runs a handful of times per tick.
    pub fn leaf_at(&self, p: Vec2) -> Option<RoomId> {
        self.rooms()
            .find(|room| room.area.contains_point(p, self.tile_size))
            .map(|room| room.leaf)
    }

    /// Walk ancestors of both leaves to their lowest common Wall node,
    /// the only valid home for a portal between them.
    pub(super) fn lowest_common_wall(&self, a: RoomId, b: RoomId) -> Option<NodeId> {
        let mut a_chain = Vec::with_capacity(16);
        let mut cursor = Some(self.room_leafs[a]);
        while let Some(id) = cursor {
            a_chain.push(id);
            cursor = self.parents[id];
        }
        let mut cursor = self.parents[self.room_leafs[b]];
        while let Some(id) = cursor {
            if a_chain.contains(&id) {
                return match self.nodes[id] {
                    BspNode::Wall { .. } => Some(id),
                    _ => None,
                };
            }
            cursor = self.parents[id];
        }
        None
    }

    /// Which edge of `leaf` a portal sits on, and the boundary cell it
    /// occupies.
    pub(super) fn portal_side(&self, portal: &Portal, leaf: RoomId) -> (EdgeDir, i32, i32) {
        let BspNode::Wall { axis, split, .. } = self.nodes[portal.wall] else {
            unreachable!("portals are homed on Wall nodes");
        };
        let area = self.room(leaf).area;
        match axis {
            SplitAxis::Vertical => {
                if area.x1 <= split {
                    (EdgeDir::East, area.x1, portal.position)
                } else {
                    (EdgeDir::West, area.x0, portal.position)
                }
            }
            SplitAxis::Horizontal => {
                if area.y1 <= split {
                    (EdgeDir::North, portal.position, area.y1)
                } else {
                    (EdgeDir::South, portal.position, area.y0)
                }
            }
        }
    }

    /// World-space centre of a tile.
    #[inline]
    pub fn tile_center(&self, x: i32, y: i32) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5) * self.tile_size,
            (y as f32 + 0.5) * self.tile_size,
        )
    }

    /// A uniformly drawn tile of the room that holds no pillar.
    ///
    /// Rejection sampled with a bounded budget; running dry means the map
    /// is unusable for this seed and generation fails hard.
    pub(super) fn free_tile_in(
        &self,
        leaf: RoomId,
        rng: &mut SmallRng,
    ) -> Result<(i32, i32), GenerationError> {
        let room = self.room(leaf);
        let mut attempts = FREE_TILE_ATTEMPTS * room.area.tile_count().max(1) as usize;
        loop {
            if attempts == 0 {
                return Err(GenerationError::NoFreeTile { room: leaf });
            }
            attempts -= 1;
            let x = rng.gen_range(room.area.x0..=room.area.x1);
            let y = rng.gen_range(room.area.y0..=room.area.y1);
            if !room.pillars.contains(&(x, y)) {
                return Ok((x, y));
            }
        }
    }

    /// Per-room collision boundaries. The slice is empty until segment
    /// derivation has run.
    #[inline]
    pub fn segments_of(&self, leaf: RoomId) -> &[CollisionSegment] {
        &self.room(leaf).segments
    }
}

#[cfg(test)]
impl MapData {
    /// Hand-built fixture for connectivity and collision tests.
    pub(crate) fn synthetic(
        nodes: Vec<BspNode>,
        parents: Vec<Option<NodeId>>,
        room_leafs: Vec<NodeId>,
        tile_size: f32,
    ) -> Self {
        MapData {
            nodes,
            parents,
            room_leafs,
            portals: Vec::new(),
            teleports: Vec::new(),
            tile_size,
        }
    }
}

fn scatter_pillars(
    leaf: RoomId,
    area: &TileArea,
    profile: usize,
    settings: &GenerationSettings,
    rng: &mut SmallRng,
) -> Result<Vec<(i32, i32)>, GenerationError> {
    let scale = ROOM_PROFILES[profile].pillar_scale;
    // Pillars keep off boundary cells so no doorway can be blocked.
    if scale <= 0.0 || area.width() <= 2 || area.height() <= 2 {
        return Ok(Vec::new());
    }
    let density = rng.gen_range(settings.pillar_density[0]..=settings.pillar_density[1]) * scale;
    let count = (area.tile_count() as f32 * density).round() as usize;

    let mut cells: Vec<(i32, i32)> = Vec::with_capacity(count);
    let mut attempts = count * FREE_TILE_ATTEMPTS;
    while cells.len() < count {
        if attempts == 0 {
            return Err(GenerationError::NoFreeTile { room: leaf });
        }
        attempts -= 1;
        let x = rng.gen_range(area.x0 + 1..=area.x1 - 1);
        let y = rng.gen_range(area.y0 + 1..=area.y1 - 1);
        if !cells.contains(&(x, y)) {
            cells.push((x, y));
        }
    }
    Ok(cells)
}
