//! The data that makes up a generated level, and the queries gameplay
//! runs against it.
//!
//! A level is a pure function of its settings: generation either fully
//! completes or fails, and the result is topologically immutable; the
//! only runtime mutation is opening portals and teleports.

mod connect;
pub mod map_data;
pub mod map_defs;
mod segments;
#[cfg(test)]
mod tests;

use std::error::Error;
use std::fmt;
use std::time::Instant;

use glam::Vec2;
use log::info;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use map_data::MapData;
use map_defs::{EdgeDir, Portal, ROOM_PROFILES, RoomId, RoomNode, RoomProfile, Teleport, TileArea};

/// Everything the generator needs, and the one artifact worth persisting:
/// the same settings always rebuild the same level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub seed: u64,
    /// The map is `tile_count × tile_count` tiles.
    pub tile_count: i32,
    /// Minimum room extent per axis; anything smaller becomes dead space.
    pub min_tile_count: i32,
    /// Maximum room extent per axis; larger regions must keep splitting.
    pub max_tile_count: i32,
    pub min_depth: u32,
    pub max_depth: u32,
    /// Chance an eligible region stops splitting and becomes a room.
    pub prob_room: f32,
    /// Pillar count per room is area × a draw from this range, scaled by
    /// the room profile.
    pub pillar_density: [f32; 2],
    /// World units per tile.
    pub tile_size: f32,
    /// Widest collider that must fit through a one-tile doorway.
    pub actor_radius: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        GenerationSettings {
            seed: 0,
            tile_count: 48,
            min_tile_count: 4,
            max_tile_count: 12,
            min_depth: 3,
            max_depth: 8,
            prob_room: 0.35,
            pillar_density: [0.01, 0.05],
            tile_size: 2.0,
            actor_radius: 0.45,
        }
    }
}

impl GenerationSettings {
    /// Reject impossible inputs before any tile is touched; a bad
    /// combination must never surface halfway through a recursion.
    pub fn validate(&self) -> Result<(), GenerationError> {
        let fail = |msg: String| Err(GenerationError::Settings(msg));

        if self.min_tile_count < 1 {
            return fail(format!("min_tile_count {} below 1", self.min_tile_count));
        }
        if self.min_tile_count > self.max_tile_count {
            return fail(format!(
                "min_tile_count {} exceeds max_tile_count {}",
                self.min_tile_count, self.max_tile_count
            ));
        }
        if self.tile_count < self.min_tile_count {
            return fail(format!(
                "tile_count {} smaller than the minimum room extent {}",
                self.tile_count, self.min_tile_count
            ));
        }
        if self.min_depth > self.max_depth {
            return fail(format!(
                "min_depth {} exceeds max_depth {}",
                self.min_depth, self.max_depth
            ));
        }
        if !(0.0..=1.0).contains(&self.prob_room) {
            return fail(format!("prob_room {} outside [0,1]", self.prob_room));
        }
        if self.pillar_density[0] < 0.0 || self.pillar_density[0] > self.pillar_density[1] {
            return fail(format!(
                "pillar_density range [{}, {}] is invalid",
                self.pillar_density[0], self.pillar_density[1]
            ));
        }
        if self.tile_size <= 0.0 {
            return fail(format!("tile_size {} must be positive", self.tile_size));
        }
        if self.actor_radius <= 0.0 || self.actor_radius * 2.0 >= self.tile_size {
            return fail(format!(
                "actor_radius {} cannot pass a {}-unit doorway",
                self.actor_radius, self.tile_size
            ));
        }
        // Each axis halves at best every other depth step; if even median
        // splits cannot bring the grid under the room maximum, the depth
        // budget can never be satisfied.
        let mut extent = self.tile_count;
        for _ in 0..self.max_depth / 2 {
            extent = (extent + 1) / 2;
        }
        if extent > self.max_tile_count {
            return fail(format!(
                "max_depth {} cannot reduce a {}-tile grid to rooms of at most {} tiles",
                self.max_depth, self.tile_count, self.max_tile_count
            ));
        }
        Ok(())
    }
}

/// A level that cannot be generated is unrecoverable for that seed and
/// settings; nothing here is silently patched over.
#[derive(Debug)]
pub enum GenerationError {
    /// Settings rejected before generation started.
    Settings(String),
    /// Partitioning produced no room leaves at all.
    EmptyLeafList,
    /// Rejection sampling could not find an unoccupied tile.
    NoFreeTile { room: RoomId },
    /// Two adjacent rooms without a common Wall ancestor; the tree is
    /// malformed.
    NoWallAncestor { rooms: [RoomId; 2] },
    /// A room ended up with no portal and no teleport.
    OrphanRoom { room: RoomId },
    /// A room is unreachable even through teleports.
    Disconnected { room: RoomId },
}

impl Error for GenerationError {}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Settings(msg) => write!(f, "invalid settings: {}", msg),
            GenerationError::EmptyLeafList => write!(f, "partitioning produced no rooms"),
            GenerationError::NoFreeTile { room } => {
                write!(f, "no free tile found in room {}", room)
            }
            GenerationError::NoWallAncestor { rooms } => {
                write!(f, "rooms {} and {} share no wall ancestor", rooms[0], rooms[1])
            }
            GenerationError::OrphanRoom { room } => {
                write!(f, "room {} has no portal or teleport", room)
            }
            GenerationError::Disconnected { room } => {
                write!(f, "room {} is unreachable", room)
            }
        }
    }
}

/// A doorway cell on a room's boundary, as the renderer needs it.
#[derive(Debug, Clone, Copy)]
pub struct PortalCell {
    pub dir: EdgeDir,
    pub x: i32,
    pub y: i32,
    pub open: bool,
    pub to_room: RoomId,
}

/// Read-only per-room geometry for mesh building. Borrows the level, so
/// renderer workers can take these concurrently once generation is done.
#[derive(Debug)]
pub struct RoomGeometry<'a> {
    pub room: RoomId,
    pub area: TileArea,
    pub world_min: Vec2,
    pub world_max: Vec2,
    pub profile: &'static RoomProfile,
    pub pillars: &'a [(i32, i32)],
    pub portal_cells: Vec<PortalCell>,
    pub teleport_pads: Vec<Vec2>,
}

/// One generated dungeon floor.
pub struct Level {
    pub map_data: MapData,
    settings: GenerationSettings,
}

impl Level {
    /// Build a complete level from settings. Runs the full pipeline of
    /// partition, connectivity, collision segments and reachability check,
    /// and only hands back a level that passed all of it.
    pub fn generate(settings: GenerationSettings) -> Result<Level, GenerationError> {
        settings.validate()?;
        let start = Instant::now();

        let mut rng = SmallRng::seed_from_u64(settings.seed);
        let mut map_data = MapData::generate(&settings, &mut rng)?;
        connect::build_connectivity(&mut map_data, &mut rng)?;
        segments::derive_segments(&mut map_data);

        info!(
            "level ready: seed {}, {} rooms, {:.1?}",
            settings.seed,
            map_data.room_count(),
            start.elapsed()
        );
        Ok(Level { map_data, settings })
    }

    #[cfg(test)]
    pub(crate) fn from_parts(map_data: MapData, settings: GenerationSettings) -> Level {
        Level { map_data, settings }
    }

    #[inline]
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Room leaves in leaf-index order.
    #[inline]
    pub fn rooms(&self) -> impl Iterator<Item = &RoomNode> {
        self.map_data.rooms()
    }

    /// The room containing a world position, if any.
    #[inline]
    pub fn leaf_at(&self, p: Vec2) -> Option<RoomId> {
        self.map_data.leaf_at(p)
    }

    #[inline]
    pub fn portals(&self) -> &[Portal] {
        &self.map_data.portals
    }

    #[inline]
    pub fn teleports(&self) -> &[Teleport] {
        &self.map_data.teleports
    }

    /// A spawn point on a pillar-free tile of the room, or `None` if the
    /// handle is stale or the room is packed solid.
    pub fn random_position_in(&self, room: RoomId, rng: &mut SmallRng) -> Option<Vec2> {
        if room >= self.map_data.room_count() {
            return None;
        }
        self.map_data
            .free_tile_in(room, rng)
            .ok()
            .map(|(x, y)| self.map_data.tile_center(x, y))
    }

    /// Open (or close) every portal and teleport touching the room.
    ///
    /// Both sides of each doorway flip together; applying the same state
    /// twice is a no-op. Intended to run between update ticks.
    pub fn toggle_room_portals(&mut self, room: RoomId, open: bool) {
        for idx in 0..self.map_data.portals.len() {
            if self.map_data.portals[idx].rooms.contains(&room)
                && self.map_data.portals[idx].open != open
            {
                segments::set_portal_state(&mut self.map_data, idx, open);
            }
        }
        for teleport in &mut self.map_data.teleports {
            if teleport.rooms.contains(&room) {
                teleport.open = open;
            }
        }
    }

    /// Everything a renderer worker needs to mesh one room.
    pub fn room_geometry(&self, room: RoomId) -> RoomGeometry<'_> {
        let data = self.map_data.room(room);
        let ts = self.map_data.tile_size();
        let portal_cells = self
            .map_data
            .portals
            .iter()
            .filter(|p| p.rooms.contains(&room))
            .map(|p| {
                let (dir, x, y) = self.map_data.portal_side(p, room);
                let to_room = if p.rooms[0] == room { p.rooms[1] } else { p.rooms[0] };
                PortalCell {
                    dir,
                    x,
                    y,
                    open: p.open,
                    to_room,
                }
            })
            .collect();
        let teleport_pads = self
            .map_data
            .teleports
            .iter()
            .flat_map(|t| {
                t.rooms
                    .iter()
                    .zip(t.positions)
                    .filter(|&(&r, _)| r == room)
                    .map(|(_, p)| p)
            })
            .collect();

        RoomGeometry {
            room,
            area: data.area,
            world_min: Vec2::new(data.area.x0 as f32 * ts, data.area.y0 as f32 * ts),
            world_max: Vec2::new((data.area.x1 + 1) as f32 * ts, (data.area.y1 + 1) as f32 * ts),
            profile: &ROOM_PROFILES[data.profile],
            pillars: &data.pillars,
            portal_cells,
            teleport_pads,
        }
    }
}
