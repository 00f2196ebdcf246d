//! Core of a first-person dungeon crawler: procedural level topology,
//! doorway/teleport connectivity, per-room collision, and the movement
//! and raycast queries the rest of the game runs against it.
//!
//! A level is generated in one synchronous call and is immutable
//! afterwards apart from portal/teleport open flags. Rendering, audio,
//! input and entity behaviour all live elsewhere and consume this crate
//! through [`Level`]'s query surface.

pub mod level;
pub mod play;

pub use glam;
pub use log;

pub use level::map_data::MapData;
pub use level::map_defs::{
    BspNode, CollisionSegment, EdgeDir, NodeId, Portal, ROOM_PROFILES, RoomId, RoomNode,
    RoomProfile, SegKind, SplitAxis, Teleport, TileArea,
};
pub use level::{GenerationError, GenerationSettings, Level, PortalCell, RoomGeometry};
pub use play::{MAX_PORTAL_CROSSINGS, MAX_SLIDE_ITERATIONS, RayHit};
