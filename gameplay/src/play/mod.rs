//! Runtime consumers of a finalized level: movement resolution and the
//! raycasts gameplay is built on. Everything here reads the level
//! immutably; the per-tick cadence and portal toggling between ticks are
//! the caller's contract.

pub mod movement;
pub mod raycast;

pub use movement::{MAX_SLIDE_ITERATIONS, move_and_slide};
pub use raycast::{MAX_PORTAL_CROSSINGS, RayHit, ray_hits_thing};
