use argh::FromArgs;
use gameplay::log;

/// CLI options for the level tool
#[derive(Debug, Clone, FromArgs)]
pub struct CliOptions {
    /// verbose level: off, error, warn, info, debug
    #[argh(option)]
    pub verbose: Option<log::LevelFilter>,
    /// generation seed
    #[argh(option)]
    pub seed: Option<u64>,
    /// map extent in tiles per side
    #[argh(option)]
    pub tile_count: Option<i32>,
    /// chance an eligible region stops splitting and becomes a room, 0.0-1.0
    #[argh(option)]
    pub prob_room: Option<f32>,
    /// print an ascii top-down dump of the generated floor
    #[argh(switch)]
    pub dump: bool,
    /// open every doorway and teleport before reporting
    #[argh(switch)]
    pub open_all: bool,
}
