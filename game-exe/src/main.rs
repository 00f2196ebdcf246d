//! Floor inspection tool: generates a level from the configured settings
//! and reports what the game would build: rooms, doorways, teleports,
//! and optionally an ascii top-down dump. The game proper consumes the
//! same `gameplay` surface; this binary exists so a seed can be inspected
//! and reproduced without booting the renderer.

mod cli;
mod config;

use std::error::Error;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use simplelog::TermLogger;

use cli::CliOptions;
use config::UserConfig;
use gameplay::{Level, ROOM_PROFILES, log};

use crate::log::info;

fn main() -> Result<(), Box<dyn Error>> {
    let options: CliOptions = argh::from_env();

    TermLogger::init(
        options.verbose.unwrap_or(log::LevelFilter::Info),
        simplelog::ConfigBuilder::default()
            .set_time_level(log::LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let mut user_config = UserConfig::load();
    user_config.sync_cli(&options);
    user_config.write();

    let mut level = Level::generate(user_config.level.clone())?;
    if options.open_all {
        let rooms = level.rooms().count();
        for room in 0..rooms {
            level.toggle_room_portals(room, true);
        }
        info!("opened every doorway and teleport");
    }

    report(&level);
    if options.dump {
        print!("{}", render_ascii(&level));
    }
    Ok(())
}

fn report(level: &Level) {
    for room in level.rooms() {
        let geometry = level.room_geometry(room.leaf);
        info!(
            "room {:>2}: {:>2}x{:<2} at ({},{}) {:<10} {} pillars, {} doorways, {} pads",
            room.leaf,
            room.area.width(),
            room.area.height(),
            room.area.x0,
            room.area.y0,
            ROOM_PROFILES[room.profile].name,
            room.pillars.len(),
            geometry.portal_cells.len(),
            geometry.teleport_pads.len(),
        );
    }
    info!(
        "totals: {} rooms, {} portals, {} teleports",
        level.rooms().count(),
        level.portals().len(),
        level.teleports().len()
    );

    let mut rng = SmallRng::seed_from_u64(level.settings().seed);
    if let Some(spawn) = level.random_position_in(0, &mut rng) {
        info!("suggested spawn: ({:.1}, {:.1}) in room 0", spawn.x, spawn.y);
    }
}

/// Top-down tile dump: `.` floor, `#` pillar, `%` teleport pad, `+`/`/`
/// closed/open doorway cell, space for dead space.
fn render_ascii(level: &Level) -> String {
    let n = level.settings().tile_count as usize;
    let ts = level.settings().tile_size;
    let mut grid = vec![vec![' '; n]; n];

    for room in level.rooms() {
        let geometry = level.room_geometry(room.leaf);
        for y in room.area.y0..=room.area.y1 {
            for x in room.area.x0..=room.area.x1 {
                grid[y as usize][x as usize] = '.';
            }
        }
        for &(px, py) in geometry.pillars {
            grid[py as usize][px as usize] = '#';
        }
        for pad in &geometry.teleport_pads {
            let (px, py) = ((pad.x / ts) as usize, (pad.y / ts) as usize);
            grid[py][px] = '%';
        }
        for cell in &geometry.portal_cells {
            grid[cell.y as usize][cell.x as usize] = if cell.open { '/' } else { '+' };
        }
    }

    let mut out = String::with_capacity(n * (n + 1));
    for row in grid.iter().rev() {
        out.extend(row.iter());
        out.push('\n');
    }
    out
}
