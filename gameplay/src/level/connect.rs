//! Doorway and shortcut placement over the generated leaves.
//!
//! Runs after partitioning and before collision-segment derivation: wall
//! runs must be split around the doorway cells decided here. Guarantees
//! that every room can reach every other through portals and teleports.

use log::{debug, info};
use rand::Rng;
use rand::rngs::SmallRng;

use super::GenerationError;
use super::map_data::MapData;
use super::map_defs::{Portal, RoomId, Teleport};

/// Place portals and teleports, then verify full reachability.
pub(super) fn build_connectivity(
    map: &mut MapData,
    rng: &mut SmallRng,
) -> Result<(), GenerationError> {
    let adjacency = place_portals(map, rng)?;
    let components = connected_components(map.room_count(), &adjacency);
    if components.groups > 1 {
        bridge_components(map, &components, rng)?;
    }
    verify_reachability(map)?;
    info!(
        "connected {} rooms with {} portals, {} teleports ({} components bridged)",
        map.room_count(),
        map.portals.len(),
        map.teleports.len(),
        components.groups
    );
    Ok(())
}

/// Symmetric adjacency over all unordered leaf pairs; one portal per
/// adjacent pair, homed on the pair's lowest common Wall ancestor.
fn place_portals(map: &mut MapData, rng: &mut SmallRng) -> Result<Vec<bool>, GenerationError> {
    let n = map.room_count();
    let mut adjacency = vec![false; n * n];

    for a in 0..n {
        for b in (a + 1)..n {
            let Some(edge) = map.room(a).area.shared_edge(&map.room(b).area) else {
                continue;
            };
            adjacency[a * n + b] = true;
            adjacency[b * n + a] = true;

            let wall = map
                .lowest_common_wall(a, b)
                .ok_or(GenerationError::NoWallAncestor { rooms: [a, b] })?;
            let position = rng.gen_range(edge.lo..=edge.hi);
            debug!("portal {a}<->{b} on wall {wall} at {position}");
            map.portals.push(Portal {
                wall,
                rooms: [a, b],
                position,
                open: false,
            });
        }
    }
    Ok(adjacency)
}

struct Components {
    /// Group id per leaf.
    of: Vec<usize>,
    groups: usize,
}

/// Breadth-first flood over the adjacency matrix.
fn connected_components(n: usize, adjacency: &[bool]) -> Components {
    let mut of = vec![usize::MAX; n];
    let mut groups = 0;
    let mut queue = Vec::with_capacity(n);

    for start in 0..n {
        if of[start] != usize::MAX {
            continue;
        }
        of[start] = groups;
        queue.push(start);
        while let Some(room) = queue.pop() {
            for other in 0..n {
                if adjacency[room * n + other] && of[other] == usize::MAX {
                    of[other] = groups;
                    queue.push(other);
                }
            }
        }
        groups += 1;
    }
    Components { of, groups }
}

/// Chain disjoint groups together: one teleport between group `i-1` and
/// group `i`, preferring rooms not already carrying a teleport so the
/// links spread instead of stacking on one room.
fn bridge_components(
    map: &mut MapData,
    components: &Components,
    rng: &mut SmallRng,
) -> Result<(), GenerationError> {
    for group in 1..components.groups {
        let from = pick_representative(map, components, group - 1);
        let to = pick_representative(map, components, group);
        let from_tile = map.free_tile_in(from, rng)?;
        let to_tile = map.free_tile_in(to, rng)?;
        debug!("teleport {from}<->{to} bridging group {} to {group}", group - 1);
        map.teleports.push(Teleport {
            rooms: [from, to],
            positions: [
                map.tile_center(from_tile.0, from_tile.1),
                map.tile_center(to_tile.0, to_tile.1),
            ],
            open: false,
        });
    }
    Ok(())
}

fn pick_representative(map: &MapData, components: &Components, group: usize) -> RoomId {
    let members = || {
        components
            .of
            .iter()
            .enumerate()
            .filter(move |&(_, &g)| g == group)
            .map(|(leaf, _)| leaf)
    };
    members()
        .find(|&leaf| !map.teleports.iter().any(|t| t.rooms.contains(&leaf)))
        .unwrap_or_else(|| {
            members()
                .next()
                .expect("every component has at least one member")
        })
}

/// Post-generation diagnostic: a leaf with no portal and no teleport, or
/// any unreachable leaf, is a defect: the map is unusable for this seed.
fn verify_reachability(map: &MapData) -> Result<(), GenerationError> {
    let n = map.room_count();
    if n <= 1 {
        return Ok(());
    }

    for leaf in 0..n {
        let linked = map.portals.iter().any(|p| p.rooms.contains(&leaf))
            || map.teleports.iter().any(|t| t.rooms.contains(&leaf));
        if !linked {
            return Err(GenerationError::OrphanRoom { room: leaf });
        }
    }

    let mut seen = vec![false; n];
    let mut queue = vec![0usize];
    seen[0] = true;
    while let Some(room) = queue.pop() {
        let neighbours = map
            .portals
            .iter()
            .map(|p| p.rooms)
            .chain(map.teleports.iter().map(|t| t.rooms))
            .filter_map(|rooms| match rooms {
                [a, b] if a == room => Some(b),
                [a, b] if b == room => Some(a),
                _ => None,
            });
        for next in neighbours {
            if !seen[next] {
                seen[next] = true;
                queue.push(next);
            }
        }
    }
    match seen.iter().position(|&s| !s) {
        Some(unreached) => Err(GenerationError::Disconnected { room: unreached }),
        None => Ok(()),
    }
}
