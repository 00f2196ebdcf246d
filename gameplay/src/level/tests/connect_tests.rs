use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::{split_map, two_room_map};
use crate::level::connect::build_connectivity;
use crate::level::{GenerationSettings, Level};

fn settings(seed: u64) -> GenerationSettings {
    GenerationSettings {
        seed,
        tile_count: 32,
        min_tile_count: 3,
        max_tile_count: 8,
        min_depth: 2,
        max_depth: 8,
        prob_room: 0.4,
        pillar_density: [0.0, 0.02],
        tile_size: 2.0,
        actor_radius: 0.4,
    }
}

#[test]
fn adjacent_pair_gets_exactly_one_portal() {
    let mut positions = Vec::new();
    for seed in 0..32 {
        let mut map = two_room_map();
        let mut rng = SmallRng::seed_from_u64(seed);
        build_connectivity(&mut map, &mut rng).unwrap();

        assert_eq!(map.portals.len(), 1);
        assert!(map.teleports.is_empty());
        let portal = &map.portals[0];
        assert_eq!(portal.rooms, [0, 1]);
        // Homed on the one wall both leaves hang off
        assert_eq!(portal.wall, 2);
        assert!(!portal.open);
        // Position drawn within the shared span
        assert!((0..=3).contains(&portal.position));
        positions.push(portal.position);
    }
    // The draw is uniform over the span, not pinned to one cell
    positions.sort_unstable();
    positions.dedup();
    assert!(positions.len() > 1);
}

#[test]
fn isolated_room_bridged_by_single_teleport() {
    let mut map = split_map();
    let mut rng = SmallRng::seed_from_u64(11);
    build_connectivity(&mut map, &mut rng).unwrap();

    // A-B keep their doorway; C gets exactly one shortcut to the pair
    assert_eq!(map.portals.len(), 1);
    assert_eq!(map.portals[0].rooms, [0, 1]);
    assert_eq!(map.teleports.len(), 1);

    let teleport = &map.teleports[0];
    assert!(teleport.rooms.contains(&2));
    assert!(teleport.rooms[0] == 0 || teleport.rooms[0] == 1);
    assert!(!teleport.open);

    // Each landing point sits inside its own room
    for (room, pos) in teleport.rooms.iter().zip(teleport.positions) {
        assert_eq!(map.leaf_at(pos), Some(*room));
    }
}

#[test]
fn no_portal_between_corner_touching_rooms() {
    // C touches nothing; its closest approach to B is across dead space.
    // Adjacency must come only from shared edges of length >= 1.
    let mut map = split_map();
    let mut rng = SmallRng::seed_from_u64(5);
    build_connectivity(&mut map, &mut rng).unwrap();
    for portal in &map.portals {
        assert!(!portal.rooms.contains(&2));
    }
}

#[test]
fn portal_set_matches_geometric_adjacency() {
    for seed in [1, 17, 92] {
        let level = Level::generate(settings(seed)).unwrap();
        let rooms: Vec<_> = level.rooms().collect();
        for a in 0..rooms.len() {
            for b in (a + 1)..rooms.len() {
                let adjacent = rooms[a].area.shared_edge(&rooms[b].area).is_some();
                let portals = level
                    .portals()
                    .iter()
                    .filter(|p| p.rooms == [a, b])
                    .count();
                assert_eq!(
                    portals,
                    adjacent as usize,
                    "rooms {a}/{b} adjacency and portal count disagree (seed {seed})"
                );
            }
        }
    }
}

#[test]
fn generated_levels_fully_reachable() {
    for seed in 0..16 {
        let level = Level::generate(settings(seed)).unwrap();
        let n = level.rooms().count();
        let mut seen = vec![false; n];
        seen[0] = true;
        let mut queue = vec![0usize];
        while let Some(room) = queue.pop() {
            let links = level
                .portals()
                .iter()
                .map(|p| p.rooms)
                .chain(level.teleports().iter().map(|t| t.rooms));
            for [a, b] in links {
                let next = if a == room {
                    b
                } else if b == room {
                    a
                } else {
                    continue;
                };
                if !seen[next] {
                    seen[next] = true;
                    queue.push(next);
                }
            }
        }
        assert!(
            seen.iter().all(|&s| s),
            "seed {seed} left rooms unreachable"
        );
    }
}
