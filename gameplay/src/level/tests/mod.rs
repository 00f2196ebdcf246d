//! Scenario-level tests over generated and hand-built levels.

mod connect_tests;
mod query_tests;

use super::map_data::MapData;
use super::map_defs::{BspNode, RoomNode, SplitAxis, TileArea};

fn room_node(leaf: usize, area: TileArea) -> BspNode {
    BspNode::Room(RoomNode {
        leaf,
        area,
        profile: 0,
        pillars: Vec::new(),
        segments: Vec::new(),
    })
}

/// Two 4×4 rooms split by one vertical wall, sharing the full edge at
/// tile columns 3/4.
fn two_room_map() -> MapData {
    let nodes = vec![
        room_node(0, TileArea::new(0, 0, 3, 3)),
        room_node(1, TileArea::new(4, 0, 7, 3)),
        BspNode::Wall {
            area: TileArea::new(0, 0, 7, 3),
            axis: SplitAxis::Vertical,
            split: 3,
            children: [0, 1],
        },
    ];
    MapData::synthetic(nodes, vec![Some(2), Some(2), None], vec![0, 1], 2.0)
}

/// Rooms A and B adjacent, room C cut off from both by dead space.
fn split_map() -> MapData {
    let nodes = vec![
        // 0,1: A|B pair on the bottom band
        room_node(0, TileArea::new(0, 0, 3, 3)),
        room_node(1, TileArea::new(4, 0, 7, 3)),
        BspNode::Wall {
            area: TileArea::new(0, 0, 7, 3),
            axis: SplitAxis::Vertical,
            split: 3,
            children: [0, 1],
        },
        // 3: dead band between the pair and C
        BspNode::Empty {
            area: TileArea::new(0, 4, 7, 7),
        },
        BspNode::Wall {
            area: TileArea::new(0, 0, 7, 7),
            axis: SplitAxis::Horizontal,
            split: 3,
            children: [2, 3],
        },
        // 5: room C, 6: dead corner beside it
        room_node(2, TileArea::new(0, 8, 3, 11)),
        BspNode::Empty {
            area: TileArea::new(4, 8, 7, 11),
        },
        BspNode::Wall {
            area: TileArea::new(0, 8, 7, 11),
            axis: SplitAxis::Vertical,
            split: 3,
            children: [5, 6],
        },
        BspNode::Wall {
            area: TileArea::new(0, 0, 7, 11),
            axis: SplitAxis::Horizontal,
            split: 7,
            children: [4, 7],
        },
    ];
    let parents = vec![
        Some(2),
        Some(2),
        Some(4),
        Some(4),
        Some(8),
        Some(7),
        Some(7),
        Some(8),
        None,
    ];
    MapData::synthetic(nodes, parents, vec![0, 1, 5], 2.0)
}
