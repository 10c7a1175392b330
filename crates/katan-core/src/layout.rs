//! Board layouts and starting positions.
//!
//! This module contains:
//! - `TileSpec` / `BoardLayout`, the raw description a `Board` is built from
//! - The standard 19-tile layout with its harbours
//! - `StartingConditions`, the pieces and resources each player begins with
//! - The default four-player opening

use crate::board::{Harbour, NodeId, PlayerId, TileId};
use crate::ledger::{Resource, ResourceLedger};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Description of a single tile before validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpec {
    pub id: TileId,
    #[serde(default)]
    pub resource: Option<Resource>,
    #[serde(default)]
    pub dice_number: Option<u8>,
    /// Bordering nodes in ring order
    pub nodes: [NodeId; 6],
}

impl TileSpec {
    pub fn resource(id: TileId, resource: Resource, dice_number: u8, nodes: [NodeId; 6]) -> Self {
        Self {
            id,
            resource: Some(resource),
            dice_number: Some(dice_number),
            nodes,
        }
    }

    pub fn empty(id: TileId, nodes: [NodeId; 6]) -> Self {
        Self {
            id,
            resource: None,
            dice_number: None,
            nodes,
        }
    }
}

/// Everything needed to construct a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardLayout {
    pub tiles: Vec<TileSpec>,
    #[serde(default)]
    pub harbours: BTreeMap<NodeId, Harbour>,
    pub robber_tile: TileId,
}

impl BoardLayout {
    /// Parse a layout from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        default_layout()
    }
}

/// The standard board: 18 resource tiles around a central desert
pub fn default_layout() -> BoardLayout {
    use Resource::*;

    let tiles = vec![
        TileSpec::resource(1, Ore, 10, [11, 12, 13, 14, 15, 16]),
        TileSpec::resource(2, Wool, 2, [21, 22, 23, 24, 13, 12]),
        TileSpec::resource(3, Lumber, 9, [31, 32, 33, 34, 23, 22]),
        TileSpec::resource(4, Grain, 12, [15, 14, 43, 44, 45, 46]),
        TileSpec::resource(5, Clay, 6, [13, 24, 53, 54, 43, 14]),
        TileSpec::resource(6, Wool, 4, [23, 34, 63, 64, 54, 24]),
        TileSpec::resource(7, Clay, 10, [33, 72, 73, 74, 63, 34]),
        TileSpec::resource(8, Grain, 9, [45, 44, 83, 84, 85, 86]),
        TileSpec::resource(9, Lumber, 11, [43, 54, 93, 94, 83, 44]),
        TileSpec::empty(10, [53, 64, 103, 104, 93, 54]),
        TileSpec::resource(11, Lumber, 3, [63, 74, 113, 114, 103, 64]),
        TileSpec::resource(12, Ore, 12, [73, 122, 123, 124, 113, 74]),
        TileSpec::resource(13, Lumber, 8, [83, 94, 133, 134, 135, 84]),
        TileSpec::resource(14, Ore, 3, [93, 104, 143, 144, 133, 94]),
        TileSpec::resource(15, Grain, 4, [103, 114, 153, 154, 143, 104]),
        TileSpec::resource(16, Wool, 5, [113, 124, 163, 164, 165, 114]),
        TileSpec::resource(17, Clay, 5, [133, 144, 173, 174, 175, 134]),
        TileSpec::resource(18, Grain, 6, [143, 154, 183, 184, 173, 144]),
        TileSpec::resource(19, Wool, 11, [153, 164, 193, 194, 184, 154]),
    ];

    let harbours = [
        (122, Harbour::Generic),
        (123, Harbour::Generic),
        (183, Harbour::Generic),
        (184, Harbour::Generic),
        (174, Harbour::Generic),
        (175, Harbour::Generic),
        (21, Harbour::Specific(Grain)),
        (22, Harbour::Specific(Grain)),
        (33, Harbour::Specific(Ore)),
        (163, Harbour::Specific(Wool)),
        (164, Harbour::Specific(Wool)),
        (135, Harbour::Specific(Clay)),
        (84, Harbour::Specific(Clay)),
        (45, Harbour::Specific(Lumber)),
        (46, Harbour::Specific(Lumber)),
    ]
    .into_iter()
    .collect();

    BoardLayout {
        tiles,
        harbours,
        robber_tile: 10,
    }
}

/// Pieces and resources one player holds before the first turn
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStart {
    pub settlements: Vec<NodeId>,
    pub cities: Vec<NodeId>,
    pub roads: Vec<(NodeId, NodeId)>,
    pub resources: ResourceLedger,
}

/// Opening position for every player, in turn order.
///
/// Player ids are the positions in `players`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingConditions {
    pub players: Vec<PlayerStart>,
}

impl StartingConditions {
    /// `count` players with nothing placed
    pub fn empty(count: usize) -> Self {
        Self {
            players: vec![PlayerStart::default(); count],
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Mutable access to one player's opening, for builders and tests
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut PlayerStart> {
        self.players.get_mut(id as usize)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The standard four-player opening on `default_layout`
pub fn default_start() -> StartingConditions {
    use Resource::*;

    let player = |settlements: [NodeId; 2], roads: [(NodeId, NodeId); 2], resources: &[Resource]| {
        PlayerStart {
            settlements: settlements.to_vec(),
            cities: Vec::new(),
            roads: roads.to_vec(),
            resources: ResourceLedger::one_each(resources),
        }
    };

    StartingConditions {
        players: vec![
            player([13, 83], [(13, 24), (83, 94)], &[Grain, Lumber, Lumber]),
            player([34, 143], [(23, 34), (143, 154)], &[Ore, Grain, Grain]),
            player([43, 113], [(43, 44), (113, 74)], &[Grain, Lumber, Clay]),
            player([133, 153], [(153, 114), (133, 144)], &[Lumber, Ore, Clay]),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_shape() {
        let layout = default_layout();
        assert_eq!(layout.tiles.len(), 19);
        assert_eq!(layout.tiles.iter().filter(|t| t.resource.is_none()).count(), 1);
        assert_eq!(layout.harbours.len(), 15);
        assert_eq!(layout.robber_tile, 10);
    }

    #[test]
    fn test_default_start_resources() {
        let start = default_start();
        assert_eq!(start.player_count(), 4);
        assert_eq!(start.players[0].resources.get(Resource::Lumber), 2);
        assert_eq!(start.players[0].resources.get(Resource::Grain), 1);
        assert_eq!(start.players[1].resources.get(Resource::Grain), 2);
        assert!(start.players.iter().all(|p| p.resources.total() == 3));
    }

    #[test]
    fn test_layout_from_json() {
        let json = r#"{
            "tiles": [
                {"id": 1, "resource": "Ore", "dice_number": 8, "nodes": [1, 2, 3, 4, 5, 6]},
                {"id": 2, "nodes": [3, 2, 7, 8, 9, 10]}
            ],
            "harbours": {"7": "Generic", "1": {"Specific": "Ore"}},
            "robber_tile": 2
        }"#;

        let layout = BoardLayout::from_json(json).unwrap();
        assert_eq!(layout.tiles[1], TileSpec::empty(2, [3, 2, 7, 8, 9, 10]));
        assert_eq!(layout.harbours.get(&1), Some(&Harbour::Specific(Resource::Ore)));
        assert_eq!(layout.harbours.get(&7), Some(&Harbour::Generic));
    }

    #[test]
    fn test_starting_conditions_from_json() {
        let json = r#"{"players": [{"settlements": [13]}, {}]}"#;
        let start = StartingConditions::from_json(json).unwrap();
        assert_eq!(start.player_count(), 2);
        assert_eq!(start.players[0].settlements, vec![13]);
        assert!(start.players[1].resources.is_empty());
    }
}
