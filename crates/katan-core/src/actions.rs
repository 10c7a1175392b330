//! Game actions that players can take.
//!
//! This module defines every operation a caller can request through
//! `Game::apply_action` and the events that result from those actions.

use crate::board::{EdgeKey, NodeId, PlayerId, TileId};
use crate::ledger::{Resource, ResourceLedger};
use serde::{Deserialize, Serialize};

/// All possible actions for the current player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameAction {
    // ==================== Turn Management ====================
    /// Start the next player's turn and roll. The robber target is only
    /// used when the roll hits the robber trigger.
    NextTurn {
        robber_tile: TileId,
        rob_from: Option<PlayerId>,
    },
    /// End your turn
    EndTurn,

    // ==================== Building Actions ====================
    /// Build a road on the edge between two nodes
    BuildRoad { from: NodeId, to: NodeId },
    /// Build a settlement at a node
    BuildSettlement { node: NodeId },
    /// Upgrade a settlement to a city
    BuildCity { node: NodeId },
    /// Buy a development card from the deck
    BuyDevelopmentCard,

    // ==================== Development Card Actions ====================
    /// Take all of one resource from every other player
    PlayMonopoly { resource: Resource },
    /// Take two resources from the bank
    PlayYearOfPlenty { first: Resource, second: Resource },
    /// Build two free roads
    PlayRoadBuilding {
        first: (NodeId, NodeId),
        second: (NodeId, NodeId),
    },
    /// Move the robber and optionally steal
    PlayKnight {
        robber_tile: TileId,
        rob_from: Option<PlayerId>,
    },
    /// Reveal a victory-point card
    PlayVictoryPoint,

    // ==================== Trading Actions ====================
    /// 3:1 at a generic harbour
    TradeGenericHarbour {
        give: [Resource; 3],
        desired: Resource,
    },
    /// 2:1 at a harbour matching `give`
    TradeSpecialHarbour { give: Resource, desired: Resource },
    /// 4:1 with the bank, no harbour needed
    TradeBasic {
        give: [Resource; 4],
        desired: Resource,
    },
}

/// Events that occur as a result of actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Dice were rolled
    DiceRolled {
        player: PlayerId,
        roll: (u8, u8),
        total: u8,
    },

    /// Resources were distributed after a dice roll
    ResourcesDistributed {
        distributions: Vec<(PlayerId, Resource, u32)>,
    },

    /// A player over the robber limit lost half their hand
    CardsDiscarded {
        player: PlayerId,
        discarded: ResourceLedger,
    },

    /// The robber was moved
    RobberMoved {
        player: PlayerId,
        from: TileId,
        to: TileId,
    },

    /// A resource was stolen
    ResourceStolen {
        thief: PlayerId,
        victim: PlayerId,
        resource: Resource,
    },

    /// A road was built
    RoadBuilt { player: PlayerId, edge: EdgeKey },

    /// A settlement was built
    SettlementBuilt { player: PlayerId, node: NodeId },

    /// A settlement was upgraded to a city
    CityBuilt { player: PlayerId, node: NodeId },

    /// A development card was purchased
    DevelopmentCardPurchased { player: PlayerId },

    /// A knight was played
    KnightPlayed { player: PlayerId },

    /// Monopoly card was played
    MonopolyPlayed {
        player: PlayerId,
        resource: Resource,
        total_taken: u32,
    },

    /// Year of plenty card was played
    YearOfPlentyPlayed {
        player: PlayerId,
        resources: (Resource, Resource),
    },

    /// Road building card was played
    RoadBuildingPlayed {
        player: PlayerId,
        roads: [EdgeKey; 2],
    },

    /// A victory-point card was revealed
    VictoryPointRevealed { player: PlayerId },

    /// Trade with the bank, with or without a harbour
    BankTradeCompleted {
        player: PlayerId,
        gave: ResourceLedger,
        received: Resource,
    },

    /// Turn ended
    TurnEnded {
        player: PlayerId,
        next_player: PlayerId,
    },

    /// The current player reached the winning threshold
    GameWon {
        player: PlayerId,
        winning_points: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_json_shape() {
        let action: GameAction =
            serde_json::from_str(r#"{"NextTurn": {"robber_tile": 10}}"#).unwrap();
        assert_eq!(
            action,
            GameAction::NextTurn {
                robber_tile: 10,
                rob_from: None
            }
        );

        let action: GameAction = serde_json::from_str(
            r#"{"TradeBasic": {"give": ["Ore", "Ore", "Wool", "Clay"], "desired": "Grain"}}"#,
        )
        .unwrap();
        assert!(matches!(action, GameAction::TradeBasic { desired: Resource::Grain, .. }));

        let action: GameAction = serde_json::from_str(r#""EndTurn""#).unwrap();
        assert_eq!(action, GameAction::EndTurn);
    }
}
