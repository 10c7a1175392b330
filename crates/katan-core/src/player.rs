//! Player state and development cards.
//!
//! This module contains:
//! - Player struct with resources, available pieces, points and cards
//! - Development card types and deck management
//! - Building costs

use crate::board::PlayerId;
use crate::ledger::ResourceLedger;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Settlements each player may place over a game
pub const SETTLEMENTS_PER_PLAYER: u32 = 5;
/// Cities each player may place over a game
pub const CITIES_PER_PLAYER: u32 = 4;
/// Roads each player may place over a game
pub const ROADS_PER_PLAYER: u32 = 15;

/// Development card types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DevelopmentCard {
    /// Move robber and steal
    Knight,
    /// Take all of one resource from every other player
    Monopoly,
    /// Take any 2 resources from the bank
    YearOfPlenty,
    /// Build 2 roads for free
    RoadBuilding,
    /// Worth 1 point once revealed
    VictoryPoint,
}

impl DevelopmentCard {
    /// Create the standard development card deck (25 cards)
    pub fn standard_deck() -> Vec<DevelopmentCard> {
        let mut deck = Vec::with_capacity(25);
        deck.extend(std::iter::repeat(DevelopmentCard::Knight).take(14));
        deck.extend(std::iter::repeat(DevelopmentCard::VictoryPoint).take(5));
        deck.extend(std::iter::repeat(DevelopmentCard::RoadBuilding).take(2));
        deck.extend(std::iter::repeat(DevelopmentCard::YearOfPlenty).take(2));
        deck.extend(std::iter::repeat(DevelopmentCard::Monopoly).take(2));
        deck
    }

    /// The standard deck in random order
    pub fn shuffled_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<DevelopmentCard> {
        let mut deck = Self::standard_deck();
        deck.shuffle(rng);
        deck
    }

    /// Whether the card stays face up in the played pile after use
    pub fn stays_after_play(&self) -> bool {
        matches!(self, DevelopmentCard::Knight | DevelopmentCard::VictoryPoint)
    }

    /// Victory-point cards skip the buy-turn wait and the per-turn limit
    pub fn is_victory_point(&self) -> bool {
        matches!(self, DevelopmentCard::VictoryPoint)
    }

    /// Shared price of every development card
    pub fn cost() -> ResourceLedger {
        costs::development_card()
    }
}

/// A development card in a player's possession
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedDevelopmentCard {
    pub card: DevelopmentCard,
    pub owner: PlayerId,
    /// Turn number the card was bought in
    pub bought_in_turn: u32,
}

impl OwnedDevelopmentCard {
    /// Whether the card may be played during `turn`
    pub fn playable_in(&self, turn: u32) -> bool {
        self.card.is_victory_point() || self.bought_in_turn < turn
    }
}

/// A player in the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub resources: ResourceLedger,
    /// Number of settlements remaining to build
    pub settlements_remaining: u32,
    /// Number of cities remaining to build
    pub cities_remaining: u32,
    /// Number of roads remaining to build
    pub roads_remaining: u32,
    /// Points from buildings and revealed victory-point cards
    pub winning_points: u32,
    /// Bought and not yet played
    pub hidden_cards: Vec<OwnedDevelopmentCard>,
    /// Played cards that stay on the table
    pub played_cards: Vec<OwnedDevelopmentCard>,
}

impl Player {
    /// Create a new player
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            resources: ResourceLedger::new(),
            settlements_remaining: SETTLEMENTS_PER_PLAYER,
            cities_remaining: CITIES_PER_PLAYER,
            roads_remaining: ROADS_PER_PLAYER,
            winning_points: 0,
            hidden_cards: Vec::new(),
            played_cards: Vec::new(),
        }
    }

    /// Index of the first hidden card of this kind playable during `turn`
    pub fn playable_card(&self, card: DevelopmentCard, turn: u32) -> Option<usize> {
        self.hidden_cards
            .iter()
            .position(|c| c.card == card && c.playable_in(turn))
    }

    /// Whether any hidden card of this kind is held, regardless of when it was bought
    pub fn holds_card(&self, card: DevelopmentCard) -> bool {
        self.hidden_cards.iter().any(|c| c.card == card)
    }

    /// Move a hidden card to the played pile (or discard it) and return it
    pub fn consume_card(&mut self, index: usize) -> OwnedDevelopmentCard {
        let owned = self.hidden_cards.remove(index);
        if owned.card.stays_after_play() {
            self.played_cards.push(owned);
        }
        owned
    }

    /// Played knights on the table
    pub fn played_knights(&self) -> usize {
        self.played_cards
            .iter()
            .filter(|c| c.card == DevelopmentCard::Knight)
            .count()
    }
}

/// Building and card costs
pub mod costs {
    use crate::ledger::{Resource, ResourceLedger};

    pub fn road() -> ResourceLedger {
        ResourceLedger::one_each(&[Resource::Clay, Resource::Lumber])
    }

    pub fn settlement() -> ResourceLedger {
        ResourceLedger::one_each(&[
            Resource::Clay,
            Resource::Lumber,
            Resource::Grain,
            Resource::Wool,
        ])
    }

    pub fn city() -> ResourceLedger {
        ResourceLedger::from_pairs([(Resource::Grain, 2), (Resource::Ore, 3)])
    }

    pub fn development_card() -> ResourceLedger {
        ResourceLedger::one_each(&[Resource::Lumber, Resource::Clay, Resource::Wool])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Resource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn owned(card: DevelopmentCard, bought_in_turn: u32) -> OwnedDevelopmentCard {
        OwnedDevelopmentCard {
            card,
            owner: 0,
            bought_in_turn,
        }
    }

    #[test]
    fn test_building_costs() {
        assert_eq!(costs::road().total(), 2);
        assert_eq!(costs::settlement().total(), 4);
        assert_eq!(costs::city().total(), 5);
        assert_eq!(costs::city().get(Resource::Ore), 3);
        assert_eq!(costs::development_card().total(), 3);
        assert_eq!(costs::development_card().get(Resource::Ore), 0);
    }

    #[test]
    fn test_dev_card_deck_size() {
        let deck = DevelopmentCard::standard_deck();
        assert_eq!(deck.len(), 25);

        let knights = deck
            .iter()
            .filter(|c| matches!(c, DevelopmentCard::Knight))
            .count();
        assert_eq!(knights, 14);
    }

    #[test]
    fn test_shuffled_deck_keeps_cards() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut shuffled = DevelopmentCard::shuffled_deck(&mut rng);
        let mut standard = DevelopmentCard::standard_deck();
        let key = |c: &DevelopmentCard| *c as u8;
        shuffled.sort_by_key(key);
        standard.sort_by_key(key);
        assert_eq!(shuffled, standard);
    }

    #[test]
    fn test_new_player_pieces() {
        let player = Player::new(2);
        assert_eq!(player.settlements_remaining, 5);
        assert_eq!(player.cities_remaining, 4);
        assert_eq!(player.roads_remaining, 15);
        assert_eq!(player.winning_points, 0);
        assert!(player.resources.is_empty());
    }

    #[test]
    fn test_card_bought_this_turn_not_playable() {
        let mut player = Player::new(0);
        player.hidden_cards.push(owned(DevelopmentCard::Knight, 3));
        player.hidden_cards.push(owned(DevelopmentCard::VictoryPoint, 3));

        assert_eq!(player.playable_card(DevelopmentCard::Knight, 3), None);
        assert!(player.holds_card(DevelopmentCard::Knight));
        assert_eq!(player.playable_card(DevelopmentCard::Knight, 4), Some(0));
        assert_eq!(player.playable_card(DevelopmentCard::VictoryPoint, 3), Some(1));
    }

    #[test]
    fn test_consume_card_piles() {
        let mut player = Player::new(0);
        player.hidden_cards.push(owned(DevelopmentCard::Monopoly, 1));
        player.hidden_cards.push(owned(DevelopmentCard::Knight, 1));

        player.consume_card(0);
        assert!(player.played_cards.is_empty());

        player.consume_card(0);
        assert_eq!(player.played_knights(), 1);
        assert!(player.hidden_cards.is_empty());
    }
}
