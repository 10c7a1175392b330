//! Core game state machine.
//!
//! This module contains the main `Game` struct and all turn, building,
//! trading and development-card rules. Every operation checks all of its
//! preconditions before touching state, so a failed call leaves the game as
//! it was. The one exception is a bad robber target on `next_turn`, which is
//! reported only after that roll's resources have been handed out.

use crate::actions::{GameAction, GameEvent};
use crate::board::{
    Board, BoardError, Building, Edge, EdgeKey, Harbour, Node, NodeId, PlayerId, Road, Tile,
    TileId,
};
use crate::config::GameConfig;
use crate::dice::{Dice, DiceRoll};
use crate::layout::{self, BoardLayout, StartingConditions};
use crate::ledger::{LedgerError, Resource, ResourceLedger};
use crate::player::{DevelopmentCard, OwnedDevelopmentCard, Player};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur when applying actions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The operation does not fit the current turn phase
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// A game rule forbids the operation
    #[error("illegal play: {0}")]
    IllegalPlay(String),

    #[error("no player with id {0}")]
    UnknownPlayer(PlayerId),

    #[error("no tile with id {0}")]
    UnknownTile(TileId),

    #[error("no node with id {0}")]
    UnknownNode(NodeId),

    #[error("no edge between nodes {0} and {1}")]
    UnknownEdge(NodeId, NodeId),

    #[error("invalid board: {0}")]
    Board(#[from] BoardError),
}

impl From<LedgerError> for GameError {
    fn from(err: LedgerError) -> Self {
        GameError::IllegalPlay(err.to_string())
    }
}

/// A rejected action, with the events it recorded before failing.
///
/// `events` is empty except when `next_turn` rejects the robber target: the
/// roll and its distribution have then already happened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct ActionError {
    pub error: GameError,
    pub events: Vec<GameEvent>,
}

fn illegal_play(reason: impl Into<String>) -> GameError {
    GameError::IllegalPlay(reason.into())
}

/// Where the game is within a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// The previous turn ended; only `next_turn` is allowed
    AwaitingNextTurn,
    /// Dice rolled; the current player may act until `end_turn`
    TurnActive,
}

/// Per-player view inside a `GameSnapshot`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub resources: ResourceLedger,
    pub winning_points: u32,
    pub settlements_remaining: u32,
    pub cities_remaining: u32,
    pub roads_remaining: u32,
    pub hidden_cards: usize,
    pub played_cards: Vec<DevelopmentCard>,
}

/// Serializable view of everything observable about a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub turn: u32,
    pub phase: TurnPhase,
    pub current_player: PlayerId,
    pub robber_tile: TileId,
    pub last_roll: Option<DiceRoll>,
    pub deck_remaining: usize,
    pub players: Vec<PlayerSnapshot>,
    pub buildings: Vec<(NodeId, Building)>,
    pub roads: Vec<(EdgeKey, PlayerId)>,
}

/// The complete game state
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    players: Vec<Player>,
    config: GameConfig,
    /// Turn counter, 0 before the first turn
    turn: u32,
    current: PlayerId,
    phase: TurnPhase,
    /// A non victory-point card was played this turn
    dev_card_played: bool,
    last_roll: Option<DiceRoll>,
    dice: Dice,
    /// Top of the deck is the last element
    deck: Vec<DevelopmentCard>,
    rng: StdRng,
    /// Events recorded since the last `apply_action`
    events: Vec<GameEvent>,
}

impl Game {
    /// Create a game and apply its starting conditions.
    ///
    /// Players are numbered by their position in `start`. The first
    /// `next_turn` goes to player 0.
    pub fn new(
        layout: &BoardLayout,
        start: &StartingConditions,
        dice: Dice,
        config: GameConfig,
    ) -> Result<Self, GameError> {
        let count = start.player_count();
        if count == 0 || count > usize::from(PlayerId::MAX) + 1 {
            return Err(GameError::IllegalState(format!(
                "a game needs between 1 and 256 players, got {count}"
            )));
        }

        let board = Board::new(layout)?;
        let mut rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let deck = DevelopmentCard::shuffled_deck(&mut rng);
        let players = (0..count).map(|id| Player::new(id as PlayerId)).collect();

        let mut game = Self {
            board,
            players,
            config,
            turn: 0,
            current: (count - 1) as PlayerId,
            phase: TurnPhase::AwaitingNextTurn,
            dev_card_played: false,
            last_roll: None,
            dice,
            deck,
            rng,
            events: Vec::new(),
        };
        game.apply_start(start)?;
        Ok(game)
    }

    /// Standard board with the default four-player opening
    pub fn new_standard_4player(dice: Dice, config: GameConfig) -> Result<Self, GameError> {
        Self::new(
            &layout::default_layout(),
            &layout::default_start(),
            dice,
            config,
        )
    }

    /// Replace the development deck; the last card is drawn first
    pub fn with_deck(mut self, deck: Vec<DevelopmentCard>) -> Self {
        self.deck = deck;
        self
    }

    fn apply_start(&mut self, start: &StartingConditions) -> Result<(), GameError> {
        for (id, opening) in start.players.iter().enumerate() {
            let id = id as PlayerId;
            for &node in &opening.settlements {
                self.place_start_building(node, Building::Settlement(id))?;
            }
            for &node in &opening.cities {
                self.place_start_building(node, Building::City(id))?;
            }
            self.players[id as usize]
                .resources
                .add_ledger(&opening.resources);
        }

        // Roads last so they can attach to any pre-placed building
        for (id, opening) in start.players.iter().enumerate() {
            for &(a, b) in &opening.roads {
                self.place_start_road(a, b, id as PlayerId)?;
            }
        }
        Ok(())
    }

    fn place_start_building(&mut self, node: NodeId, building: Building) -> Result<(), GameError> {
        if self.node(node)?.has_building() {
            return Err(illegal_play(format!("node {node} is already built on")));
        }
        if !self.board.satisfies_distance_rule(node) {
            return Err(illegal_play(format!(
                "node {node} is next to another building"
            )));
        }

        let player = &mut self.players[building.owner() as usize];
        let remaining = match building {
            Building::Settlement(_) => &mut player.settlements_remaining,
            Building::City(_) => &mut player.cities_remaining,
        };
        if *remaining == 0 {
            return Err(illegal_play(format!(
                "player {} has no pieces left for {building:?}",
                building.owner()
            )));
        }
        *remaining -= 1;

        self.place_building(node, building);
        Ok(())
    }

    fn place_start_road(&mut self, a: NodeId, b: NodeId, owner: PlayerId) -> Result<(), GameError> {
        let key = self.edge(a, b)?.key;
        if self.board.edge(a, b).is_some_and(Edge::has_road) {
            return Err(illegal_play(format!("edge {a}-{b} already has a road")));
        }
        if !self.board.edge_connects_to_network(key, owner) {
            return Err(illegal_play(format!(
                "road {a}-{b} does not connect to player {owner}'s network"
            )));
        }

        let player = &mut self.players[owner as usize];
        if player.roads_remaining == 0 {
            return Err(illegal_play(format!("player {owner} has no roads left")));
        }
        player.roads_remaining -= 1;
        self.board.set_road(key, Road::new(owner));
        Ok(())
    }

    // ==================== Accessors ====================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    pub fn robber_tile(&self) -> TileId {
        self.board.robber_tile()
    }

    pub fn last_roll(&self) -> Option<DiceRoll> {
        self.last_roll
    }

    /// Cards left in the development deck
    pub fn deck_remaining(&self) -> usize {
        self.deck.len()
    }

    /// Get a player by id
    pub fn player(&self, id: PlayerId) -> Result<&Player, GameError> {
        self.players
            .get(id as usize)
            .ok_or(GameError::UnknownPlayer(id))
    }

    pub fn tile(&self, id: TileId) -> Result<&Tile, GameError> {
        self.board.tile(id).ok_or(GameError::UnknownTile(id))
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, GameError> {
        self.board.node(id).ok_or(GameError::UnknownNode(id))
    }

    /// Get the edge between two nodes, in either order
    pub fn edge(&self, a: NodeId, b: NodeId) -> Result<&Edge, GameError> {
        self.board.edge(a, b).ok_or(GameError::UnknownEdge(a, b))
    }

    fn current_player_mut(&mut self) -> &mut Player {
        let index = self.current as usize;
        &mut self.players[index]
    }

    fn next_player_after(&self, player: PlayerId) -> PlayerId {
        ((player as usize + 1) % self.players.len()) as PlayerId
    }

    /// Whether `player` is the current player and has enough points to win
    pub fn has_won(&self, player: PlayerId) -> Result<bool, GameError> {
        let points = self.player(player)?.winning_points;
        Ok(player == self.current && points >= self.config.points_to_win)
    }

    /// Serializable view of the whole game
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            turn: self.turn,
            phase: self.phase,
            current_player: self.current,
            robber_tile: self.board.robber_tile(),
            last_roll: self.last_roll,
            deck_remaining: self.deck.len(),
            players: self
                .players
                .iter()
                .map(|p| PlayerSnapshot {
                    id: p.id,
                    resources: p.resources.clone(),
                    winning_points: p.winning_points,
                    settlements_remaining: p.settlements_remaining,
                    cities_remaining: p.cities_remaining,
                    roads_remaining: p.roads_remaining,
                    hidden_cards: p.hidden_cards.len(),
                    played_cards: p.played_cards.iter().map(|c| c.card).collect(),
                })
                .collect(),
            buildings: self
                .board
                .nodes()
                .filter_map(|n| n.building.map(|b| (n.id, b)))
                .collect(),
            roads: self
                .board
                .edges()
                .filter_map(|e| e.road_owner().map(|owner| (e.key, owner)))
                .collect(),
        }
    }

    // ==================== Action Dispatch ====================

    /// Apply an action for the current player and return what happened
    pub fn apply_action(&mut self, action: GameAction) -> Result<Vec<GameEvent>, ActionError> {
        self.events.clear();

        let result = match action {
            GameAction::NextTurn {
                robber_tile,
                rob_from,
            } => self.next_turn(robber_tile, rob_from).map(drop),
            GameAction::EndTurn => self.end_turn().map(drop),
            GameAction::BuildRoad { from, to } => self.build_road(from, to),
            GameAction::BuildSettlement { node } => self.build_settlement(node),
            GameAction::BuildCity { node } => self.build_city(node),
            GameAction::BuyDevelopmentCard => self.buy_development_card().map(drop),
            GameAction::PlayMonopoly { resource } => {
                self.play_development_monopoly(resource).map(drop)
            }
            GameAction::PlayYearOfPlenty { first, second } => {
                self.play_development_year_of_plenty(first, second)
            }
            GameAction::PlayRoadBuilding { first, second } => {
                self.play_development_road_building(first, second)
            }
            GameAction::PlayKnight {
                robber_tile,
                rob_from,
            } => self.play_development_knight(robber_tile, rob_from).map(drop),
            GameAction::PlayVictoryPoint => self.play_development_victory_point(),
            GameAction::TradeGenericHarbour { give, desired } => {
                self.trade_generic_harbour(give, desired)
            }
            GameAction::TradeSpecialHarbour { give, desired } => {
                self.trade_special_harbour(give, desired)
            }
            GameAction::TradeBasic { give, desired } => self.trade_basic(give, desired),
        };

        let events = std::mem::take(&mut self.events);
        match result {
            Ok(()) => Ok(events),
            Err(error) => Err(ActionError { error, events }),
        }
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn require_turn_active(&self) -> Result<(), GameError> {
        match self.phase {
            TurnPhase::TurnActive => Ok(()),
            TurnPhase::AwaitingNextTurn => Err(GameError::IllegalState(
                "no turn is in progress; call next_turn first".into(),
            )),
        }
    }

    // ==================== Turn Flow ====================

    /// Hand the turn to the next player and roll.
    ///
    /// On the robber trigger, players over the limit discard, then the
    /// robber target is checked. A bad target is returned as an error only
    /// after resources for the roll have been distributed; in that case the
    /// robber stays put and the turn remains active.
    pub fn next_turn(
        &mut self,
        robber_tile: TileId,
        rob_from: Option<PlayerId>,
    ) -> Result<DiceRoll, GameError> {
        if self.phase != TurnPhase::AwaitingNextTurn {
            return Err(GameError::IllegalState(
                "the previous turn has not ended".into(),
            ));
        }

        self.turn += 1;
        self.current = self.next_player_after(self.current);
        self.phase = TurnPhase::TurnActive;
        self.dev_card_played = false;

        let roll = self.dice.roll();
        self.last_roll = Some(roll);
        info!(
            turn = self.turn,
            player = self.current,
            total = roll.total(),
            "turn started"
        );
        self.emit(GameEvent::DiceRolled {
            player: self.current,
            roll: (roll.first, roll.second),
            total: roll.total(),
        });

        let mut deferred = Ok(());
        if roll.total() == self.config.robber_trigger {
            self.discard_excess();
            deferred = self
                .validate_robber_target(robber_tile, rob_from)
                .and_then(|()| self.move_robber_and_rob(robber_tile, rob_from).map(drop));
        }

        self.distribute_new_resources(roll.total());

        if let Err(err) = &deferred {
            warn!(turn = self.turn, %err, "robber move rejected after distribution");
        }
        deferred.map(|()| roll)
    }

    /// Pay out every building next to a resource tile carrying `total`
    pub fn distribute_new_resources(&mut self, total: u8) {
        let distributions = self.board.production_for_roll(total);
        if distributions.is_empty() {
            return;
        }

        for &(owner, resource, amount) in &distributions {
            self.players[owner as usize].resources.add(resource, amount);
        }
        debug!(total, payouts = distributions.len(), "resources distributed");
        self.emit(GameEvent::ResourcesDistributed { distributions });
    }

    /// End the current turn; returns the current player if they have won
    pub fn end_turn(&mut self) -> Result<Option<PlayerId>, GameError> {
        self.require_turn_active()?;
        self.phase = TurnPhase::AwaitingNextTurn;

        let player = self.current;
        self.emit(GameEvent::TurnEnded {
            player,
            next_player: self.next_player_after(player),
        });

        if !self.has_won(player)? {
            return Ok(None);
        }
        let winning_points = self.players[player as usize].winning_points;
        info!(player, winning_points, "player reached the winning threshold");
        self.emit(GameEvent::GameWon {
            player,
            winning_points,
        });
        Ok(Some(player))
    }

    // ==================== Robber ====================

    fn discard_excess(&mut self) {
        let limit = self.config.robber_resource_limit;
        for player in &mut self.players {
            let total = player.resources.total();
            if total <= limit {
                continue;
            }

            let mut discarded = ResourceLedger::new();
            for _ in 0..total / 2 {
                if let Some(resource) = player.resources.remove_random_kind(&mut self.rng) {
                    discarded.add(resource, 1);
                }
            }
            debug!(player = player.id, %discarded, "discarded over robber limit");
            self.events.push(GameEvent::CardsDiscarded {
                player: player.id,
                discarded,
            });
        }
    }

    fn validate_robber_target(
        &self,
        tile: TileId,
        victim: Option<PlayerId>,
    ) -> Result<(), GameError> {
        if !self.board.has_tile(tile) {
            return Err(illegal_play(format!(
                "cannot move the robber to tile {tile}: not on the board"
            )));
        }
        if let Some(victim) = victim {
            if self.player(victim).is_err() {
                return Err(illegal_play(format!(
                    "cannot rob player {victim}: not in this game"
                )));
            }
            if !self.board.has_building_at_tile(tile, victim) {
                return Err(illegal_play(format!(
                    "cannot rob player {victim}: no building on tile {tile}"
                )));
            }
        }
        Ok(())
    }

    fn move_robber_and_rob(
        &mut self,
        tile: TileId,
        victim: Option<PlayerId>,
    ) -> Result<Option<Resource>, GameError> {
        let from = self.board.robber_tile();
        self.board.place_robber(tile)?;
        self.emit(GameEvent::RobberMoved {
            player: self.current,
            from,
            to: tile,
        });

        Ok(victim.and_then(|victim| self.rob(victim)))
    }

    /// Move one random resource unit from `victim` to the current player
    fn rob(&mut self, victim: PlayerId) -> Option<Resource> {
        let Some(resource) = self.players[victim as usize]
            .resources
            .remove_random_kind(&mut self.rng)
        else {
            debug!(victim, "robbery target holds nothing");
            return None;
        };

        let thief = self.current;
        self.current_player_mut().resources.add(resource, 1);
        debug!(thief, victim, %resource, "resource stolen");
        self.emit(GameEvent::ResourceStolen {
            thief,
            victim,
            resource,
        });
        Some(resource)
    }

    // ==================== Building ====================

    /// Deduct `cost` from the current player, all or nothing
    fn charge(&mut self, cost: &ResourceLedger) -> Result<(), GameError> {
        self.current_player_mut().resources.subtract_ledger(cost)?;
        Ok(())
    }

    /// Put a building on a node, replacing any previous one and adjusting points
    fn place_building(&mut self, node: NodeId, building: Building) {
        if let Some(previous) = self.board.set_building(node, building) {
            self.players[previous.owner() as usize].winning_points -= previous.winning_points();
        }
        self.players[building.owner() as usize].winning_points += building.winning_points();
    }

    /// Build a road between two adjacent nodes
    pub fn build_road(&mut self, a: NodeId, b: NodeId) -> Result<(), GameError> {
        self.require_turn_active()?;
        let player = self.current;
        let edge = self.edge(a, b)?;
        let key = edge.key;

        if self.players[player as usize].roads_remaining == 0 {
            return Err(illegal_play("no roads remaining"));
        }
        if edge.has_road() {
            return Err(illegal_play(format!("edge {a}-{b} already has a road")));
        }
        if !self.board.edge_connects_to_network(key, player) {
            return Err(illegal_play(format!(
                "edge {a}-{b} does not connect to your buildings or roads"
            )));
        }

        self.charge(&Road::new(player).cost())?;
        self.current_player_mut().roads_remaining -= 1;
        self.board.set_road(key, Road::new(player));
        debug!(player, a, b, "road built");
        self.emit(GameEvent::RoadBuilt { player, edge: key });
        Ok(())
    }

    /// Build a settlement on an empty node reached by one of the player's roads
    pub fn build_settlement(&mut self, node: NodeId) -> Result<(), GameError> {
        self.require_turn_active()?;
        let player = self.current;
        let occupied = self.node(node)?.has_building();

        if self.players[player as usize].settlements_remaining == 0 {
            return Err(illegal_play("no settlements remaining"));
        }
        if !self.board.has_road_to_node(node, player) {
            return Err(illegal_play(format!("no road of yours reaches node {node}")));
        }
        if occupied {
            return Err(illegal_play(format!("node {node} is already built on")));
        }
        if !self.board.satisfies_distance_rule(node) {
            return Err(illegal_play(format!(
                "node {node} is next to another building"
            )));
        }

        self.charge(&Building::Settlement(player).cost())?;
        self.current_player_mut().settlements_remaining -= 1;
        self.place_building(node, Building::Settlement(player));
        debug!(player, node, "settlement built");
        self.emit(GameEvent::SettlementBuilt { player, node });
        Ok(())
    }

    /// Upgrade one of the player's settlements to a city
    pub fn build_city(&mut self, node: NodeId) -> Result<(), GameError> {
        self.require_turn_active()?;
        let player = self.current;
        let building = self.node(node)?.building;

        if self.players[player as usize].cities_remaining == 0 {
            return Err(illegal_play("no cities remaining"));
        }
        if building != Some(Building::Settlement(player)) {
            return Err(illegal_play(format!(
                "node {node} has no settlement of yours to upgrade"
            )));
        }
        if !self.board.satisfies_distance_rule(node) {
            return Err(illegal_play(format!(
                "node {node} is next to another building"
            )));
        }

        self.charge(&Building::City(player).cost())?;
        let current = self.current_player_mut();
        current.cities_remaining -= 1;
        current.settlements_remaining += 1;
        self.place_building(node, Building::City(player));
        debug!(player, node, "city built");
        self.emit(GameEvent::CityBuilt { player, node });
        Ok(())
    }

    // ==================== Development Cards ====================

    /// Buy the top card of the development deck
    pub fn buy_development_card(&mut self) -> Result<DevelopmentCard, GameError> {
        self.require_turn_active()?;
        if self.deck.is_empty() {
            return Err(illegal_play("the development deck is empty"));
        }

        self.charge(&DevelopmentCard::cost())?;
        let Some(card) = self.deck.pop() else {
            return Err(illegal_play("the development deck is empty"));
        };
        let owned = OwnedDevelopmentCard {
            card,
            owner: self.current,
            bought_in_turn: self.turn,
        };
        self.current_player_mut().hidden_cards.push(owned);
        debug!(player = self.current, ?card, "development card bought");
        self.emit(GameEvent::DevelopmentCardPurchased {
            player: self.current,
        });
        Ok(card)
    }

    /// Index of a hidden card of this kind the current player may play now
    fn find_playable(&self, card: DevelopmentCard) -> Result<usize, GameError> {
        if !card.is_victory_point() && self.dev_card_played {
            return Err(illegal_play(
                "a development card was already played this turn",
            ));
        }

        let player = &self.players[self.current as usize];
        match player.playable_card(card, self.turn) {
            Some(index) => Ok(index),
            None if player.holds_card(card) => Err(illegal_play(format!(
                "{card:?} bought this turn cannot be played until a later turn"
            ))),
            None => Err(illegal_play(format!("you hold no {card:?} card"))),
        }
    }

    fn consume_card(&mut self, index: usize) -> OwnedDevelopmentCard {
        let owned = self.current_player_mut().consume_card(index);
        if !owned.card.is_victory_point() {
            self.dev_card_played = true;
        }
        owned
    }

    /// Take every unit of `resource` from the other players; returns the amount taken
    pub fn play_development_monopoly(&mut self, resource: Resource) -> Result<u32, GameError> {
        self.require_turn_active()?;
        let index = self.find_playable(DevelopmentCard::Monopoly)?;
        self.consume_card(index);

        let player = self.current;
        let total_taken: u32 = self
            .players
            .iter_mut()
            .filter(|p| p.id != player)
            .map(|p| p.resources.take_all(resource))
            .sum();
        self.current_player_mut().resources.add(resource, total_taken);

        debug!(player, %resource, total_taken, "monopoly played");
        self.emit(GameEvent::MonopolyPlayed {
            player,
            resource,
            total_taken,
        });
        Ok(total_taken)
    }

    /// Take one unit each of two resources from the bank
    pub fn play_development_year_of_plenty(
        &mut self,
        first: Resource,
        second: Resource,
    ) -> Result<(), GameError> {
        self.require_turn_active()?;
        let index = self.find_playable(DevelopmentCard::YearOfPlenty)?;
        self.consume_card(index);

        let resources = &mut self.current_player_mut().resources;
        resources.add(first, 1);
        resources.add(second, 1);
        self.emit(GameEvent::YearOfPlentyPlayed {
            player: self.current,
            resources: (first, second),
        });
        Ok(())
    }

    /// Place two free roads on any two distinct empty edges
    pub fn play_development_road_building(
        &mut self,
        first: (NodeId, NodeId),
        second: (NodeId, NodeId),
    ) -> Result<(), GameError> {
        self.require_turn_active()?;
        let index = self.find_playable(DevelopmentCard::RoadBuilding)?;

        let mut keys = [EdgeKey::new(first.0, first.1); 2];
        for (slot, (a, b)) in keys.iter_mut().zip([first, second]) {
            let edge = self.edge(a, b)?;
            if edge.has_road() {
                return Err(illegal_play(format!("edge {a}-{b} already has a road")));
            }
            *slot = edge.key;
        }
        if keys[0] == keys[1] {
            return Err(illegal_play("road building needs two different edges"));
        }
        if self.players[self.current as usize].roads_remaining < 2 {
            return Err(illegal_play("road building needs two roads remaining"));
        }

        self.consume_card(index);
        let player = self.current;
        self.current_player_mut().roads_remaining -= 2;
        for key in keys {
            self.board.set_road(key, Road::new(player));
        }
        self.emit(GameEvent::RoadBuildingPlayed {
            player,
            roads: keys,
        });
        Ok(())
    }

    /// Move the robber and optionally rob a player with a building on the tile
    pub fn play_development_knight(
        &mut self,
        robber_tile: TileId,
        rob_from: Option<PlayerId>,
    ) -> Result<Option<Resource>, GameError> {
        self.require_turn_active()?;
        let index = self.find_playable(DevelopmentCard::Knight)?;
        self.validate_robber_target(robber_tile, rob_from)?;

        self.consume_card(index);
        self.emit(GameEvent::KnightPlayed {
            player: self.current,
        });
        self.move_robber_and_rob(robber_tile, rob_from)
    }

    /// Reveal a victory-point card for one winning point
    pub fn play_development_victory_point(&mut self) -> Result<(), GameError> {
        self.require_turn_active()?;
        let index = self.find_playable(DevelopmentCard::VictoryPoint)?;
        self.consume_card(index);

        self.current_player_mut().winning_points += 1;
        self.emit(GameEvent::VictoryPointRevealed {
            player: self.current,
        });
        Ok(())
    }

    // ==================== Trading ====================

    fn owns_harbour(&self, wanted: Harbour) -> bool {
        self.board.player_harbours(self.current).contains(&wanted)
    }

    fn bank_trade(&mut self, gave: ResourceLedger, desired: Resource) -> Result<(), GameError> {
        self.charge(&gave)?;
        self.current_player_mut().resources.add(desired, 1);
        debug!(player = self.current, %gave, %desired, "bank trade");
        self.emit(GameEvent::BankTradeCompleted {
            player: self.current,
            gave,
            received: desired,
        });
        Ok(())
    }

    /// 3:1 trade; needs a building on a generic harbour
    pub fn trade_generic_harbour(
        &mut self,
        give: [Resource; 3],
        desired: Resource,
    ) -> Result<(), GameError> {
        self.require_turn_active()?;
        if !self.owns_harbour(Harbour::Generic) {
            return Err(illegal_play("you have no building on a generic harbour"));
        }
        self.bank_trade(ResourceLedger::one_each(&give), desired)
    }

    /// 2:1 trade; needs a building on the harbour for `give`
    pub fn trade_special_harbour(
        &mut self,
        give: Resource,
        desired: Resource,
    ) -> Result<(), GameError> {
        self.require_turn_active()?;
        if !self.owns_harbour(Harbour::Specific(give)) {
            return Err(illegal_play(format!(
                "you have no building on a {give} harbour"
            )));
        }
        self.bank_trade(ResourceLedger::single(give, 2), desired)
    }

    /// 4:1 trade with the bank; the four offered kinds may repeat
    pub fn trade_basic(&mut self, give: [Resource; 4], desired: Resource) -> Result<(), GameError> {
        self.require_turn_active()?;
        self.bank_trade(ResourceLedger::one_each(&give), desired)
    }
}
