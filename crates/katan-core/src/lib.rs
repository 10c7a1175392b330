//! Katan - a rules engine for a Catan-style resource trading board game
//!
//! This crate provides the core game logic for Katan, including:
//! - Resource accounting that never goes negative
//! - Board graph with tiles, nodes, edges, harbours and the robber
//! - Player state and development cards
//! - Game state machine with full rule enforcement
//!
//! # Architecture
//!
//! The engine is synchronous and single-owner: one `Game` is driven by one
//! caller at a time. Hosting several games concurrently is the job of the
//! caller (see the `katan-server` crate).
//!
//! # Modules
//!
//! - [`ledger`]: Resource kinds and the per-kind resource ledger
//! - [`board`]: Board graph, buildings, roads and harbours
//! - [`layout`]: Board layouts and starting positions
//! - [`player`]: Player state, development cards and costs
//! - [`dice`]: Fair, seeded and loaded dice
//! - [`config`]: Tunable rule parameters
//! - [`game`]: Game state machine
//! - [`actions`]: Serializable actions and the events they produce

pub mod actions;
pub mod board;
pub mod config;
pub mod dice;
pub mod game;
pub mod layout;
pub mod ledger;
pub mod player;

// Re-export commonly used types
pub use actions::{GameAction, GameEvent};
pub use board::{
    Board, BoardError, Building, Edge, EdgeKey, Harbour, Node, NodeId, PlayerId, Road, Tile,
    TileId, TileKind,
};
pub use config::GameConfig;
pub use dice::{Dice, DiceError, DiceRoll, Die};
pub use game::{ActionError, Game, GameError, GameSnapshot, PlayerSnapshot, TurnPhase};
pub use layout::{BoardLayout, PlayerStart, StartingConditions, TileSpec};
pub use ledger::{LedgerError, Resource, ResourceLedger};
pub use player::{DevelopmentCard, OwnedDevelopmentCard, Player};
