//! Game board representation: tiles, nodes, edges, and what is built on them.
//!
//! This module contains:
//! - Identifier types for players, tiles, nodes and edges
//! - Tile kinds, harbours, buildings and roads
//! - The board graph, built once from a `BoardLayout` and validated
//! - Occupancy queries used by the rules (distance rule, road network, harbours)
//!
//! Topology is frozen at construction. Nodes and edges refer to each other
//! only by id, so the board owns everything through flat lookup tables.

use crate::layout::{BoardLayout, TileSpec};
use crate::ledger::{Resource, ResourceLedger};
use crate::player::costs;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Player identifier
pub type PlayerId = u8;

/// Tile identifier (always > 0)
pub type TileId = u32;

/// Node (tile corner) identifier
pub type NodeId = u32;

/// Lowest and highest dice totals a resource tile may carry
pub const DICE_NUMBER_RANGE: std::ops::RangeInclusive<u8> = 2..=12;

/// Topology violations found while building a board
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("tile id {0} is used more than once")]
    DuplicateTile(TileId),

    #[error("tile id {0} is not a positive id")]
    InvalidTileId(TileId),

    #[error("tile {tile} has dice number {number}, expected 2-12 on resource tiles and none elsewhere")]
    InvalidDiceNumber { tile: TileId, number: u8 },

    #[error("resource tile {0} has no dice number")]
    MissingDiceNumber(TileId),

    #[error("tile {tile} lists node {node} more than once")]
    RepeatedNode { tile: TileId, node: NodeId },

    #[error("initial robber tile {0} is not on the board")]
    UnknownRobberTile(TileId),

    #[error("harbour assigned to node {0}, which no tile borders")]
    UnknownHarbourNode(NodeId),

    #[error("tile {0} is not on this board")]
    UnknownTile(TileId),
}

/// Undirected edge identifier: the two endpoint nodes, smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey(NodeId, NodeId);

impl EdgeKey {
    /// Create a key; argument order does not matter
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            EdgeKey(a, b)
        } else {
            EdgeKey(b, a)
        }
    }

    /// Both endpoints, smallest first
    pub fn ends(&self) -> (NodeId, NodeId) {
        (self.0, self.1)
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.0 == node || self.1 == node
    }

    /// The endpoint opposite `node`, if `node` is an endpoint at all
    pub fn other_end(&self, node: NodeId) -> Option<NodeId> {
        if self.0 == node {
            Some(self.1)
        } else if self.1 == node {
            Some(self.0)
        } else {
            None
        }
    }
}

/// What a tile produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// Produces a resource when its number is rolled
    Resource { resource: Resource, dice_number: u8 },
    /// Desert - no production
    Empty,
}

/// Harbour types for trading with the bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Harbour {
    /// 3:1 trade any resource
    Generic,
    /// 2:1 trade for a specific resource
    Specific(Resource),
}

/// A building standing on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Building {
    /// Settlement (1 VP, 1 resource per adjacent tile)
    Settlement(PlayerId),
    /// City (2 VP, 2 resources per adjacent tile)
    City(PlayerId),
}

impl Building {
    pub fn owner(&self) -> PlayerId {
        match self {
            Building::Settlement(p) | Building::City(p) => *p,
        }
    }

    /// Victory points provided by this building
    pub fn winning_points(&self) -> u32 {
        match self {
            Building::Settlement(_) => 1,
            Building::City(_) => 2,
        }
    }

    /// Units produced each time an adjacent tile triggers
    pub fn yield_per_trigger(&self) -> u32 {
        match self {
            Building::Settlement(_) => 1,
            Building::City(_) => 2,
        }
    }

    pub fn cost(&self) -> ResourceLedger {
        match self {
            Building::Settlement(_) => costs::settlement(),
            Building::City(_) => costs::city(),
        }
    }
}

/// A road occupying one edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Road {
    pub owner: PlayerId,
}

impl Road {
    pub fn new(owner: PlayerId) -> Self {
        Self { owner }
    }

    pub fn cost(&self) -> ResourceLedger {
        costs::road()
    }
}

/// A single tile on the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub kind: TileKind,
    /// Bordering nodes in ring order
    pub nodes: [NodeId; 6],
}

impl Tile {
    /// Get the resource this tile produces, if any
    pub fn resource(&self) -> Option<Resource> {
        match self.kind {
            TileKind::Resource { resource, .. } => Some(resource),
            TileKind::Empty => None,
        }
    }

    /// Dice total that triggers production (None for empty tiles)
    pub fn dice_number(&self) -> Option<u8> {
        match self.kind {
            TileKind::Resource { dice_number, .. } => Some(dice_number),
            TileKind::Empty => None,
        }
    }
}

/// A tile corner where buildings stand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub harbour: Option<Harbour>,
    /// Edges touching this node
    pub edges: Vec<EdgeKey>,
    pub building: Option<Building>,
}

impl Node {
    pub fn has_building(&self) -> bool {
        self.building.is_some()
    }

    /// Owner of the building on this node, if any
    pub fn owner(&self) -> Option<PlayerId> {
        self.building.map(|b| b.owner())
    }

    /// Nodes one edge away
    pub fn neighbours(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.edges.iter().filter_map(move |e| e.other_end(self.id))
    }
}

/// A tile border where roads are built
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub key: EdgeKey,
    pub road: Option<Road>,
}

impl Edge {
    pub fn has_road(&self) -> bool {
        self.road.is_some()
    }

    pub fn road_owner(&self) -> Option<PlayerId> {
        self.road.map(|r| r.owner)
    }
}

/// The complete game board
#[derive(Debug, Clone)]
pub struct Board {
    tiles: BTreeMap<TileId, Tile>,
    nodes: BTreeMap<NodeId, Node>,
    edges: BTreeMap<EdgeKey, Edge>,
    /// Tiles that produce, in id order
    resource_tiles: Vec<TileId>,
    /// Tiles that never produce, in id order
    empty_tiles: Vec<TileId>,
    robber_tile: TileId,
}

impl Board {
    /// Build and validate a board from a layout.
    ///
    /// Any topology violation is fatal: no `Board` is returned.
    pub fn new(layout: &BoardLayout) -> Result<Self, BoardError> {
        let mut tiles = BTreeMap::new();
        for spec in &layout.tiles {
            let tile = Self::tile_from_spec(spec)?;
            if tiles.insert(tile.id, tile).is_some() {
                return Err(BoardError::DuplicateTile(spec.id));
            }
        }

        if !tiles.contains_key(&layout.robber_tile) {
            return Err(BoardError::UnknownRobberTile(layout.robber_tile));
        }

        let node_ids: BTreeSet<NodeId> = tiles.values().flat_map(|t| t.nodes).collect();

        // Consecutive ring pairs, closing the ring back to the first node.
        // Shared borders collapse into one edge. Both ends come from a ring,
        // so every edge lands on a known node.
        let mut edge_keys = BTreeSet::new();
        for tile in tiles.values() {
            for i in 0..tile.nodes.len() {
                let a = tile.nodes[i];
                let b = tile.nodes[(i + 1) % tile.nodes.len()];
                edge_keys.insert(EdgeKey::new(a, b));
            }
        }

        if let Some(&node) = layout.harbours.keys().find(|n| !node_ids.contains(n)) {
            return Err(BoardError::UnknownHarbourNode(node));
        }

        let nodes = node_ids
            .iter()
            .map(|&id| {
                let node = Node {
                    id,
                    harbour: layout.harbours.get(&id).copied(),
                    edges: edge_keys.iter().filter(|e| e.touches(id)).copied().collect(),
                    building: None,
                };
                (id, node)
            })
            .collect();

        let edges = edge_keys
            .into_iter()
            .map(|key| (key, Edge { key, road: None }))
            .collect();

        let (resource_tiles, empty_tiles): (Vec<TileId>, Vec<TileId>) = tiles
            .values()
            .map(|t: &Tile| t.id)
            .partition(|id| tiles[id].resource().is_some());

        Ok(Self {
            tiles,
            nodes,
            edges,
            resource_tiles,
            empty_tiles,
            robber_tile: layout.robber_tile,
        })
    }

    fn tile_from_spec(spec: &TileSpec) -> Result<Tile, BoardError> {
        if spec.id == 0 {
            return Err(BoardError::InvalidTileId(spec.id));
        }

        let kind = match (spec.resource, spec.dice_number) {
            (Some(resource), Some(number)) if DICE_NUMBER_RANGE.contains(&number) => {
                TileKind::Resource {
                    resource,
                    dice_number: number,
                }
            }
            (Some(_), None) => return Err(BoardError::MissingDiceNumber(spec.id)),
            (_, Some(number)) => {
                return Err(BoardError::InvalidDiceNumber {
                    tile: spec.id,
                    number,
                })
            }
            (None, None) => TileKind::Empty,
        };

        let mut seen = BTreeSet::new();
        if let Some(&node) = spec.nodes.iter().find(|n| !seen.insert(**n)) {
            return Err(BoardError::RepeatedNode {
                tile: spec.id,
                node,
            });
        }

        Ok(Tile {
            id: spec.id,
            kind,
            nodes: spec.nodes,
        })
    }

    // ==================== Query Methods ====================

    /// Get a tile by id
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    pub fn has_tile(&self, id: TileId) -> bool {
        self.tiles.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Get an edge by its endpoints, in either order
    pub fn edge(&self, a: NodeId, b: NodeId) -> Option<&Edge> {
        self.edges.get(&EdgeKey::new(a, b))
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Tiles that produce resources
    pub fn resource_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.resource_tiles.iter().map(move |id| &self.tiles[id])
    }

    /// Tiles that never produce
    pub fn empty_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.empty_tiles.iter().map(move |id| &self.tiles[id])
    }

    /// Get the robber's current tile
    pub fn robber_tile(&self) -> TileId {
        self.robber_tile
    }

    /// Move the robber; the tile must belong to this board
    pub fn place_robber(&mut self, tile: TileId) -> Result<(), BoardError> {
        if !self.has_tile(tile) {
            return Err(BoardError::UnknownTile(tile));
        }
        self.robber_tile = tile;
        Ok(())
    }

    /// Building owner at a node, if the node exists and is built on
    fn owner_at(&self, node: NodeId) -> Option<PlayerId> {
        self.nodes.get(&node).and_then(|n| n.owner())
    }

    // ==================== Validation Methods ====================

    /// Check the distance rule: no building one edge away
    pub fn satisfies_distance_rule(&self, node: NodeId) -> bool {
        self.nodes
            .get(&node)
            .map(|n| n.neighbours().all(|adj| self.owner_at(adj).is_none()))
            .unwrap_or(false)
    }

    /// Whether the player owns a road touching the node
    pub fn has_road_to_node(&self, node: NodeId, player: PlayerId) -> bool {
        self.nodes.get(&node).is_some_and(|n| {
            n.edges
                .iter()
                .any(|key| self.edges[key].road_owner() == Some(player))
        })
    }

    /// Whether an edge joins the player's network.
    ///
    /// True when either endpoint carries one of the player's buildings or
    /// touches another edge holding one of the player's roads.
    pub fn edge_connects_to_network(&self, key: EdgeKey, player: PlayerId) -> bool {
        let (a, b) = key.ends();
        [a, b].into_iter().any(|end| {
            self.owner_at(end) == Some(player)
                || self.nodes.get(&end).is_some_and(|n| {
                    n.edges
                        .iter()
                        .any(|e| *e != key && self.edges[e].road_owner() == Some(player))
                })
        })
    }

    /// Whether the player has a building on any node of the tile
    pub fn has_building_at_tile(&self, tile: TileId, player: PlayerId) -> bool {
        self.tiles
            .get(&tile)
            .is_some_and(|t| t.nodes.iter().any(|&n| self.owner_at(n) == Some(player)))
    }

    /// Harbours at nodes where the player has a building
    pub fn player_harbours(&self, player: PlayerId) -> Vec<Harbour> {
        self.nodes
            .values()
            .filter(|n| n.owner() == Some(player))
            .filter_map(|n| n.harbour)
            .collect()
    }

    // ==================== Mutation Methods ====================

    /// Put a building on a node (assumes validation already done), returning what stood there
    pub(crate) fn set_building(&mut self, node: NodeId, building: Building) -> Option<Building> {
        self.nodes
            .get_mut(&node)
            .and_then(|n| n.building.replace(building))
    }

    /// Place a road (assumes validation already done)
    pub(crate) fn set_road(&mut self, key: EdgeKey, road: Road) {
        if let Some(edge) = self.edges.get_mut(&key) {
            edge.road = Some(road);
        }
    }

    // ==================== Resource Distribution ====================

    /// Resources produced for a dice total, as `(owner, resource, amount)` per building.
    ///
    /// The robber does not block production.
    pub fn production_for_roll(&self, roll: u8) -> Vec<(PlayerId, Resource, u32)> {
        let mut production = Vec::new();
        for tile in self.resource_tiles() {
            let TileKind::Resource {
                resource,
                dice_number,
            } = tile.kind
            else {
                continue;
            };
            if dice_number != roll {
                continue;
            }
            for node in tile.nodes {
                if let Some(building) = self.nodes.get(&node).and_then(|n| n.building) {
                    production.push((building.owner(), resource, building.yield_per_trigger()));
                }
            }
        }
        production
    }
}
