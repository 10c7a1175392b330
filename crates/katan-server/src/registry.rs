//! Game registry: the live games this server hosts, keyed by integer id.

use dashmap::DashMap;
use katan_core::{Dice, Game, GameConfig, GameError, GameSnapshot};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::info;

/// Identifier handed out for each created game
pub type GameId = u64;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no game with id {0}")]
    UnknownGame(GameId),

    #[error("could not create game: {0}")]
    Creation(#[from] GameError),
}

/// All games hosted by this process.
///
/// Each call locks only the entry it touches, so operations on one game
/// run one at a time while different games proceed independently.
pub struct GameRegistry {
    games: DashMap<GameId, Game>,
    next_id: AtomicU64,
    config: GameConfig,
}

impl GameRegistry {
    pub fn new(config: GameConfig) -> Self {
        Self {
            games: DashMap::new(),
            next_id: AtomicU64::new(0),
            config,
        }
    }

    /// Start a standard four-player game; seeded dice when `dice_seeds` is given
    pub fn create(&self, dice_seeds: Option<(u64, u64)>) -> Result<GameId, RegistryError> {
        let dice = match dice_seeds {
            Some((first, second)) => Dice::seeded(first, second),
            None => Dice::fair(),
        };
        let game = Game::new_standard_4player(dice, self.config.clone())?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.games.insert(id, game);
        info!(game_id = id, seeded = dice_seeds.is_some(), "game created");
        Ok(id)
    }

    pub fn delete(&self, id: GameId) -> Result<(), RegistryError> {
        if self.games.remove(&id).is_none() {
            return Err(RegistryError::UnknownGame(id));
        }
        info!(game_id = id, "game deleted");
        Ok(())
    }

    /// Run `f` with exclusive access to one game
    pub fn with_game<R>(
        &self,
        id: GameId,
        f: impl FnOnce(&mut Game) -> R,
    ) -> Result<R, RegistryError> {
        let mut game = self
            .games
            .get_mut(&id)
            .ok_or(RegistryError::UnknownGame(id))?;
        Ok(f(&mut game))
    }

    pub fn snapshot(&self, id: GameId) -> Result<GameSnapshot, RegistryError> {
        self.with_game(id, |game| game.snapshot())
    }

    /// Number of live games
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use katan_core::TurnPhase;

    #[test]
    fn test_create_hands_out_sequential_ids() {
        let registry = GameRegistry::default();
        assert_eq!(registry.create(None).unwrap(), 0);
        assert_eq!(registry.create(Some((1, 2))).unwrap(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_delete_game() {
        let registry = GameRegistry::default();
        let id = registry.create(None).unwrap();

        registry.delete(id).unwrap();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.delete(id),
            Err(RegistryError::UnknownGame(0))
        ));
    }

    #[test]
    fn test_ids_are_not_reused() {
        let registry = GameRegistry::default();
        let first = registry.create(None).unwrap();
        registry.delete(first).unwrap();
        assert_eq!(registry.create(None).unwrap(), first + 1);
    }

    #[test]
    fn test_with_game_unknown_id() {
        let registry = GameRegistry::default();
        assert!(matches!(
            registry.snapshot(7),
            Err(RegistryError::UnknownGame(7))
        ));
    }

    #[test]
    fn test_with_game_mutates_in_place() {
        let registry = GameRegistry::default();
        let id = registry.create(Some((3, 4))).unwrap();

        let rolled = registry
            .with_game(id, |game| game.next_turn(10, None))
            .unwrap();
        assert!(rolled.is_ok());
        let snapshot = registry.snapshot(id).unwrap();
        assert_eq!(snapshot.turn, 1);
        assert_eq!(snapshot.phase, TurnPhase::TurnActive);
    }
}
