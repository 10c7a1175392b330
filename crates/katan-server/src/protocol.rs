//! WebSocket protocol messages for Katan game hosting.

use crate::registry::GameId;
use katan_core::{GameAction, GameEvent, GameSnapshot};
use serde::{Deserialize, Serialize};

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Create a new game on the standard board
    CreateGame {
        #[serde(default)]
        dice_seeds: Option<(u64, u64)>,
    },

    /// Delete a game
    DeleteGame { game_id: GameId },

    /// Submit a game action
    Action { game_id: GameId, action: GameAction },

    /// Request the current state of a game
    GetState { game_id: GameId },

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Game created successfully
    GameCreated { game_id: GameId },

    /// Game deleted
    GameDeleted { game_id: GameId },

    /// Outcome of an action. `events` is empty when the action failed.
    ActionResult {
        game_id: GameId,
        success: bool,
        events: Vec<GameEvent>,
        error: Option<String>,
    },

    /// Current game state
    GameState {
        game_id: GameId,
        state: GameSnapshot,
    },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_format() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type": "Action", "payload": {"game_id": 3, "action": {"BuildCity": {"node": 13}}}}"#,
        )
        .unwrap();
        assert!(matches!(
            msg,
            ClientMessage::Action {
                game_id: 3,
                action: GameAction::BuildCity { node: 13 }
            }
        ));

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type": "CreateGame", "payload": {}}"#).unwrap();
        assert!(matches!(msg, ClientMessage::CreateGame { dice_seeds: None }));
    }

    #[test]
    fn test_server_message_format() {
        let json = serde_json::to_value(ServerMessage::GameCreated { game_id: 4 }).unwrap();
        assert_eq!(json["type"], "GameCreated");
        assert_eq!(json["payload"]["game_id"], 4);
    }
}
