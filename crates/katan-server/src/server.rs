//! WebSocket server and connection handling.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::registry::{GameRegistry, RegistryError};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

/// Run the WebSocket server.
pub async fn run_server(addr: SocketAddr, registry: Arc<GameRegistry>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Katan server listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, registry).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

/// Handle a single WebSocket connection.
async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    registry: Arc<GameRegistry>,
) -> anyhow::Result<()> {
    let ws_stream = accept_async(stream).await?;
    info!("New WebSocket connection from {}", addr);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    while let Some(msg) = ws_receiver.next().await {
        let reply = match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => handle_message(client_msg, &registry),
                Err(e) => {
                    warn!("Invalid message from {}: {}", addr, e);
                    ServerMessage::Error {
                        message: format!("invalid message: {e}"),
                    }
                }
            },
            Ok(Message::Ping(data)) => {
                ws_sender.send(Message::Pong(data)).await?;
                continue;
            }
            Ok(Message::Close(_)) => {
                info!("Client {} closing connection", addr);
                break;
            }
            Err(e) => {
                error!("WebSocket error from {}: {}", addr, e);
                break;
            }
            _ => continue,
        };

        let text = serde_json::to_string(&reply)?;
        ws_sender.send(Message::Text(text)).await?;
    }

    info!("Connection closed for {}", addr);
    Ok(())
}

fn registry_error(err: RegistryError) -> ServerMessage {
    ServerMessage::Error {
        message: err.to_string(),
    }
}

/// Map one client request onto the registry and the addressed game.
pub fn handle_message(msg: ClientMessage, registry: &GameRegistry) -> ServerMessage {
    match msg {
        ClientMessage::CreateGame { dice_seeds } => match registry.create(dice_seeds) {
            Ok(game_id) => ServerMessage::GameCreated { game_id },
            Err(e) => registry_error(e),
        },

        ClientMessage::DeleteGame { game_id } => match registry.delete(game_id) {
            Ok(()) => ServerMessage::GameDeleted { game_id },
            Err(e) => registry_error(e),
        },

        ClientMessage::Action { game_id, action } => {
            debug!(game_id, ?action, "applying action");
            match registry.with_game(game_id, |game| game.apply_action(action)) {
                Ok(Ok(events)) => ServerMessage::ActionResult {
                    game_id,
                    success: true,
                    events,
                    error: None,
                },
                // A rejected robber target still carries the roll's events
                Ok(Err(rejected)) => ServerMessage::ActionResult {
                    game_id,
                    success: false,
                    error: Some(rejected.error.to_string()),
                    events: rejected.events,
                },
                Err(e) => registry_error(e),
            }
        }

        ClientMessage::GetState { game_id } => match registry.snapshot(game_id) {
            Ok(state) => ServerMessage::GameState { game_id, state },
            Err(e) => registry_error(e),
        },

        ClientMessage::Ping => ServerMessage::Pong,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use katan_core::{GameAction, GameEvent};

    fn created_game(registry: &GameRegistry) -> u64 {
        match handle_message(
            ClientMessage::CreateGame {
                dice_seeds: Some((1, 2)),
            },
            registry,
        ) {
            ServerMessage::GameCreated { game_id } => game_id,
            other => panic!("unexpected reply {other:?}"),
        }
    }

    #[test]
    fn test_action_round_trip() {
        let registry = GameRegistry::default();
        let game_id = created_game(&registry);

        let reply = handle_message(
            ClientMessage::Action {
                game_id,
                action: GameAction::NextTurn {
                    robber_tile: 10,
                    rob_from: None,
                },
            },
            &registry,
        );
        let ServerMessage::ActionResult {
            success, events, ..
        } = reply
        else {
            panic!("expected an action result");
        };
        assert!(success);
        assert!(matches!(events[0], GameEvent::DiceRolled { player: 0, .. }));
    }

    #[test]
    fn test_rejected_action_reports_error() {
        let registry = GameRegistry::default();
        let game_id = created_game(&registry);

        let reply = handle_message(
            ClientMessage::Action {
                game_id,
                action: GameAction::EndTurn,
            },
            &registry,
        );
        assert!(matches!(
            reply,
            ServerMessage::ActionResult {
                success: false,
                error: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_bad_robber_target_still_reports_roll() {
        let registry = GameRegistry::default();
        let mut rejected = 0;

        for seed in 0..100 {
            let game_id = match handle_message(
                ClientMessage::CreateGame {
                    dice_seeds: Some((seed, seed + 1000)),
                },
                &registry,
            ) {
                ServerMessage::GameCreated { game_id } => game_id,
                other => panic!("unexpected reply {other:?}"),
            };
            let reply = handle_message(
                ClientMessage::Action {
                    game_id,
                    action: GameAction::NextTurn {
                        robber_tile: 99,
                        rob_from: None,
                    },
                },
                &registry,
            );
            let ServerMessage::ActionResult {
                success, events, ..
            } = reply
            else {
                panic!("expected an action result");
            };
            assert!(matches!(
                events.first(),
                Some(GameEvent::DiceRolled { player: 0, .. })
            ));
            if !success {
                rejected += 1;
                assert!(matches!(
                    events.first(),
                    Some(GameEvent::DiceRolled { total: 7, .. })
                ));
            }
        }
        assert!(rejected > 0, "no seed rolled the robber");
    }

    #[test]
    fn test_unknown_game() {
        let registry = GameRegistry::default();
        assert!(matches!(
            handle_message(ClientMessage::GetState { game_id: 9 }, &registry),
            ServerMessage::Error { .. }
        ));
        assert!(matches!(
            handle_message(ClientMessage::DeleteGame { game_id: 9 }, &registry),
            ServerMessage::Error { .. }
        ));
    }

    #[test]
    fn test_get_state_and_delete() {
        let registry = GameRegistry::default();
        let game_id = created_game(&registry);

        match handle_message(ClientMessage::GetState { game_id }, &registry) {
            ServerMessage::GameState { state, .. } => assert_eq!(state.players.len(), 4),
            other => panic!("unexpected reply {other:?}"),
        }
        assert!(matches!(
            handle_message(ClientMessage::DeleteGame { game_id }, &registry),
            ServerMessage::GameDeleted { .. }
        ));
        assert!(registry.is_empty());
    }
}
