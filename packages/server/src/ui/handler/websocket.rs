//! WebSocket connection handlers.
//!
//! One socket = one connection id. The handler turns socket lifecycle into
//! room events: upgrade → connect, text frame → message, close/error →
//! disconnect.

use std::sync::Arc;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, GameCommand, RoomKey},
    infrastructure::dto::decode_command,
    ui::state::AppState,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(room_key): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> RoomKey (Domain Model)
    let room_key = match RoomKey::try_from(room_key.clone()) {
        Ok(key) => key,
        Err(e) => {
            tracing::warn!("Invalid room key '{}': {}", room_key, e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, room_key)))
}

/// Spawns a task that drains the outbound channel into the WebSocket sink.
///
/// Ends when the channel closes (connection unregistered) or the socket
/// rejects a write.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Decode a text frame into a room command.
///
/// Malformed frames and unsupported commands are logged and dropped.
fn decode_frame(connection_id: &ConnectionId, text: &str) -> Option<GameCommand> {
    match decode_command(text) {
        Ok(Some(command)) => Some(command),
        Ok(None) => {
            tracing::debug!("Ignoring unsupported message from '{}'", connection_id);
            None
        }
        Err(e) => {
            tracing::warn!("Dropping message from '{}': {}", connection_id, e);
            None
        }
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, room_key: RoomKey) {
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mpsc::unbounded_channel();

    // Join the room before reading anything from the socket. The host notice
    // and roster queue up in `rx` until the pusher loop starts.
    if let Err(e) = state
        .connect_participant_usecase
        .execute(&room_key, connection_id.clone(), tx)
        .await
    {
        tracing::warn!(
            "Rejected connection '{}' to room '{}': {}",
            connection_id,
            room_key,
            e
        );
        return;
    }
    tracing::info!("Connection '{}' opened in room '{}'", connection_id, room_key);

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);

    let recv_state = state.clone();
    let recv_room_key = room_key.clone();
    let recv_connection_id = connection_id.clone();

    // Spawn a task to receive messages from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error on '{}': {}", recv_connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received text from '{}': {}", recv_connection_id, text);
                    let Some(command) = decode_frame(&recv_connection_id, text.as_str()) else {
                        continue;
                    };
                    if let Err(e) = recv_state
                        .relay_message_usecase
                        .execute(&recv_room_key, recv_connection_id.clone(), command)
                        .await
                    {
                        tracing::warn!("Failed to relay message: {}", e);
                    }
                }
                Message::Ping(_) => {
                    // Pong is sent automatically by axum
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", recv_connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    match state
        .disconnect_participant_usecase
        .execute(&room_key, connection_id.clone())
        .await
    {
        Ok(()) => {
            tracing::info!("Connection '{}' closed in room '{}'", connection_id, room_key);
        }
        Err(e) => {
            tracing::warn!("Failed to disconnect '{}': {}", connection_id, e);
        }
    }
}
