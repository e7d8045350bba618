//! WebSocket connection handlers.
//!
//! Admission runs before the protocol upgrade so a refused connection
//! is answered with a plain HTTP status and never joins a room.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionIdFactory, Role, RoomCode},
    infrastructure::dto::websocket::{ClientEvent, ServerEvent},
    time::get_unix_timestamp,
    ui::state::{AppState, ConnectQuery, OccupantInfo},
    usecase::{Admission, AdmissionError, AdmitConnectionUseCase, DisconnectUseCase, RelayEventUseCase},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> RoomCode (Domain Model)
    let requested = match query.game {
        None => None,
        Some(raw) => match RoomCode::new(raw.clone()) {
            Ok(code) => Some(code),
            Err(e) => {
                tracing::warn!("Malformed room code '{}': {}", raw, e);
                return Err(StatusCode::BAD_REQUEST);
            }
        },
    };

    // The relay assigns every connection a fresh identifier
    let connection_id = match ConnectionIdFactory::generate() {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to generate connection id: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    // Use AdmitConnectionUseCase to resolve room and role
    let admit_usecase = AdmitConnectionUseCase::new(
        state.lifecycle.clone(),
        state.store.clone(),
        state.session_ttl,
    );

    let admission = match admit_usecase.execute(connection_id.clone(), requested).await {
        Ok(admission) => admission,
        Err(AdmissionError::RoomNotFound) => {
            tracing::warn!("Connection '{}' requested an unknown room", connection_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(AdmissionError::RoomFull) => {
            tracing::warn!("Connection '{}' refused: room is full", connection_id);
            return Err(StatusCode::CONFLICT);
        }
        Err(e) => {
            tracing::error!("Admission failed for '{}': {}", connection_id, e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    // Create a channel for this connection and register it in the room
    // before the upgrade, so peer broadcasts cannot race past it
    let (tx, rx) = mpsc::unbounded_channel();
    {
        let mut rooms = state.rooms.lock().await;
        rooms
            .entry(admission.room.code.as_str().to_string())
            .or_default()
            .insert(
                connection_id.as_str().to_string(),
                OccupantInfo {
                    sender: tx,
                    connected_at: get_unix_timestamp(),
                },
            );
    }

    tracing::info!(
        "Connection '{}' admitted to room '{}' as {:?}",
        connection_id,
        admission.room.code,
        admission.role
    );

    // A client can drop before the 101 completes; the upgrade callback
    // then never runs, so the admitted records and registry entry must
    // be torn down from here
    let ws = ws.on_failed_upgrade({
        let state = state.clone();
        let connection_id = connection_id.clone();
        let room_key = admission.room.code.as_str().to_string();
        let role = admission.role;
        move |error| {
            tracing::warn!("Upgrade failed for '{}': {}", connection_id, error);
            tokio::spawn(async move {
                handle_disconnect(&state, &connection_id, &room_key, role).await;
            });
        }
    });
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connection_id, admission, rx)))
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    admission: Admission,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    let (mut sender, mut receiver) = socket.split();
    let room_key = admission.room.code.as_str().to_string();
    let role = admission.role;

    // Scope the new connection: room code, role, then peer presence.
    // These go straight to the socket so their order is guaranteed.
    let initial = [
        ServerEvent::RoomId {
            room_id: room_key.clone(),
        },
        ServerEvent::Role { role },
        ServerEvent::PeerPresence {
            present: admission.peer_present(),
        },
    ];
    for event in &initial {
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize event: {}", e);
                handle_disconnect(&state, &connection_id, &room_key, role).await;
                return;
            }
        };
        // A send failure here means the socket died mid-handshake; the
        // admitted records still need the full disconnect sequence
        if let Err(e) = sender.send(Message::Text(json.into())).await {
            tracing::error!("Failed to send to '{}': {}", connection_id, e);
            handle_disconnect(&state, &connection_id, &room_key, role).await;
            return;
        }
    }

    // Tell the existing occupant a peer arrived; the room code is
    // re-broadcast room-wide on every admission
    broadcast_to_others(
        &state,
        &room_key,
        connection_id.as_str(),
        &[
            ServerEvent::RoomId {
                room_id: room_key.clone(),
            },
            ServerEvent::PeerPresence { present: true },
            ServerEvent::PeerConnected { role },
        ],
    )
    .await;

    let connection_id_clone = connection_id.clone();
    let state_clone = state.clone();
    let room_key_clone = room_key.clone();
    let room_code = admission.room.code.clone();

    // Spawn a task to receive events from this connection
    let mut recv_task = tokio::spawn(async move {
        let relay_usecase = RelayEventUseCase::new(state_clone.lifecycle.clone());
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    let event = match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => event,
                        Err(e) => {
                            // Unknown payloads are dropped, not fatal
                            tracing::warn!(
                                "Unparseable event from '{}': {}",
                                connection_id_clone,
                                e
                            );
                            continue;
                        }
                    };

                    if let ClientEvent::Ping = event {
                        // Liveness probe, answered to the sender only
                        send_to_self(
                            &state_clone,
                            &room_key_clone,
                            connection_id_clone.as_str(),
                            &ServerEvent::Pong,
                        )
                        .await;
                        continue;
                    }

                    let relayed = relay_usecase.execute(&room_code, &event).await;
                    broadcast_to_others(
                        &state_clone,
                        &room_key_clone,
                        connection_id_clone.as_str(),
                        std::slice::from_ref(&relayed),
                    )
                    .await;
                }
                Message::Ping(_) => {
                    // Transport-level ping/pong is handled by axum
                    tracing::debug!("Received ping");
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id_clone);
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to forward relayed events to this connection
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    handle_disconnect(&state, &connection_id, &room_key, role).await;
}

/// Tear down a departed connection and notify its peer.
///
/// The registry entry is removed first so the departed socket never
/// receives its own disconnect broadcast; the peer is notified before
/// the store records are released, while the room is still queryable.
async fn handle_disconnect(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    room_key: &str,
    role: Role,
) {
    let connected_at = {
        let mut rooms = state.rooms.lock().await;
        let connected_at = rooms.get_mut(room_key).and_then(|occupants| {
            occupants
                .remove(connection_id.as_str())
                .map(|occupant| occupant.connected_at)
        });
        if rooms.get(room_key).is_some_and(|occupants| occupants.is_empty()) {
            rooms.remove(room_key);
        }
        connected_at
    };

    let disconnect_usecase = DisconnectUseCase::new(state.lifecycle.clone(), state.store.clone());

    let departure = match disconnect_usecase.lookup(connection_id).await {
        Ok(Some(departure)) => departure,
        Ok(None) => {
            // Already cleaned up; nothing to release or announce
            tracing::debug!("No session for departing connection '{}'", connection_id);
            return;
        }
        Err(e) => {
            tracing::error!("Disconnect lookup failed for '{}': {}", connection_id, e);
            return;
        }
    };

    // The Second slot opening up also flips peer presence for First
    let mut events = Vec::with_capacity(2);
    if role == Role::Second {
        events.push(ServerEvent::PeerPresence { present: false });
    }
    events.push(ServerEvent::PeerDisconnected { role });
    broadcast_to_others(state, room_key, connection_id.as_str(), &events).await;

    match disconnect_usecase.complete(connection_id, &departure).await {
        Ok(()) => {
            let held_for_ms = connected_at.map(|t| get_unix_timestamp() - t);
            tracing::info!(
                "Connection '{}' disconnected from room '{}' as {:?} (held {:?} ms)",
                connection_id,
                room_key,
                role,
                held_for_ms
            );
        }
        Err(e) => {
            tracing::error!("Disconnect cleanup failed for '{}': {}", connection_id, e);
        }
    }
}

/// Send events to every other occupant of the room.
async fn broadcast_to_others(
    state: &Arc<AppState>,
    room_key: &str,
    sender_id: &str,
    events: &[ServerEvent],
) {
    let rooms = state.rooms.lock().await;
    let Some(occupants) = rooms.get(room_key) else {
        return;
    };
    for event in events {
        let json = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize event: {}", e);
                return;
            }
        };
        for (id, occupant) in occupants.iter() {
            if id != sender_id && occupant.sender.send(json.clone()).is_err() {
                tracing::warn!("Failed to send event to connection '{}'", id);
            }
        }
    }
}

/// Send one event back to the originating connection.
async fn send_to_self(state: &Arc<AppState>, room_key: &str, sender_id: &str, event: &ServerEvent) {
    let rooms = state.rooms.lock().await;
    let Some(occupant) = rooms
        .get(room_key)
        .and_then(|occupants| occupants.get(sender_id))
    else {
        return;
    };
    let json = match serde_json::to_string(event) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to serialize event: {}", e);
            return;
        }
    };
    if occupant.sender.send(json).is_err() {
        tracing::warn!("Failed to send event to connection '{}'", sender_id);
    }
}
