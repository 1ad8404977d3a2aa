//! WebSocket lifecycle observer.
//!
//! # Responsibilities
//! - Accept upgrade requests on `/ws`
//! - Register the connection with the registry
//! - Hold the socket open until the peer or the network ends it
//!
//! # Design Decisions
//! - No application protocol: inbound frames are read and discarded
//! - Close frame, read error and end of stream all count as a disconnect
//! - The registry guard emits the Disconnected event, not this code

use std::net::SocketAddr;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        ConnectInfo, State,
    },
    response::IntoResponse,
};

use crate::http::server::AppState;
use crate::net::PendingConnection;

/// Path the upgrade handler is mounted on.
pub const WS_PATH: &str = "/ws";

/// Upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let pending = state.connections.open(remote_addr);
    ws.on_upgrade(move |socket| observe(socket, pending))
}

async fn observe(mut socket: WebSocket, pending: PendingConnection) {
    let guard = pending.connected();

    while let Some(frame) = socket.recv().await {
        match frame {
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!(connection_id = %guard.id(), error = %e, "WebSocket read error");
                break;
            }
        }
    }

    drop(guard);
}
