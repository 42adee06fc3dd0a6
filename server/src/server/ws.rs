// WebSocket handler: one task per socket running the action dispatcher and
// the broadcast loop side by side.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{future, SinkExt, Stream, StreamExt};
use owo_colors::OwoColorize;
use planet_shared::ServerMsg;

use super::broadcast::run_broadcast_loop;
use super::dispatch;
use super::state::{release_connection, AppState};
use crate::connection::Connection;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection = Connection::new();
    let hello = format!("{} {}", "[CONNECT]".bold().green(), "Client".bold());
    tracing::info!(conn = connection.id(), "{}", hello);

    let (sender, receiver) = socket.split();
    let mut outbound = sender.with(|msg: ServerMsg| future::ready(encode_server_msg(&msg)));

    tokio::select! {
        res = receive_actions(&state, &connection, receiver) => match res {
            Ok(()) => tracing::debug!(conn = connection.id(), "client closed the socket"),
            Err(e) => tracing::info!(conn = connection.id(), error = %e, "receive failed"),
        },
        res = run_broadcast_loop(&state, &mut outbound) => {
            if let Err(e) = res {
                tracing::info!(conn = connection.id(), error = %e, "send failed");
            }
        }
        _ = connection.closed() => {
            tracing::debug!(conn = connection.id(), "connection closed by server");
        }
    }

    release_connection(&state, &connection).await;
    let _ = outbound.close().await;
    let bye = format!("{} {}", "[DISCONNECT]".bold().red(), "Client".bold());
    tracing::info!(conn = connection.id(), "{}", bye);
}

fn encode_server_msg(msg: &ServerMsg) -> anyhow::Result<Message> {
    Ok(Message::Text(serde_json::to_string(msg)?))
}

/// Inbound half of a connection. Returns `Ok` when the client closes the
/// socket and `Err` on a transport receive failure; malformed messages never
/// end it.
async fn receive_actions<S>(
    state: &AppState,
    connection: &Arc<Connection>,
    mut receiver: S,
) -> Result<(), axum::Error>
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    while let Some(msg) = receiver.next().await {
        match msg? {
            Message::Text(txt) => dispatch::handle_text(state, connection, &txt).await,
            Message::Close(_) => return Ok(()),
            // binary, ping and pong frames carry no actions
            _ => {}
        }
    }
    Ok(())
}
