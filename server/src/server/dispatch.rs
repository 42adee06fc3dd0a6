//! Action dispatcher: turns inbound action messages into session store
//! operations.
//!
//! Nothing here is reported back to the client; every rejected action is
//! logged and absorbed.

use std::io::IsTerminal;
use std::sync::Arc;

use planet_shared::{Action, ActionMsg, PlayerPosition, ServerMsg, UnknownAction};

use super::state::AppState;
use crate::connection::Connection;
use crate::pretty;
use crate::session::{liveness, JoinOutcome, SessionError};

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("malformed action message: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    UnknownAction(#[from] UnknownAction),
}

pub fn decode_action(txt: &str) -> Result<Action, DispatchError> {
    let msg: ActionMsg = serde_json::from_str(txt)?;
    Ok(Action::try_from(msg)?)
}

/// Decode one text frame and apply it. Bad frames are logged and skipped.
pub async fn handle_text(state: &AppState, connection: &Arc<Connection>, txt: &str) {
    match decode_action(txt) {
        Ok(action) => handle_action(state, connection, action).await,
        Err(e) => {
            tracing::warn!(conn = connection.id(), error = %e, "ignoring inbound message");
            tracing::debug!(raw_in = %txt);
        }
    }
}

pub async fn handle_action(state: &AppState, connection: &Arc<Connection>, action: Action) {
    tracing::debug!(conn = connection.id(), action = ?action, "received action");
    let session = &state.session;
    match action {
        Action::Join { player_id } => match session.join(&player_id, Some(connection)).await {
            Ok(JoinOutcome::Joined) => {
                tracing::info!(%player_id, conn = connection.id(), "player joined the game")
            }
            Ok(JoinOutcome::Refreshed) => {
                tracing::info!(%player_id, conn = connection.id(), "player rejoined the game")
            }
            Err(e) => tracing::warn!(conn = connection.id(), error = %e, "join ignored"),
        },
        Action::Start => {
            // rejection is already logged by start_session
            if let Ok(roster) = start_session(state).await {
                tracing::debug!(conn = connection.id(), players = roster.len(), "start accepted");
            }
        }
        Action::Stop => {
            session.stop().await;
            tracing::info!(conn = connection.id(), "session stopped");
        }
        Action::Drop { kind, angle, y } => {
            let item = session.drop_item(&kind, angle, y).await;
            tracing::debug!(item_id = %item.id, kind = %item.kind, angle = item.angle, y = item.y, "item dropped");
        }
        Action::Destroy { item_id } => {
            if session.destroy_item(&item_id).await {
                tracing::debug!(%item_id, "item destroyed");
            } else {
                tracing::debug!(%item_id, "destroy for unknown item ignored");
            }
        }
        Action::KeepAlive { player_id } => {
            if !session.heartbeat(&player_id).await {
                tracing::debug!(%player_id, "keepAlive for unknown player ignored");
            }
        }
    }
}

/// Start the session and push the initial layout to every connection.
///
/// Players that went silent before the start are kicked first so they do not
/// get a slot on the planet.
pub async fn start_session(state: &AppState) -> Result<Vec<PlayerPosition>, SessionError> {
    liveness::sweep(&state.session, state.timings().heartbeat_timeout).await;
    match state.session.start().await {
        Ok(roster) => {
            let line = pretty::format_roster(&roster, std::io::stdout().is_terminal());
            tracing::info!(players = roster.len(), "session started");
            tracing::info!("{}", line);
            // No receivers simply means nobody is connected yet.
            let _ = state.broadcaster.send(ServerMsg::Roster(roster.clone()));
            state.ensure_liveness_monitor();
            Ok(roster)
        }
        Err(e) => {
            tracing::warn!(error = %e, "start rejected");
            Err(e)
        }
    }
}
