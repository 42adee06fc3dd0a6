//! The session state store: single source of truth for players, items and
//! the running flag.
//!
//! Every operation takes the one `RwLock` around [`Session`] for its whole
//! duration and never awaits anything else while holding it, so operations
//! are atomic with respect to each other. Callers only ever get copies out.

use std::sync::Arc;

use planet_shared::{Item, PlayerPosition};
use tokio::sync::{watch, RwLock};
use tokio::time::{Duration, Instant};

use super::ids::IdGenerator;
use crate::connection::{Connection, ConnectionId, ConnectionRef};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("missing player id in join action")]
    EmptyId,
    #[error("no player joined the game, cannot start")]
    NoPlayers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    /// The id was already present: heartbeat refreshed and connection rebound.
    Refreshed,
}

#[derive(Debug)]
struct Player {
    id: String,
    initial_position: f64,
    last_heartbeat: Instant,
    connection: Option<ConnectionRef>,
}

#[derive(Debug, Default)]
struct Session {
    running: bool,
    // join order matters for initial position assignment
    players: Vec<Player>,
    items: Vec<Item>,
    ids: IdGenerator,
}

/// Read-consistent copy of what is broadcast on every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub items: Vec<Item>,
    pub running: bool,
}

/// A player removed from the roster, with the connection it was bound to.
#[derive(Debug)]
pub struct Evicted {
    pub player_id: String,
    pub idle: Duration,
    pub connection: Option<Arc<Connection>>,
}

#[derive(Debug)]
pub struct SessionStore {
    session: RwLock<Session>,
    running_tx: watch::Sender<bool>,
}

impl Default for SessionStore {
    fn default() -> Self {
        let (running_tx, _rx) = watch::channel(false);
        Self {
            session: RwLock::new(Session::default()),
            running_tx,
        }
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player, or refresh it if the id is already in the roster.
    pub async fn join(
        &self,
        player_id: &str,
        connection: Option<&Arc<Connection>>,
    ) -> Result<JoinOutcome, SessionError> {
        if player_id.is_empty() {
            return Err(SessionError::EmptyId);
        }
        let link = connection.map(Connection::downgrade);
        let mut session = self.session.write().await;
        let now = Instant::now();
        if let Some(player) = session.players.iter_mut().find(|p| p.id == player_id) {
            player.last_heartbeat = now;
            if link.is_some() {
                player.connection = link;
            }
            return Ok(JoinOutcome::Refreshed);
        }
        session.players.push(Player {
            id: player_id.to_string(),
            initial_position: 0.0,
            last_heartbeat: now,
            connection: link,
        });
        Ok(JoinOutcome::Joined)
    }

    /// Start (or restart) the session.
    ///
    /// Clears the items, spreads the present players evenly around the planet
    /// in join order and returns the resulting roster.
    pub async fn start(&self) -> Result<Vec<PlayerPosition>, SessionError> {
        let mut session = self.session.write().await;
        let count = session.players.len();
        if count == 0 {
            return Err(SessionError::NoPlayers);
        }
        session.items.clear();
        let step = 360 / count;
        for (i, player) in session.players.iter_mut().enumerate() {
            player.initial_position = (i * step) as f64;
        }
        session.running = true;
        // published under the lock so the watch never disagrees with the store
        self.running_tx.send_replace(true);
        Ok(roster_of(&session))
    }

    /// Stop the session. Items and roster are kept for a later start.
    pub async fn stop(&self) {
        let mut session = self.session.write().await;
        session.running = false;
        self.running_tx.send_replace(false);
    }

    pub async fn drop_item(&self, kind: &str, angle: f64, y: f64) -> Item {
        let mut session = self.session.write().await;
        let item = Item {
            id: session.ids.next_id(),
            kind: kind.to_string(),
            angle: angle.rem_euclid(360.0),
            y,
        };
        session.items.push(item.clone());
        item
    }

    /// Remove the item with the given id. Returns `false` if no such item
    /// exists, which is not an error.
    pub async fn destroy_item(&self, item_id: &str) -> bool {
        let mut session = self.session.write().await;
        match session.items.iter().position(|item| item.id == item_id) {
            Some(index) => {
                session.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Refresh a player's heartbeat. Unknown (e.g. already evicted) players
    /// are left absent.
    pub async fn heartbeat(&self, player_id: &str) -> bool {
        let mut session = self.session.write().await;
        match session.players.iter_mut().find(|p| p.id == player_id) {
            Some(player) => {
                player.last_heartbeat = Instant::now();
                true
            }
            None => false,
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        let session = self.session.read().await;
        Snapshot {
            items: session.items.clone(),
            running: session.running,
        }
    }

    pub async fn roster(&self) -> Vec<PlayerPosition> {
        roster_of(&*self.session.read().await)
    }

    pub async fn is_running(&self) -> bool {
        self.session.read().await.running
    }

    /// Watch the running flag; used by broadcast loops to idle while stopped.
    pub fn subscribe_running(&self) -> watch::Receiver<bool> {
        self.running_tx.subscribe()
    }

    /// Remove one player. Evicting an absent player returns `None`.
    pub async fn evict(&self, player_id: &str) -> Option<Evicted> {
        let mut session = self.session.write().await;
        remove_players(&mut session.players, Instant::now(), |p| p.id == player_id)
            .into_iter()
            .next()
    }

    /// Remove every player bound to the given connection.
    pub async fn evict_connection(&self, connection: ConnectionId) -> Vec<Evicted> {
        let mut session = self.session.write().await;
        remove_players(&mut session.players, Instant::now(), |p| {
            p.connection.as_ref().map(ConnectionRef::id) == Some(connection)
        })
    }

    /// Remove every player whose last heartbeat is older than `timeout`.
    pub async fn evict_expired(&self, now: Instant, timeout: Duration) -> Vec<Evicted> {
        let mut session = self.session.write().await;
        remove_players(&mut session.players, now, |p| {
            now.saturating_duration_since(p.last_heartbeat) > timeout
        })
    }
}

fn roster_of(session: &Session) -> Vec<PlayerPosition> {
    session
        .players
        .iter()
        .map(|p| PlayerPosition {
            id: p.id.clone(),
            initial_position: p.initial_position,
        })
        .collect()
}

/// Partition the roster into kept and removed players in one pass; the kept
/// ones retain their join order.
fn remove_players(
    players: &mut Vec<Player>,
    now: Instant,
    mut doomed: impl FnMut(&Player) -> bool,
) -> Vec<Evicted> {
    let (removed, kept): (Vec<Player>, Vec<Player>) =
        std::mem::take(players).into_iter().partition(|p| doomed(p));
    *players = kept;
    removed
        .into_iter()
        .map(|p| Evicted {
            idle: now.saturating_duration_since(p.last_heartbeat),
            connection: p.connection.as_ref().and_then(ConnectionRef::upgrade),
            player_id: p.id,
        })
        .collect()
}
