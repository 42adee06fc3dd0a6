// Server state shared by every connection handler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use planet_shared::{ServerMsg, SessionView};
use tokio::sync::broadcast;

use crate::config::{Config, Timings};
use crate::connection::Connection;
use crate::session::{liveness, SessionStore};

pub const CHANNEL_BUFFER_SIZE: usize = 64;

/// Shared application state exposed to handlers.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionStore>,
    /// Out-of-band messages for every connection (the roster after a start).
    pub broadcaster: broadcast::Sender<ServerMsg>,
    pub config: Arc<Config>,
    monitor_started: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let (tx, _rx) = broadcast::channel(CHANNEL_BUFFER_SIZE);
        Self {
            session: Arc::new(SessionStore::new()),
            broadcaster: tx,
            config: Arc::new(config),
            monitor_started: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn timings(&self) -> Timings {
        self.config.timings()
    }

    /// Spawn the liveness monitor unless it already runs.
    pub(crate) fn ensure_liveness_monitor(&self) {
        if self
            .monitor_started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        let timings = self.timings();
        tokio::spawn(liveness::run_liveness_monitor(
            self.session.clone(),
            timings.liveness_interval,
            timings.heartbeat_timeout,
        ));
    }

    pub async fn view(&self) -> SessionView {
        let snapshot = self.session.snapshot().await;
        SessionView {
            running: snapshot.running,
            players: self.session.roster().await,
            items: snapshot.items,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(Config::default())
    }
}

/// Drop every player bound to `connection` and close it. Used by both the
/// disconnect path and server-side kicks; calling it twice is harmless.
pub async fn release_connection(state: &AppState, connection: &Connection) {
    connection.close();
    for evicted in state.session.evict_connection(connection.id()).await {
        tracing::info!(
            player_id = %evicted.player_id,
            conn = connection.id(),
            "player left with its connection"
        );
    }
}
