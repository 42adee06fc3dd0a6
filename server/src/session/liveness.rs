//! Liveness monitor: evicts players whose heartbeat went silent.

use std::sync::Arc;

use tokio::time::{Duration, Instant, MissedTickBehavior};

use super::store::SessionStore;

/// Run one eviction pass: remove every player idle for longer than
/// `timeout` and close the connection it was bound to.
///
/// Closing a kicked player's connection ends its socket task, which then
/// releases every other player joined through that same connection, even
/// ones with a fresh heartbeat.
///
/// Returns the ids of the evicted players.
pub async fn sweep(store: &SessionStore, timeout: Duration) -> Vec<String> {
    let evicted = store.evict_expired(Instant::now(), timeout).await;
    evicted
        .into_iter()
        .map(|e| {
            tracing::warn!(
                player_id = %e.player_id,
                idle_ms = e.idle.as_millis() as u64,
                timeout_ms = timeout.as_millis() as u64,
                "kicking inactive player"
            );
            if let Some(connection) = e.connection {
                if connection.close() {
                    tracing::debug!(conn = connection.id(), "closed connection of kicked player");
                }
            }
            e.player_id
        })
        .collect()
}

/// Sweep the roster every `interval` until the task is aborted.
pub async fn run_liveness_monitor(store: Arc<SessionStore>, interval: Duration, timeout: Duration) {
    tracing::info!(
        interval_ms = interval.as_millis() as u64,
        timeout_ms = timeout.as_millis() as u64,
        "liveness monitor started"
    );
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        sweep(&store, timeout).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Connection;

    const INTERVAL: Duration = Duration::from_millis(500);
    const TIMEOUT: Duration = Duration::from_millis(2000);

    #[tokio::test(start_paused = true)]
    async fn silent_player_is_kicked_and_its_connection_closed() {
        let store = Arc::new(SessionStore::new());
        let alice_conn = Connection::new();
        let bob_conn = Connection::new();
        store.join("alice", Some(&alice_conn)).await.unwrap();
        store.join("bob", Some(&bob_conn)).await.unwrap();
        store.start().await.unwrap();

        let monitor = tokio::spawn(run_liveness_monitor(store.clone(), INTERVAL, TIMEOUT));

        // alice keeps sending keepAlive, bob goes quiet
        for _ in 0..8 {
            tokio::time::sleep(Duration::from_millis(400)).await;
            assert!(store.heartbeat("alice").await);
        }

        let roster = store.roster().await;
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].id, "alice");
        assert!(bob_conn.is_closed());
        assert!(!alice_conn.is_closed());
        assert!(!store.heartbeat("bob").await);
        monitor.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn all_expired_players_go_in_the_same_tick() {
        let store = SessionStore::new();
        for id in ["a", "b", "c"] {
            store.join(id, None).await.unwrap();
        }
        tokio::time::advance(TIMEOUT + Duration::from_millis(1)).await;
        let mut kicked = sweep(&store, TIMEOUT).await;
        kicked.sort();
        assert_eq!(kicked, vec!["a", "b", "c"]);
        assert!(store.roster().await.is_empty());
        assert!(sweep(&store, TIMEOUT).await.is_empty());
    }
}
