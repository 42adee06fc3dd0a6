//! Per-socket connection handles.
//!
//! A `Connection` is owned by the socket task that serves it. Players only
//! keep a `ConnectionRef` (a weak handle) so the session can close a socket on
//! eviction without keeping it alive.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use tokio::sync::watch;

pub type ConnectionId = u64;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    closed: watch::Sender<bool>,
}

impl Connection {
    pub fn new() -> Arc<Self> {
        let (closed, _rx) = watch::channel(false);
        Arc::new(Self {
            id: NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
            closed,
        })
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Ask the owning socket task to shut down. Returns `true` only for the
    /// call that actually closed the connection.
    pub fn close(&self) -> bool {
        !self.closed.send_replace(true)
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Resolves once `close` has been called.
    pub async fn closed(&self) {
        let mut rx = self.closed.subscribe();
        let _ = rx.wait_for(|closed| *closed).await;
    }

    pub fn downgrade(self: &Arc<Self>) -> ConnectionRef {
        ConnectionRef {
            id: self.id,
            handle: Arc::downgrade(self),
        }
    }
}

/// Weak handle to a connection, held by the player bound to it.
#[derive(Clone, Debug)]
pub struct ConnectionRef {
    id: ConnectionId,
    handle: Weak<Connection>,
}

impl ConnectionRef {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn upgrade(&self) -> Option<Arc<Connection>> {
        self.handle.upgrade()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn close_is_idempotent() {
        let conn = Connection::new();
        assert!(!conn.is_closed());
        assert!(conn.close());
        assert!(!conn.close());
        assert!(conn.is_closed());
    }

    #[test]
    fn ids_are_distinct() {
        let a = Connection::new();
        let b = Connection::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn weak_ref_does_not_keep_connection_alive() {
        let conn = Connection::new();
        let link = conn.downgrade();
        assert_eq!(link.id(), conn.id());
        assert!(link.upgrade().is_some());
        drop(conn);
        assert!(link.upgrade().is_none());
    }

    #[tokio::test]
    async fn closed_resolves_after_close() {
        let conn = Connection::new();
        let waiter = {
            let conn = conn.clone();
            tokio::spawn(async move { conn.closed().await })
        };
        conn.close();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("closed() should resolve")
            .unwrap();
    }
}
