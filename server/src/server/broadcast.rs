//! Broadcast loop: pushes the item list to one connection at a fixed cadence
//! while the session runs, and forwards out-of-band messages (the roster
//! after a start) as soon as they are published.

use futures::{Sink, SinkExt};
use planet_shared::ServerMsg;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::MissedTickBehavior;

use super::state::AppState;

/// Run until the sink fails (the client went away) or the server-wide
/// broadcaster is gone. A send failure is returned to the caller, which
/// treats it as a disconnect.
pub async fn run_broadcast_loop<S>(state: &AppState, sink: &mut S) -> Result<(), S::Error>
where
    S: Sink<ServerMsg> + Unpin,
{
    let mut running = state.session.subscribe_running();
    let mut out_of_band = state.broadcaster.subscribe();
    let mut ticker = tokio::time::interval(state.timings().broadcast_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut was_running = false;
    loop {
        let is_running = *running.borrow_and_update();
        if is_running && !was_running {
            // first snapshot one full interval after the start, so the
            // roster goes out ahead of it
            ticker.reset();
        }
        was_running = is_running;
        tokio::select! {
            biased;

            msg = out_of_band.recv() => match msg {
                Ok(msg) => sink.send(msg).await?,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "broadcast receiver lagged");
                }
                Err(RecvError::Closed) => return Ok(()),
            },

            // Idle while stopped: wait for the flag instead of ticking.
            changed = running.changed(), if !is_running => {
                if changed.is_err() {
                    return Ok(());
                }
            }

            _ = ticker.tick(), if is_running => {
                let snapshot = state.session.snapshot().await;
                if snapshot.running {
                    sink.send(ServerMsg::Items(snapshot.items)).await?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::mpsc;
    use std::time::Duration;

    fn drain(rx: &mut mpsc::UnboundedReceiver<ServerMsg>) -> Vec<ServerMsg> {
        let mut out = Vec::new();
        while let Ok(Some(msg)) = rx.try_next() {
            out.push(msg);
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn idle_session_sends_nothing() {
        let state = AppState::default();
        let (mut tx, mut rx) = mpsc::unbounded();
        let task = {
            let state = state.clone();
            tokio::spawn(async move { run_broadcast_loop(&state, &mut tx).await })
        };
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(drain(&mut rx).is_empty());
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn roster_precedes_periodic_snapshots() {
        let state = AppState::default();
        let (mut tx, mut rx) = mpsc::unbounded();
        let task = {
            let state = state.clone();
            tokio::spawn(async move { run_broadcast_loop(&state, &mut tx).await })
        };
        tokio::task::yield_now().await;

        state.session.join("alice", None).await.unwrap();
        let roster = state.session.start().await.unwrap();
        state
            .broadcaster
            .send(ServerMsg::Roster(roster.clone()))
            .unwrap();
        let rock = state.session.drop_item("rock", 45.0, 10.0).await;

        tokio::time::sleep(Duration::from_millis(350)).await;
        let sent = drain(&mut rx);
        assert_eq!(sent.first(), Some(&ServerMsg::Roster(roster)));
        let snapshots: Vec<_> = sent[1..].to_vec();
        assert!(
            (2..=3).contains(&snapshots.len()),
            "unexpected snapshot count {}",
            snapshots.len()
        );
        assert!(snapshots
            .iter()
            .all(|msg| *msg == ServerMsg::Items(vec![rock.clone()])));

        // stopping halts the cadence
        state.session.stop().await;
        tokio::time::sleep(Duration::from_millis(150)).await;
        drain(&mut rx);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(drain(&mut rx).is_empty());
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn send_failure_ends_the_loop() {
        let state = AppState::default();
        state.session.join("alice", None).await.unwrap();
        state.session.start().await.unwrap();

        let (mut tx, rx) = mpsc::unbounded::<ServerMsg>();
        drop(rx);
        let result = tokio::time::timeout(
            Duration::from_secs(1),
            run_broadcast_loop(&state, &mut tx),
        )
        .await
        .expect("loop should stop on its own");
        assert!(result.is_err());
    }
}
