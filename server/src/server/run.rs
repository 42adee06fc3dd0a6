// Run and routing helpers (build_router, run_server).

use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::services::ServeDir;

use crate::server::AppState;
use anyhow::{Context, Result};

pub fn build_router(state: AppState) -> Router {
    // Static client assets; relative paths resolve against the process CWD.
    let serve_dir =
        ServeDir::new(&state.config.public_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/health", get(crate::server::http::health_handler))
        .route("/ws", get(crate::server::ws::ws_handler))
        .route("/api/state", get(crate::server::http::state_handler))
        .fallback_service(serve_dir)
        .with_state(state)
}

pub async fn run_server(addr: SocketAddr, state: AppState) -> Result<()> {
    let timings = state.timings();
    let app = build_router(state.clone());

    let display_addr = if addr.ip().to_string() == "127.0.0.1" {
        format!("localhost:{}", addr.port())
    } else {
        addr.to_string()
    };

    tracing::info!(
        display_addr = %display_addr,
        public_dir = %state.config.public_dir.display(),
        broadcast_ms = timings.broadcast_interval.as_millis() as u64,
        liveness_ms = timings.liveness_interval.as_millis() as u64,
        timeout_ms = timings.heartbeat_timeout.as_millis() as u64,
        "planet server running"
    );

    println!("\n\x1b[1;36m=== Planet Server ===\x1b[0m");
    println!(
        "\x1b[1mURL:\x1b[0m       \x1b[4;34mhttp://{}\x1b[0m",
        display_addr
    );
    println!(
        "\x1b[1mSocket:\x1b[0m    \x1b[4;34mws://{}/ws\x1b[0m",
        display_addr
    );
    println!("\x1b[1;36m=====================\x1b[0m\n");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", display_addr))?;
    axum::serve(listener, app)
        .await
        .with_context(|| "serving HTTP/WebSocket traffic")?;
    Ok(())
}
