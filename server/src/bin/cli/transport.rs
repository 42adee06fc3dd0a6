use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use url::Url;

use planet_shared::{Action, ActionMsg, ServerMsg};

use super::utils::MessagePrinter;

/// Try to build a websocket URL from a base string (like "localhost:1323" or "http://host:1323")
pub fn build_ws_url(base: &str) -> anyhow::Result<Url> {
    let mut url = Url::parse(base).or_else(|_| Url::parse(&format!("http://{}", base)))?;

    match url.scheme() {
        "http" => url.set_scheme("ws").ok(),
        "https" => url.set_scheme("wss").ok(),
        "ws" | "wss" => Some(()),
        _ => None,
    }
    .ok_or_else(|| anyhow::anyhow!("Unsupported URL scheme: {}", url.scheme()))?;

    // Force path to /ws
    if url.path() != "/ws" {
        url.set_path("/ws");
    }
    Ok(url)
}

fn encode(action: Action) -> anyhow::Result<Message> {
    let txt = serde_json::to_string(&ActionMsg::from(action))?;
    Ok(Message::Text(txt))
}

/// Connect, send the actions in order and print server messages until
/// `wait_ms` pass without one.
pub async fn run_once_ws(
    server: &str,
    actions: Vec<Action>,
    wait_ms: u64,
    printer: &mut MessagePrinter,
) -> anyhow::Result<()> {
    let ws_url = build_ws_url(server)?;
    let (ws_stream, _resp) = tokio_tungstenite::connect_async(ws_url.as_str()).await?;
    let (mut write, mut read) = ws_stream.split();

    for action in actions {
        write.send(encode(action)?).await?;
    }

    loop {
        match tokio::time::timeout(Duration::from_millis(wait_ms), read.next()).await {
            Ok(Some(Ok(Message::Text(txt)))) => printer.handle_text(&txt),
            Ok(Some(Ok(_other))) => { /* ignore */ }
            Ok(Some(Err(e))) => {
                eprintln!("WebSocket error: {}", e);
                break;
            }
            Ok(None) => break, // socket closed
            Err(_) => break,   // timeout
        }
    }

    let _ = write.close().await;
    Ok(())
}

/// Print server messages until the socket closes. With a player name, join
/// first and send keepAlive on a timer so the server does not kick us.
pub async fn watch_ws(
    server: &str,
    name: Option<String>,
    keep_alive: Duration,
    printer: &mut MessagePrinter,
) -> anyhow::Result<()> {
    let ws_url = build_ws_url(server)?;
    let (ws_stream, _resp) = tokio_tungstenite::connect_async(ws_url.as_str()).await?;
    let (mut write, mut read) = ws_stream.split();
    eprintln!("Connected to WebSocket {}", ws_url);

    if let Some(player_id) = &name {
        write
            .send(encode(Action::Join {
                player_id: player_id.clone(),
            })?)
            .await?;
    }

    let mut ticker = tokio::time::interval(keep_alive);
    loop {
        tokio::select! {
            _ = ticker.tick(), if name.is_some() => {
                if let Some(player_id) = &name {
                    write.send(encode(Action::KeepAlive { player_id: player_id.clone() })?).await?;
                }
            }
            msg = read.next() => match msg {
                Some(Ok(Message::Text(txt))) => printer.handle_text(&txt),
                Some(Ok(Message::Close(_))) | None => {
                    eprintln!("Server closed the connection");
                    break;
                }
                Some(Ok(_other)) => { /* ignore non-text frames */ }
                Some(Err(e)) => {
                    eprintln!("WebSocket error: {}", e);
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Helper used by the printer: decode a raw text frame.
pub fn decode_server_msg(txt: &str) -> Option<ServerMsg> {
    serde_json::from_str(txt).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_url_from_http_base() {
        let url = build_ws_url("http://localhost:1323").unwrap();
        assert_eq!(url.as_str(), "ws://localhost:1323/ws");
    }

    #[test]
    fn ws_url_from_bare_host() {
        let url = build_ws_url("example.com:8080").unwrap();
        assert_eq!(url.as_str(), "ws://example.com:8080/ws");
    }

    #[test]
    fn wss_is_kept() {
        let url = build_ws_url("wss://example.com/ws").unwrap();
        assert_eq!(url.as_str(), "wss://example.com/ws");
    }

    #[test]
    fn unsupported_scheme_is_rejected() {
        assert!(build_ws_url("ftp://example.com").is_err());
    }
}
