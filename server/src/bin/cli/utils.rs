use std::io::IsTerminal;

use planet_server::pretty::format_server_msg;
use planet_shared::ServerMsg;

use super::transport::decode_server_msg;

pub struct MessagePrinter {
    json: bool,
    last_items: Option<usize>,
}

impl MessagePrinter {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            last_items: None,
        }
    }

    pub fn handle_text(&mut self, txt: &str) {
        match decode_server_msg(txt) {
            Some(msg) => self.handle(&msg),
            None => eprintln!("Unrecognised server message: {}", txt),
        }
    }

    /// Print a roster every time; print an item list only when its length
    /// changed, so a 100ms cadence does not flood the terminal.
    pub fn handle(&mut self, msg: &ServerMsg) {
        if let ServerMsg::Items(items) = msg {
            if self.last_items == Some(items.len()) {
                return;
            }
            self.last_items = Some(items.len());
        }
        if self.json {
            match serde_json::to_string_pretty(msg) {
                Ok(json_str) => println!("{}", json_str),
                Err(e) => eprintln!("Failed to serialize message to JSON: {}", e),
            }
        } else {
            println!(
                "{}",
                format_server_msg(msg, std::io::stdout().is_terminal())
            );
        }
    }
}
