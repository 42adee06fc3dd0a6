//! Human-readable rendering of server messages for consoles.

use owo_colors::OwoColorize;
use planet_shared::{Item, PlayerPosition, ServerMsg};

fn format_item(item: &Item, color: bool) -> String {
    let id = if color {
        item.id.dimmed().to_string()
    } else {
        item.id.clone()
    };
    let kind = if color {
        item.kind.yellow().to_string()
    } else {
        item.kind.clone()
    };
    format!("{} {} @ {:.1}° y={:.2}", id, kind, item.angle, item.y)
}

pub fn format_items(items: &[Item], color: bool) -> String {
    if items.is_empty() {
        return "no items on the ground".to_string();
    }
    let header = format!("{} item(s):", items.len());
    let header = if color {
        header.bold().to_string()
    } else {
        header
    };
    let mut lines = vec![header];
    lines.extend(items.iter().map(|i| format!("  {}", format_item(i, color))));
    lines.join("\n")
}

pub fn format_roster(roster: &[PlayerPosition], color: bool) -> String {
    let players = roster
        .iter()
        .map(|p| {
            let name = if color {
                p.id.bold().to_string()
            } else {
                p.id.clone()
            };
            format!("{} at {}°", name, p.initial_position)
        })
        .collect::<Vec<_>>()
        .join(", ");
    let label = if color {
        "[ROSTER]".bold().cyan().to_string()
    } else {
        "[ROSTER]".to_string()
    };
    format!("{} {}", label, players)
}

pub fn format_server_msg(msg: &ServerMsg, color: bool) -> String {
    match msg {
        ServerMsg::Items(items) => format_items(items, color),
        ServerMsg::Roster(roster) => format_roster(roster, color),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_line() {
        let roster = vec![
            PlayerPosition {
                id: "alice".into(),
                initial_position: 0.0,
            },
            PlayerPosition {
                id: "bob".into(),
                initial_position: 180.0,
            },
        ];
        assert_eq!(
            format_roster(&roster, false),
            "[ROSTER] alice at 0°, bob at 180°"
        );
    }

    #[test]
    fn items_block() {
        let items = vec![Item {
            id: "Ab3dEf9H".into(),
            kind: "rock".into(),
            angle: 45.0,
            y: 10.0,
        }];
        assert_eq!(
            format_items(&items, false),
            "1 item(s):\n  Ab3dEf9H rock @ 45.0° y=10.00"
        );
        assert_eq!(format_items(&[], false), "no items on the ground");
    }
}
