//! Client-server messaging protocol.

use serde::{Deserialize, Serialize};

use crate::item::Item;
use crate::player::PlayerPosition;

/// Raw inbound action record, exactly as it appears on the wire.
///
/// Older clients name the tag field `action` instead of `type`; both are
/// accepted.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ActionMsg {
    #[serde(rename = "type", alias = "action")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub extra: String,
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub y: f64,
}

/// A decoded client action.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Join { player_id: String },
    Start,
    Stop,
    Drop { kind: String, angle: f64, y: f64 },
    Destroy { item_id: String },
    KeepAlive { player_id: String },
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown action type '{0}'")]
pub struct UnknownAction(pub String);

impl Action {
    /// The wire tag of this action.
    pub fn tag(&self) -> &'static str {
        match self {
            Action::Join { .. } => "join",
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Drop { .. } => "drop",
            Action::Destroy { .. } => "destroy",
            Action::KeepAlive { .. } => "keepAlive",
        }
    }
}

impl TryFrom<ActionMsg> for Action {
    type Error = UnknownAction;

    fn try_from(msg: ActionMsg) -> Result<Self, Self::Error> {
        let action = match msg.kind.as_str() {
            "join" => Action::Join {
                player_id: msg.extra,
            },
            "start" => Action::Start,
            "stop" => Action::Stop,
            "drop" => Action::Drop {
                kind: msg.extra,
                angle: msg.angle,
                y: msg.y,
            },
            "destroy" => Action::Destroy { item_id: msg.extra },
            "keepAlive" => Action::KeepAlive {
                player_id: msg.extra,
            },
            _ => return Err(UnknownAction(msg.kind)),
        };
        Ok(action)
    }
}

impl From<Action> for ActionMsg {
    fn from(action: Action) -> Self {
        let kind = action.tag().to_string();
        match action {
            Action::Join { player_id } | Action::KeepAlive { player_id } => ActionMsg {
                kind,
                extra: player_id,
                ..Default::default()
            },
            Action::Start | Action::Stop => ActionMsg {
                kind,
                ..Default::default()
            },
            Action::Drop { kind: item_kind, angle, y } => ActionMsg {
                kind,
                extra: item_kind,
                angle,
                y,
            },
            Action::Destroy { item_id } => ActionMsg {
                kind,
                extra: item_id,
                ..Default::default()
            },
        }
    }
}

/// Messages that the server pushes to clients.
///
/// Both variants are encoded as a bare JSON array: the item list on every
/// broadcast tick, the roster once right after a session starts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ServerMsg {
    Items(Vec<Item>),
    Roster(Vec<PlayerPosition>),
}

/// Read-only operator view of the whole session.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionView {
    pub running: bool,
    pub players: Vec<PlayerPosition>,
    pub items: Vec<Item>,
}
