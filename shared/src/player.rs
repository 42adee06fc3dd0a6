//! Player-related wire types.

use serde::{Deserialize, Serialize};

/// A roster entry as sent to clients when a session starts.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlayerPosition {
    pub id: String,
    #[serde(rename = "initialPosition")]
    pub initial_position: f64,
}
