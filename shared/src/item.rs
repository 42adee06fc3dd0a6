//! Objects dropped on the planet ground.

use serde::{Deserialize, Serialize};

/// An object dropped on the planet ground.
///
/// Items are created by a drop action and only ever removed by a destroy
/// action naming their id; they are never modified in between.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: String,
    /// Free-form object type chosen by the client (e.g. "rock", "tree").
    pub kind: String,
    /// Orientation on the ground in degrees, within `[0, 360)`.
    pub angle: f64,
    pub y: f64,
}
