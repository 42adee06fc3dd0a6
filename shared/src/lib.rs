//! Wire types exchanged between the planet server and its clients.

pub mod item;
pub mod messages;
pub mod player;

pub use item::Item;
pub use messages::{Action, ActionMsg, ServerMsg, SessionView, UnknownAction};
pub use player::PlayerPosition;
