//! Authoritative session state and the tasks that keep it live.
//
// `store` owns players, items and the running flag; `liveness` evicts
// players whose heartbeat went silent.

mod ids;
pub mod liveness;
mod store;

pub use ids::IdGenerator;
pub use store::{Evicted, JoinOutcome, SessionError, SessionStore, Snapshot};
