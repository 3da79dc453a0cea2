//! Session lifecycle: model and in-memory store.

pub mod model;
pub mod store;

pub use model::{MessageEntry, Role, Session, TerminationReason};
pub use store::{InMemorySessionStore, SessionStore, spawn_sweep_task};
