//! HTTP collaborator layer.

pub mod routes;
pub mod types;

pub use routes::{AppState, api_routes};
