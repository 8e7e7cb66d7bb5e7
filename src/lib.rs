//! Playlist persistence for media servers
//! Stores playlists, their membership, and per-user sharing grants in SQLite via sqlx
//!
//! The store is a thin data layer: request handlers of the hosting
//! application await its operations directly, and everything beyond
//! parameterized SQL (auth, retries, pagination policy) stays with the
//! caller.

mod models;
mod ops;
mod schema;
mod store;

pub use models::*;
pub use store::PlaylistStore;
