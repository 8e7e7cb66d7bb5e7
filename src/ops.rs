//! Database operations organized by entity type

mod files;
mod playlists;
mod sharing;

pub use files::*;
pub use playlists::*;
pub use sharing::*;

use std::time::{SystemTime, UNIX_EPOCH};

/// Get current Unix timestamp
pub fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}
