//! Row models for the playlist schema
//! These models map to SQLite tables by column name

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Playlist stored in database
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique identifier (auto-increment)
    pub id: i64,
    /// Owning username
    pub username: String,
    /// Readable by every user when set
    pub is_public: bool,
    /// Display name
    pub name: String,
    /// Free-text comment
    pub comment: Option<String>,
    /// Cached number of files in the playlist
    pub file_count: i64,
    /// Cached total duration in seconds
    pub duration_seconds: i64,
    /// Created timestamp (unix seconds)
    pub created: i64,
    /// Last changed timestamp (unix seconds)
    pub changed: i64,
    /// Source label when the playlist was imported from an external file
    pub imported_from: Option<String>,
}

/// Membership row linking a playlist to a media file
/// Row order (by id) is the playlist order; there is no separate rank column
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PlaylistFile {
    pub id: i64,
    pub playlist_id: i64,
    pub media_file_id: i64,
}

// ============ Input structs for creating new records ============

/// Input for creating a new playlist
///
/// Counters start at zero; created/changed are supplied by the caller so an
/// import can preserve the original timestamps.
#[derive(Debug, Clone)]
pub struct NewPlaylist {
    pub username: String,
    pub is_public: bool,
    pub name: String,
    pub comment: Option<String>,
    pub imported_from: Option<String>,
    /// Created timestamp (unix seconds)
    pub created: i64,
    /// Changed timestamp (unix seconds)
    pub changed: i64,
}

/// The slice of the externally owned media-file entity this layer consumes
#[derive(Debug, Clone, Copy)]
pub struct MediaFile {
    pub id: i64,
    /// Duration in seconds, if known
    pub duration_secs: Option<i64>,
}
