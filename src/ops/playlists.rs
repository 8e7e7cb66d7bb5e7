//! Playlist CRUD operations

use std::collections::BTreeMap;

use anyhow::Result;
use sqlx::{Pool, Sqlite};

use super::current_timestamp;
use crate::models::{NewPlaylist, Playlist};

/// Create a new playlist, returns the new playlist id
///
/// The id comes from the insert's own statement result, so concurrent
/// creations cannot observe each other's row ids.
pub async fn create_playlist(pool: &Pool<Sqlite>, playlist: NewPlaylist) -> Result<i64> {
    let result = sqlx::query(
        r#"
        INSERT INTO playlist (username, is_public, name, comment, file_count, duration_seconds, created, changed, imported_from)
        VALUES (?, ?, ?, ?, 0, 0, ?, ?, ?)
        "#,
    )
    .bind(&playlist.username)
    .bind(playlist.is_public)
    .bind(&playlist.name)
    .bind(&playlist.comment)
    .bind(playlist.created)
    .bind(playlist.changed)
    .bind(&playlist.imported_from)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Get playlist by id
pub async fn get_playlist(pool: &Pool<Sqlite>, id: i64) -> Result<Option<Playlist>> {
    let playlist = sqlx::query_as::<_, Playlist>("SELECT * FROM playlist WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(playlist)
}

/// Get all playlists regardless of owner or visibility (administrative use)
pub async fn get_all_playlists(pool: &Pool<Sqlite>) -> Result<Vec<Playlist>> {
    let playlists = sqlx::query_as::<_, Playlist>("SELECT * FROM playlist")
        .fetch_all(pool)
        .await?;
    Ok(playlists)
}

/// Get playlists owned by a user
pub async fn get_writable_playlists(pool: &Pool<Sqlite>, username: &str) -> Result<Vec<Playlist>> {
    let playlists = sqlx::query_as::<_, Playlist>("SELECT * FROM playlist WHERE username = ?")
        .bind(username)
        .fetch_all(pool)
        .await?;
    Ok(playlists)
}

/// Get every playlist a user may read: their own, public ones, and ones
/// explicitly shared with them
pub async fn get_readable_playlists(pool: &Pool<Sqlite>, username: &str) -> Result<Vec<Playlist>> {
    let owned = get_writable_playlists(pool, username).await?;

    let public = sqlx::query_as::<_, Playlist>("SELECT * FROM playlist WHERE is_public")
        .fetch_all(pool)
        .await?;

    let shared = sqlx::query_as::<_, Playlist>(
        r#"
        SELECT playlist.* FROM playlist
        INNER JOIN playlist_user ON playlist.id = playlist_user.playlist_id
        WHERE playlist.username != ? AND playlist_user.username = ?
        "#,
    )
    .bind(username)
    .bind(username)
    .fetch_all(pool)
    .await?;

    // A playlist can satisfy several criteria; the map dedups by id and
    // yields the result sorted by id ascending.
    let mut map = BTreeMap::new();
    for playlist in owned.into_iter().chain(public).chain(shared) {
        map.insert(playlist.id, playlist);
    }
    Ok(map.into_values().collect())
}

/// Update playlist metadata and stamp changed = now
///
/// Counters are only touched by the membership replace, never here.
pub async fn update_playlist(pool: &Pool<Sqlite>, playlist: &Playlist) -> Result<()> {
    let now = current_timestamp();
    sqlx::query(
        "UPDATE playlist SET username = ?, is_public = ?, name = ?, comment = ?, changed = ?, imported_from = ? WHERE id = ?",
    )
    .bind(&playlist.username)
    .bind(playlist.is_public)
    .bind(&playlist.name)
    .bind(&playlist.comment)
    .bind(now)
    .bind(&playlist.imported_from)
    .bind(playlist.id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Delete playlist; membership and sharing rows cascade
pub async fn delete_playlist(pool: &Pool<Sqlite>, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM playlist WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
