//! Playlist membership operations
//! The replace sequence runs inside a transaction, so the mutating
//! functions here take a connection instead of the pool

use anyhow::Result;
use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::models::PlaylistFile;

/// Get membership rows in playlist order
pub async fn get_playlist_files(
    pool: &Pool<Sqlite>,
    playlist_id: i64,
) -> Result<Vec<PlaylistFile>> {
    let files = sqlx::query_as::<_, PlaylistFile>(
        "SELECT * FROM playlist_file WHERE playlist_id = ? ORDER BY id",
    )
    .bind(playlist_id)
    .fetch_all(pool)
    .await?;
    Ok(files)
}

/// Remove all membership rows for a playlist (transaction version)
pub async fn clear_playlist_files_tx(conn: &mut SqliteConnection, playlist_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM playlist_file WHERE playlist_id = ?")
        .bind(playlist_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Append one membership row (transaction version)
pub async fn insert_playlist_file_tx(
    conn: &mut SqliteConnection,
    playlist_id: i64,
    media_file_id: i64,
) -> Result<()> {
    sqlx::query("INSERT INTO playlist_file (playlist_id, media_file_id) VALUES (?, ?)")
        .bind(playlist_id)
        .bind(media_file_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Refresh the cached counters after a membership change (transaction version)
pub async fn update_playlist_stats_tx(
    conn: &mut SqliteConnection,
    playlist_id: i64,
    file_count: i64,
    duration_seconds: i64,
    changed: i64,
) -> Result<()> {
    sqlx::query(
        "UPDATE playlist SET file_count = ?, duration_seconds = ?, changed = ? WHERE id = ?",
    )
    .bind(file_count)
    .bind(duration_seconds)
    .bind(changed)
    .bind(playlist_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}
