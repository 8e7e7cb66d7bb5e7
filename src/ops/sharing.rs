//! Playlist sharing operations

use anyhow::Result;
use sqlx::{Pool, Sqlite};

/// Usernames granted read access to a playlist
pub async fn get_playlist_collaborators(
    pool: &Pool<Sqlite>,
    playlist_id: i64,
) -> Result<Vec<String>> {
    let users =
        sqlx::query_scalar::<_, String>("SELECT username FROM playlist_user WHERE playlist_id = ?")
            .bind(playlist_id)
            .fetch_all(pool)
            .await?;
    Ok(users)
}

/// Grant a user read access; an already-granted pair is ignored
pub async fn add_collaborator(pool: &Pool<Sqlite>, playlist_id: i64, username: &str) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO playlist_user (playlist_id, username) VALUES (?, ?)")
        .bind(playlist_id)
        .bind(username)
        .execute(pool)
        .await?;
    Ok(())
}

/// Revoke a user's access; an absent pair is a no-op
pub async fn remove_collaborator(
    pool: &Pool<Sqlite>,
    playlist_id: i64,
    username: &str,
) -> Result<()> {
    sqlx::query("DELETE FROM playlist_user WHERE playlist_id = ? AND username = ?")
        .bind(playlist_id)
        .bind(username)
        .execute(pool)
        .await?;
    Ok(())
}
