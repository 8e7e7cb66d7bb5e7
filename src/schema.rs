//! Database schema migrations

use anyhow::Result;
use sqlx::{Pool, Sqlite};

/// Run database migrations to create/update schema
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<()> {
    // Playlist table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS playlist (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            is_public INTEGER NOT NULL DEFAULT 0,
            name TEXT NOT NULL,
            comment TEXT,
            file_count INTEGER NOT NULL DEFAULT 0,
            duration_seconds INTEGER NOT NULL DEFAULT 0,
            created INTEGER NOT NULL,
            changed INTEGER NOT NULL,
            imported_from TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_playlist_username ON playlist(username);
        CREATE INDEX IF NOT EXISTS idx_playlist_is_public ON playlist(is_public);
        "#,
    )
    .execute(pool)
    .await?;

    // Membership junction table; playlist order is row order, so no rank column
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS playlist_file (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            playlist_id INTEGER NOT NULL,
            media_file_id INTEGER NOT NULL,
            FOREIGN KEY (playlist_id) REFERENCES playlist(id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_playlist_file_playlist ON playlist_file(playlist_id);
        "#,
    )
    .execute(pool)
    .await?;

    // Sharing grants table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS playlist_user (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            playlist_id INTEGER NOT NULL,
            username TEXT NOT NULL,
            FOREIGN KEY (playlist_id) REFERENCES playlist(id) ON DELETE CASCADE,
            UNIQUE(playlist_id, username)
        );

        CREATE INDEX IF NOT EXISTS idx_playlist_user_username ON playlist_user(username);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
