//! Store entry point - wraps the connection pool
//! Delegates to ops modules for actual operations

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use std::path::Path;

use crate::{models::*, ops, schema};

/// Playlist store over a shared SQLite pool
#[derive(Debug)]
pub struct PlaylistStore {
    pool: Pool<Sqlite>,
}

impl PlaylistStore {
    /// Create and initialize a store with its own pool at the given path
    pub async fn open(db_path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            // WAL keeps readers unblocked while request handlers write
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // Deletes cascade from playlist into playlist_file/playlist_user
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("failed to connect sqlite")?;

        Self::with_pool(pool).await
    }

    /// Wrap a pool owned by the hosting application and run migrations
    ///
    /// The pool's connections should have the foreign_keys pragma enabled,
    /// otherwise playlist deletes leave membership and sharing rows behind.
    pub async fn with_pool(pool: Pool<Sqlite>) -> Result<Self> {
        schema::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    // ============ Playlist Operations ============

    pub async fn create_playlist(&self, playlist: NewPlaylist) -> Result<i64> {
        ops::create_playlist(&self.pool, playlist).await
    }

    pub async fn get_playlist(&self, id: i64) -> Result<Option<Playlist>> {
        ops::get_playlist(&self.pool, id).await
    }

    pub async fn get_all_playlists(&self) -> Result<Vec<Playlist>> {
        ops::get_all_playlists(&self.pool).await
    }

    /// Playlists the user may modify (the ones they own)
    pub async fn get_writable_playlists(&self, username: &str) -> Result<Vec<Playlist>> {
        ops::get_writable_playlists(&self.pool, username).await
    }

    /// Playlists the user may read: owned, public, and shared with them,
    /// deduplicated and ordered by id
    pub async fn get_readable_playlists(&self, username: &str) -> Result<Vec<Playlist>> {
        ops::get_readable_playlists(&self.pool, username).await
    }

    pub async fn update_playlist(&self, playlist: &Playlist) -> Result<()> {
        ops::update_playlist(&self.pool, playlist).await
    }

    pub async fn delete_playlist(&self, id: i64) -> Result<()> {
        tracing::debug!("deleting playlist {}", id);
        ops::delete_playlist(&self.pool, id).await
    }

    // ============ Membership Operations ============

    /// Replace the entire membership set of a playlist in the given order
    ///
    /// Recomputes file_count and duration_seconds (unknown durations count
    /// as zero) and stamps changed = now. Runs as one transaction so a
    /// mid-sequence failure cannot leave the cached counters out of sync
    /// with the actual membership.
    pub async fn set_playlist_files(&self, id: i64, files: &[MediaFile]) -> Result<()> {
        use sqlx::Acquire;

        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        ops::clear_playlist_files_tx(&mut *tx, id).await?;

        let mut duration = 0;
        for file in files {
            ops::insert_playlist_file_tx(&mut *tx, id, file.id).await?;
            duration += file.duration_secs.unwrap_or(0);
        }

        ops::update_playlist_stats_tx(
            &mut *tx,
            id,
            files.len() as i64,
            duration,
            ops::current_timestamp(),
        )
        .await?;

        tx.commit().await?;

        tracing::debug!("replaced files in playlist {}: {} entries", id, files.len());
        Ok(())
    }

    /// Membership rows in playlist order
    pub async fn get_playlist_files(&self, id: i64) -> Result<Vec<PlaylistFile>> {
        ops::get_playlist_files(&self.pool, id).await
    }

    // ============ Sharing Operations ============

    pub async fn get_playlist_collaborators(&self, id: i64) -> Result<Vec<String>> {
        ops::get_playlist_collaborators(&self.pool, id).await
    }

    pub async fn add_collaborator(&self, id: i64, username: &str) -> Result<()> {
        ops::add_collaborator(&self.pool, id, username).await
    }

    pub async fn remove_collaborator(&self, id: i64, username: &str) -> Result<()> {
        ops::remove_collaborator(&self.pool, id, username).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// In-memory store; a single connection so every query sees the same db
    async fn test_store() -> PlaylistStore {
        let options = SqliteConnectOptions::new()
            .in_memory(true)
            .pragma("foreign_keys", "ON");
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        PlaylistStore::with_pool(pool).await.unwrap()
    }

    fn new_playlist(username: &str, name: &str) -> NewPlaylist {
        NewPlaylist {
            username: username.to_string(),
            is_public: false,
            name: name.to_string(),
            comment: None,
            imported_from: None,
            created: 1_700_000_000,
            changed: 1_700_000_000,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_playlist() {
        let store = test_store().await;

        let mut input = new_playlist("alice", "Morning");
        input.comment = Some("wake up slowly".to_string());
        input.imported_from = Some("morning.m3u".to_string());

        let id = store.create_playlist(input).await.unwrap();
        let playlist = store.get_playlist(id).await.unwrap().unwrap();

        assert_eq!(playlist.id, id);
        assert_eq!(playlist.username, "alice");
        assert_eq!(playlist.name, "Morning");
        assert_eq!(playlist.comment.as_deref(), Some("wake up slowly"));
        assert_eq!(playlist.imported_from.as_deref(), Some("morning.m3u"));
        assert!(!playlist.is_public);
        assert_eq!(playlist.file_count, 0);
        assert_eq!(playlist.duration_seconds, 0);
        assert_eq!(playlist.created, 1_700_000_000);
        assert_eq!(playlist.changed, 1_700_000_000);
    }

    #[tokio::test]
    async fn test_get_missing_playlist_is_none() {
        let store = test_store().await;
        assert!(store.get_playlist(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_readable_playlists_union() {
        let store = test_store().await;

        // alice owns a public playlist: owned and public, must appear once
        let mut p1 = new_playlist("alice", "Alice public");
        p1.is_public = true;
        let id1 = store.create_playlist(p1).await.unwrap();

        // bob's public playlist: readable by alice
        let mut p2 = new_playlist("bob", "Bob public");
        p2.is_public = true;
        let id2 = store.create_playlist(p2).await.unwrap();

        // bob's private playlist shared with alice
        let id3 = store
            .create_playlist(new_playlist("bob", "Bob shared"))
            .await
            .unwrap();
        store.add_collaborator(id3, "alice").await.unwrap();

        // carol's private playlist stays invisible
        let id4 = store
            .create_playlist(new_playlist("carol", "Carol private"))
            .await
            .unwrap();

        let readable = store.get_readable_playlists("alice").await.unwrap();
        let ids: Vec<i64> = readable.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![id1, id2, id3]);
        assert!(!ids.contains(&id4));

        // bob reads his own two plus alice's public one
        let readable = store.get_readable_playlists("bob").await.unwrap();
        let ids: Vec<i64> = readable.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![id1, id2, id3]);

        let writable = store.get_writable_playlists("bob").await.unwrap();
        let ids: Vec<i64> = writable.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![id2, id3]);
    }

    #[tokio::test]
    async fn test_set_playlist_files_recomputes_counters() {
        let store = test_store().await;
        let id = store
            .create_playlist(new_playlist("alice", "Mix"))
            .await
            .unwrap();

        let files = [
            MediaFile {
                id: 10,
                duration_secs: Some(120),
            },
            MediaFile {
                id: 11,
                duration_secs: None,
            },
            MediaFile {
                id: 12,
                duration_secs: Some(240),
            },
        ];
        store.set_playlist_files(id, &files).await.unwrap();

        let playlist = store.get_playlist(id).await.unwrap().unwrap();
        assert_eq!(playlist.file_count, 3);
        assert_eq!(playlist.duration_seconds, 360);
        assert!(playlist.changed > playlist.created);

        let rows = store.get_playlist_files(id).await.unwrap();
        let file_ids: Vec<i64> = rows.iter().map(|r| r.media_file_id).collect();
        assert_eq!(file_ids, vec![10, 11, 12]);

        // Full replace, not a diff: the old rows are gone
        let files = [MediaFile {
            id: 12,
            duration_secs: Some(240),
        }];
        store.set_playlist_files(id, &files).await.unwrap();
        let rows = store.get_playlist_files(id).await.unwrap();
        let file_ids: Vec<i64> = rows.iter().map(|r| r.media_file_id).collect();
        assert_eq!(file_ids, vec![12]);

        // Emptying the playlist zeroes the counters
        store.set_playlist_files(id, &[]).await.unwrap();
        let playlist = store.get_playlist(id).await.unwrap().unwrap();
        assert_eq!(playlist.file_count, 0);
        assert_eq!(playlist.duration_seconds, 0);
    }

    #[tokio::test]
    async fn test_add_collaborator_is_idempotent() {
        let store = test_store().await;
        let id = store
            .create_playlist(new_playlist("alice", "Shared"))
            .await
            .unwrap();

        store.add_collaborator(id, "bob").await.unwrap();
        store.add_collaborator(id, "bob").await.unwrap();
        assert_eq!(
            store.get_playlist_collaborators(id).await.unwrap(),
            vec!["bob".to_string()]
        );

        store.remove_collaborator(id, "bob").await.unwrap();
        assert!(store.get_playlist_collaborators(id).await.unwrap().is_empty());

        // Removing an absent pair is a no-op
        store.remove_collaborator(id, "bob").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_playlist_cascades() {
        let store = test_store().await;
        let id = store
            .create_playlist(new_playlist("alice", "Doomed"))
            .await
            .unwrap();
        let files = [MediaFile {
            id: 7,
            duration_secs: Some(60),
        }];
        store.set_playlist_files(id, &files).await.unwrap();
        store.add_collaborator(id, "bob").await.unwrap();

        store.delete_playlist(id).await.unwrap();

        assert!(store.get_playlist(id).await.unwrap().is_none());
        assert!(store.get_playlist_files(id).await.unwrap().is_empty());
        assert!(store.get_playlist_collaborators(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_playlist_keeps_counters() {
        let store = test_store().await;
        let id = store
            .create_playlist(new_playlist("alice", "Old name"))
            .await
            .unwrap();
        let files = [MediaFile {
            id: 5,
            duration_secs: Some(90),
        }];
        store.set_playlist_files(id, &files).await.unwrap();

        let mut playlist = store.get_playlist(id).await.unwrap().unwrap();
        playlist.username = "bob".to_string();
        playlist.is_public = true;
        playlist.name = "New name".to_string();
        playlist.comment = Some("handed over".to_string());
        store.update_playlist(&playlist).await.unwrap();

        let updated = store.get_playlist(id).await.unwrap().unwrap();
        assert_eq!(updated.username, "bob");
        assert!(updated.is_public);
        assert_eq!(updated.name, "New name");
        assert_eq!(updated.comment.as_deref(), Some("handed over"));
        assert_eq!(updated.file_count, 1);
        assert_eq!(updated.duration_seconds, 90);
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let store = Arc::new(test_store().await);

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            tasks.spawn(async move {
                let name = format!("playlist {i}");
                let id = store
                    .create_playlist(new_playlist(&format!("user{i}"), &name))
                    .await
                    .unwrap();
                (id, name)
            });
        }

        let mut ids = Vec::new();
        while let Some(result) = tasks.join_next().await {
            let (id, name) = result.unwrap();
            // Each caller got the row it inserted, not a racing caller's
            let playlist = store.get_playlist(id).await.unwrap().unwrap();
            assert_eq!(playlist.name, name);
            ids.push(id);
        }

        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);
    }
}
