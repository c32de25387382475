//! Main store implementation.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Row};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use tale_types::{NewStory, PendingSubmission, Photo, Story};

use crate::error::Result;
use crate::schema::{self, FAVORITED_INDEX};

/// SQLite-based store for Tale story records and pending submissions.
///
/// The store owns every on-device copy of a story. Records are keyed by
/// the server-assigned id; the favorite subset is additionally reachable
/// through a secondary index, with a full-scan fallback for stores that
/// predate it.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| crate::Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        // WAL mode for concurrent-reader performance
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        schema::initialize(&conn)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }
}

fn story_from_row(row: &Row) -> rusqlite::Result<Story> {
    Ok(Story {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        photo_url: row.get(3)?,
        lat: row.get(4)?,
        lon: row.get(5)?,
        created_at: OffsetDateTime::from_unix_timestamp(row.get(6)?).unwrap(),
        favorited: row.get(7)?,
    })
}

const STORY_COLUMNS: &str = "id, name, description, photo_url, lat, lon, created_at, favorited";

// Story operations
impl Store {
    /// Upsert a story by id.
    ///
    /// Returns `Ok(false)` without writing when the record carries no id;
    /// a record that cannot be keyed is dropped, not an error.
    pub fn put(&self, story: &Story) -> Result<bool> {
        if story.id.is_empty() {
            warn!("Cannot save story without an id");
            return Ok(false);
        }

        self.conn.execute(
            "INSERT INTO stories (id, name, description, photo_url, lat, lon, created_at, favorited)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                name = ?2,
                description = ?3,
                photo_url = ?4,
                lat = ?5,
                lon = ?6,
                created_at = ?7,
                favorited = ?8",
            rusqlite::params![
                story.id,
                story.name,
                story.description,
                story.photo_url,
                story.lat,
                story.lon,
                story.created_at.unix_timestamp(),
                story.favorited,
            ],
        )?;

        debug!("Saved story {} (favorited: {})", story.id, story.favorited);
        Ok(true)
    }

    /// Upsert a batch of stories.
    ///
    /// Returns how many records were written; records without an id are
    /// skipped. Favorite reconciliation is the sync engine's job - this
    /// writes the records exactly as given.
    pub fn put_all(&self, stories: &[Story]) -> Result<usize> {
        let mut written = 0;
        for story in stories {
            if self.put(story)? {
                written += 1;
            }
        }
        Ok(written)
    }

    /// Get a story by id.
    pub fn get(&self, id: &str) -> Result<Option<Story>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {STORY_COLUMNS} FROM stories WHERE id = ?"
        ))?;

        let story = stmt.query_row([id], story_from_row).optional()?;
        Ok(story)
    }

    /// List all stories in insertion order.
    pub fn get_all(&self) -> Result<Vec<Story>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {STORY_COLUMNS} FROM stories ORDER BY rowid"
        ))?;

        let stories = stmt
            .query_map([], story_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(stories)
    }

    /// Delete a story by id.
    ///
    /// Idempotent: deleting an absent id reports `Ok(false)` rather than
    /// an error.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let removed = self.conn.execute("DELETE FROM stories WHERE id = ?", [id])?;
        debug!("Deleted story {} ({} row(s))", id, removed);
        Ok(removed > 0)
    }

    /// Remove all stories.
    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM stories", [])?;
        info!("Cleared all stories");
        Ok(())
    }

    /// Count stored stories.
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM stories", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Flip the favorited flag on an existing record.
    ///
    /// Returns `Ok(false)` when no record with that id exists.
    pub fn set_favorited(&self, id: &str, favorited: bool) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE stories SET favorited = ?2 WHERE id = ?1",
            rusqlite::params![id, favorited],
        )?;
        Ok(updated > 0)
    }

    /// List the favorited subset.
    ///
    /// Uses the secondary index when present; on a store that predates
    /// the index (or when the indexed query fails) it falls back to a
    /// full scan and filter before surfacing any error.
    pub fn get_favorites(&self) -> Result<Vec<Story>> {
        match self.get_favorites_indexed() {
            Ok(favorites) => Ok(favorites),
            Err(e) => {
                debug!("Favorited index unavailable ({e}), falling back to full scan");
                let all = self.get_all()?;
                Ok(all.into_iter().filter(|s| s.favorited).collect())
            }
        }
    }

    fn get_favorites_indexed(&self) -> Result<Vec<Story>> {
        // INDEXED BY fails the prepare when the index is missing, which
        // routes callers into the full-scan fallback.
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {STORY_COLUMNS} FROM stories INDEXED BY {FAVORITED_INDEX}
             WHERE favorited = 1 ORDER BY rowid"
        ))?;

        let favorites = stmt
            .query_map([], story_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(favorites)
    }
}

// Pending submission operations
impl Store {
    /// Persist a pending submission.
    ///
    /// The entry is durable immediately; it survives process restarts
    /// until removed by a confirmed replay.
    pub fn enqueue_pending(&self, pending: &PendingSubmission) -> Result<()> {
        self.conn.execute(
            "INSERT INTO pending_submissions (id, description, photo_name, photo, lat, lon, queued_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                pending.id,
                pending.story.description,
                pending.story.photo.file_name,
                pending.story.photo.bytes,
                pending.story.lat,
                pending.story.lon,
                pending.queued_at.unix_timestamp(),
            ],
        )?;

        info!("Queued pending submission {}", pending.id);
        Ok(())
    }

    /// List pending submissions in insertion order.
    pub fn pending_submissions(&self) -> Result<Vec<PendingSubmission>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, description, photo_name, photo, lat, lon, queued_at
             FROM pending_submissions ORDER BY rowid",
        )?;

        let pending = stmt
            .query_map([], |row| {
                Ok(PendingSubmission {
                    id: row.get(0)?,
                    story: NewStory {
                        description: row.get(1)?,
                        photo: Photo {
                            file_name: row.get(2)?,
                            bytes: row.get(3)?,
                        },
                        lat: row.get(4)?,
                        lon: row.get(5)?,
                    },
                    queued_at: OffsetDateTime::from_unix_timestamp(row.get(6)?).unwrap(),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(pending)
    }

    /// Remove a pending submission after a confirmed replay.
    pub fn remove_pending(&self, id: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM pending_submissions WHERE id = ?", [id])?;
        Ok(removed > 0)
    }

    /// Count pending submissions.
    pub fn count_pending(&self) -> Result<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM pending_submissions", [], |row| {
                    row.get(0)
                })?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_story(id: &str) -> Story {
        Story {
            id: id.to_string(),
            name: "Dina".to_string(),
            description: format!("story {id}"),
            photo_url: format!("https://cdn.example/{id}.jpg"),
            lat: Some(-6.2),
            lon: Some(106.8),
            created_at: OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap(),
            favorited: false,
        }
    }

    fn test_pending(description: &str) -> PendingSubmission {
        PendingSubmission::new(NewStory::new(
            description,
            Photo::new("photo.jpg", vec![0xFF, 0xD8, 0xFF]),
        ))
    }

    #[test]
    fn test_open_in_memory() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.get_all().unwrap().is_empty());
        assert_eq!(store.count_pending().unwrap(), 0);
    }

    #[test]
    fn test_put_and_get_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        let story = test_story("s1");

        assert!(store.put(&story).unwrap());

        let loaded = store.get("s1").unwrap().unwrap();
        assert_eq!(loaded, story);
    }

    #[test]
    fn test_put_without_id_is_rejected_silently() {
        let store = Store::open_in_memory().unwrap();
        let mut story = test_story("s1");
        story.id = String::new();

        assert!(!store.put(&story).unwrap());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_put_upserts_by_id() {
        let store = Store::open_in_memory().unwrap();
        let mut story = test_story("s1");
        store.put(&story).unwrap();

        story.description = "edited on the server".to_string();
        story.favorited = true;
        store.put(&story).unwrap();

        assert_eq!(store.count().unwrap(), 1);
        let loaded = store.get("s1").unwrap().unwrap();
        assert_eq!(loaded.description, "edited on the server");
        assert!(loaded.favorited);
    }

    #[test]
    fn test_get_missing_returns_none() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.get("nope").unwrap().is_none());
    }

    #[test]
    fn test_get_all_preserves_insertion_order() {
        let store = Store::open_in_memory().unwrap();
        for id in ["b", "a", "c"] {
            store.put(&test_story(id)).unwrap();
        }

        let ids: Vec<String> = store.get_all().unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = Store::open_in_memory().unwrap();
        store.put(&test_story("s1")).unwrap();

        assert!(store.delete("s1").unwrap());
        assert!(!store.delete("s1").unwrap());
        assert!(!store.delete("never-existed").unwrap());
    }

    #[test]
    fn test_clear_removes_everything() {
        let store = Store::open_in_memory().unwrap();
        store.put(&test_story("s1")).unwrap();
        store.put(&test_story("s2")).unwrap();

        store.clear().unwrap();
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_set_favorited() {
        let store = Store::open_in_memory().unwrap();
        store.put(&test_story("s1")).unwrap();

        assert!(store.set_favorited("s1", true).unwrap());
        assert!(store.get("s1").unwrap().unwrap().favorited);

        // Absent record: nothing to flip
        assert!(!store.set_favorited("ghost", true).unwrap());
    }

    #[test]
    fn test_get_favorites_uses_index() {
        let store = Store::open_in_memory().unwrap();
        let mut fav = test_story("fav");
        fav.favorited = true;
        store.put(&fav).unwrap();
        store.put(&test_story("plain")).unwrap();

        let favorites = store.get_favorites().unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, "fav");
    }

    #[test]
    fn test_get_favorites_fallback_matches_indexed() {
        let store = Store::open_in_memory().unwrap();
        for (id, favorited) in [("a", true), ("b", false), ("c", true)] {
            let mut story = test_story(id);
            story.favorited = favorited;
            store.put(&story).unwrap();
        }

        let indexed = store.get_favorites().unwrap();

        // Same store without the index exercises the full-scan path
        store
            .conn
            .execute_batch(&format!("DROP INDEX {FAVORITED_INDEX}"))
            .unwrap();
        let scanned = store.get_favorites().unwrap();

        assert_eq!(indexed, scanned);
        assert_eq!(
            scanned.iter().map(|s| s.id.as_str()).collect::<Vec<_>>(),
            ["a", "c"]
        );
    }

    #[test]
    fn test_pending_queue_insertion_order() {
        let store = Store::open_in_memory().unwrap();
        let first = test_pending("first");
        let second = test_pending("second");

        store.enqueue_pending(&first).unwrap();
        store.enqueue_pending(&second).unwrap();

        let pending = store.pending_submissions().unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].id, first.id);
        assert_eq!(pending[1].id, second.id);
        assert_eq!(pending[0].story.photo.bytes, vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_remove_pending() {
        let store = Store::open_in_memory().unwrap();
        let entry = test_pending("to remove");
        store.enqueue_pending(&entry).unwrap();

        assert!(store.remove_pending(&entry.id).unwrap());
        assert!(!store.remove_pending(&entry.id).unwrap());
        assert_eq!(store.count_pending().unwrap(), 0);
    }

    #[test]
    fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tale.db");

        {
            let store = Store::open(&path).unwrap();
            let mut story = test_story("durable");
            story.favorited = true;
            store.put(&story).unwrap();
            store.enqueue_pending(&test_pending("queued across restarts")).unwrap();
        }

        let store = Store::open(&path).unwrap();
        assert!(store.get("durable").unwrap().unwrap().favorited);

        let pending = store.pending_submissions().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].story.description, "queued across restarts");
    }
}
