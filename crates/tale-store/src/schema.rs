//! Database schema and migrations.

use rusqlite::Connection;

use crate::error::Result;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Name of the secondary index over the `favorited` flag.
///
/// Version 1 stores shipped without it; the v2 migration adds it without
/// touching existing rows.
pub const FAVORITED_INDEX: &str = "idx_stories_favorited";

/// Initialize the database schema.
pub fn initialize(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        // Fresh database - create base tables, then apply migrations
        create_schema_v1(conn)?;
        migrate(conn, 1)?;
    } else if version < SCHEMA_VERSION {
        migrate(conn, version)?;
    }

    Ok(())
}

/// Get the current schema version.
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 =
        conn.query_row("SELECT version FROM schema_version", [], |row| row.get(0))?;

    Ok(version)
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?)",
        [version],
    )?;
    Ok(())
}

/// Create the initial schema (version 1).
///
/// Kept as-is so that migration from stores created before the
/// favorited index existed stays covered by tests.
pub(crate) fn create_schema_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Schema version tracking
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL
        );

        -- Story records, keyed by the server-assigned id
        CREATE TABLE IF NOT EXISTS stories (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            photo_url TEXT NOT NULL,
            lat REAL,
            lon REAL,
            created_at INTEGER NOT NULL,
            favorited INTEGER NOT NULL DEFAULT 0
        );

        -- Submissions captured while offline, replayed on drain
        CREATE TABLE IF NOT EXISTS pending_submissions (
            id TEXT PRIMARY KEY,
            description TEXT NOT NULL,
            photo_name TEXT NOT NULL,
            photo BLOB NOT NULL,
            lat REAL,
            lon REAL,
            queued_at INTEGER NOT NULL
        );
        "#,
    )?;
    set_schema_version(conn, 1)?;

    Ok(())
}

/// Run migrations from old_version to current.
fn migrate(conn: &Connection, old_version: i32) -> Result<()> {
    if old_version < 2 {
        // v2: secondary index for favorite-subset queries.
        // CREATE INDEX leaves existing rows untouched.
        conn.execute_batch(&format!(
            "CREATE INDEX IF NOT EXISTS {FAVORITED_INDEX} ON stories(favorited);"
        ))?;
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap()
    }

    fn has_favorited_index(conn: &Connection) -> bool {
        conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='index' AND name=?",
            [FAVORITED_INDEX],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_initialize_fresh_database() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let tables = table_names(&conn);
        assert!(tables.contains(&"stories".to_string()));
        assert!(tables.contains(&"pending_submissions".to_string()));
        assert!(tables.contains(&"schema_version".to_string()));
        assert!(has_favorited_index(&conn));
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_schema_version_tracking() {
        let conn = Connection::open_in_memory().unwrap();

        // Fresh database should have version 0
        assert_eq!(get_schema_version(&conn).unwrap(), 0);

        initialize(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_migration_from_v1_preserves_rows() {
        let conn = Connection::open_in_memory().unwrap();

        // A store created before the favorited index existed
        create_schema_v1(&conn).unwrap();
        assert!(!has_favorited_index(&conn));

        conn.execute(
            "INSERT INTO stories (id, name, description, photo_url, created_at, favorited)
             VALUES ('s1', 'Dina', 'old record', 'https://cdn.example/s1.jpg', 1700000000, 1)",
            [],
        )
        .unwrap();

        initialize(&conn).unwrap();

        assert!(has_favorited_index(&conn));
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);

        let (id, favorited): (String, bool) = conn
            .query_row("SELECT id, favorited FROM stories", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(id, "s1");
        assert!(favorited);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        initialize(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }
}
