//! Database connection management

use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Collection database not found at {0}")]
    NotFound(PathBuf),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Read-only handle on an extracted collection database
///
/// The underlying connection is closed when this value is dropped.
pub struct CollectionDb {
    pub(crate) conn: Connection,
    path: PathBuf,
}

impl CollectionDb {
    /// Open the collection database at `path` in read-only mode
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Err(DbError::NotFound(path));
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        tracing::debug!(path = %path.display(), "opened collection database");
        Ok(Self { conn, path })
    }

    /// Get the database path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("collection.anki2");
        match CollectionDb::open(&path) {
            Err(DbError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_open_is_read_only() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("collection.anki2");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE notes (id INTEGER PRIMARY KEY, flds TEXT NOT NULL);")
            .unwrap();

        let db = CollectionDb::open(&path).unwrap();
        assert_eq!(db.path(), path.as_path());
        let result = db
            .conn
            .execute("INSERT INTO notes (flds) VALUES ('a')", []);
        assert!(result.is_err());
    }

    #[test]
    fn test_open_non_database_file_fails_on_query() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("collection.anki21");
        std::fs::write(&path, b"this is not sqlite").unwrap();

        // SQLite opens lazily; the error surfaces on first use
        let result = CollectionDb::open(&path).and_then(|db| db.note_fields());
        assert!(matches!(result, Err(DbError::Sqlite(_))));
    }
}
