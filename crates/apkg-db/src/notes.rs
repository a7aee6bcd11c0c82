//! Note queries

use crate::connection::{CollectionDb, DbError};

impl CollectionDb {
    /// Get the raw field blob of every note, in the store's natural order
    pub fn note_fields(&self) -> Result<Vec<String>, DbError> {
        let mut stmt = self.conn.prepare("SELECT flds FROM notes")?;
        let fields = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(count = fields.len(), "read note fields");
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use crate::connection::{CollectionDb, DbError};
    use rusqlite::{params, Connection};
    use std::path::Path;

    fn create_collection(path: &Path, notes: &[&str]) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE notes (
                id INTEGER PRIMARY KEY,
                mid INTEGER NOT NULL DEFAULT 0,
                flds TEXT NOT NULL
            );",
        )
        .unwrap();
        for flds in notes {
            conn.execute("INSERT INTO notes (flds) VALUES (?1)", params![flds])
                .unwrap();
        }
    }

    #[test]
    fn test_note_fields_in_insert_order() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("collection.anki2");
        create_collection(&path, &["a\u{1f}1", "b\u{1f}2", "c"]);

        let db = CollectionDb::open(&path).unwrap();
        let fields = db.note_fields().unwrap();
        assert_eq!(fields, vec!["a\u{1f}1", "b\u{1f}2", "c"]);
    }

    #[test]
    fn test_note_fields_empty_table() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("collection.anki2");
        create_collection(&path, &[]);

        let db = CollectionDb::open(&path).unwrap();
        assert!(db.note_fields().unwrap().is_empty());
    }

    #[test]
    fn test_missing_notes_table() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("collection.anki2");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE cards (id INTEGER PRIMARY KEY);")
            .unwrap();

        let db = CollectionDb::open(&path).unwrap();
        assert!(matches!(db.note_fields(), Err(DbError::Sqlite(_))));
    }
}
