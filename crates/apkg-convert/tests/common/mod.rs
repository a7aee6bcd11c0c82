//! Shared fixtures for pipeline tests

use rusqlite::{params, Connection};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Build a collection database holding `notes` and return its bytes
pub fn collection_bytes(dir: &Path, notes: &[&str]) -> Vec<u8> {
    let path = dir.join(format!("fixture-{}.db", notes.len()));
    let _ = fs::remove_file(&path);

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE notes (
            id INTEGER PRIMARY KEY,
            guid TEXT NOT NULL DEFAULT '',
            mid INTEGER NOT NULL DEFAULT 0,
            mod INTEGER NOT NULL DEFAULT 0,
            tags TEXT NOT NULL DEFAULT '',
            flds TEXT NOT NULL,
            sfld TEXT NOT NULL DEFAULT ''
        );",
    )
    .unwrap();
    for flds in notes {
        conn.execute("INSERT INTO notes (flds) VALUES (?1)", params![flds])
            .unwrap();
    }
    drop(conn);

    let bytes = fs::read(&path).unwrap();
    fs::remove_file(&path).unwrap();
    bytes
}

/// Write a zip archive at `path` with the given entries
pub fn write_apkg(path: &Path, entries: &[(&str, Vec<u8>)]) -> PathBuf {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    for (name, data) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
    path.to_path_buf()
}

/// Archive with a single `collection.anki2` holding `notes` plus a media manifest
pub fn simple_apkg(dir: &Path, notes: &[&str]) -> PathBuf {
    let db = collection_bytes(dir, notes);
    write_apkg(
        &dir.join("deck.apkg"),
        &[("collection.anki2", db), ("media", b"{}".to_vec())],
    )
}
