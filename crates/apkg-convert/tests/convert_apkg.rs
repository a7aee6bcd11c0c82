//! End-to-end conversion tests against real zip + SQLite fixtures

mod common;

use apkg_convert::{convert_apkg, ExportError};
use apkg_core::ExportConfig;
use std::fs;
use std::path::Path;

fn config_in(dir: &Path) -> ExportConfig {
    ExportConfig::new()
        .with_output_path(dir.join("cards.csv"))
        .with_scratch_dir(dir.join("temp_apkg"))
}

#[test]
fn test_converts_notes_to_rows() {
    let tmp = tempfile::tempdir().unwrap();
    let apkg = common::simple_apkg(
        tmp.path(),
        &[
            "<b>Hi</b> there\u{1f}Answer &amp; more",
            "Line1<br>Line2\u{1f}Back",
            "OnlyFront",
            "Front\u{1f}<img src=\"a.png\">",
            "Say \"cheese\"\u{1f}<div>Photo</div>\u{1f}extra field",
        ],
    );
    let config = config_in(tmp.path());

    let summary = convert_apkg(&apkg, &config).unwrap();

    assert_eq!(summary.notes_read, 5);
    assert_eq!(summary.rows_written, 3);
    assert_eq!(summary.skipped_too_few_fields, 1);
    assert_eq!(summary.skipped_empty, 1);
    assert_eq!(summary.database, "collection.anki2");

    let csv = fs::read_to_string(&config.output_path).unwrap();
    assert_eq!(
        csv,
        "\"Hi there\",\"Answer & more\"\r\n\
         \"Line1\nLine2\",\"Back\"\r\n\
         \"Say \"\"cheese\"\"\",\"Photo\"\r\n"
    );
    assert!(!config.scratch_dir.exists());
}

#[test]
fn test_prefers_anki21_collection() {
    let tmp = tempfile::tempdir().unwrap();
    let old = common::collection_bytes(tmp.path(), &["old\u{1f}schema"]);
    let new = common::collection_bytes(tmp.path(), &["new\u{1f}schema", "second\u{1f}note"]);
    let apkg = common::write_apkg(
        &tmp.path().join("deck.apkg"),
        &[("collection.anki2", old), ("collection.anki21", new)],
    );
    let config = config_in(tmp.path());

    let summary = convert_apkg(&apkg, &config).unwrap();

    assert_eq!(summary.database, "collection.anki21");
    let csv = fs::read_to_string(&config.output_path).unwrap();
    assert!(csv.starts_with("\"new\",\"schema\"\r\n"));
    assert!(!csv.contains("old"));
}

#[test]
fn test_repeated_runs_are_identical() {
    let tmp = tempfile::tempdir().unwrap();
    let apkg = common::simple_apkg(tmp.path(), &["Q1\u{1f}A1", "Q2\u{1f}A2 &lt;3"]);
    let config = config_in(tmp.path());

    convert_apkg(&apkg, &config).unwrap();
    let first = fs::read(&config.output_path).unwrap();
    assert!(!config.scratch_dir.exists());

    convert_apkg(&apkg, &config).unwrap();
    let second = fs::read(&config.output_path).unwrap();
    assert!(!config.scratch_dir.exists());

    assert_eq!(first, second);
}

#[test]
fn test_stale_scratch_directory_is_replaced() {
    let tmp = tempfile::tempdir().unwrap();
    let apkg = common::simple_apkg(tmp.path(), &["Q\u{1f}A"]);
    let config = config_in(tmp.path());
    fs::create_dir_all(&config.scratch_dir).unwrap();
    // A stale collection from an earlier run must not be picked up
    fs::write(config.scratch_dir.join("collection.anki21"), b"stale").unwrap();

    let summary = convert_apkg(&apkg, &config).unwrap();

    assert_eq!(summary.database, "collection.anki2");
    assert_eq!(summary.rows_written, 1);
    assert!(!config.scratch_dir.exists());
}

#[test]
fn test_missing_collection_leaves_output_untouched() {
    let tmp = tempfile::tempdir().unwrap();
    let apkg = common::write_apkg(
        &tmp.path().join("deck.apkg"),
        &[("media", b"{}".to_vec()), ("0", b"png".to_vec())],
    );
    let config = config_in(tmp.path());

    let err = convert_apkg(&apkg, &config).unwrap_err();

    assert!(matches!(err, ExportError::NotFound { .. }));
    assert!(!config.output_path.exists());
    assert!(!config.scratch_dir.exists());
}

#[test]
fn test_missing_collection_keeps_previous_output() {
    let tmp = tempfile::tempdir().unwrap();
    let apkg = common::write_apkg(&tmp.path().join("deck.apkg"), &[("media", b"{}".to_vec())]);
    let config = config_in(tmp.path());
    fs::write(&config.output_path, "\"previous\",\"run\"\r\n").unwrap();

    assert!(convert_apkg(&apkg, &config).is_err());
    assert_eq!(
        fs::read_to_string(&config.output_path).unwrap(),
        "\"previous\",\"run\"\r\n"
    );
}

#[test]
fn test_invalid_archive() {
    let tmp = tempfile::tempdir().unwrap();
    let apkg = tmp.path().join("deck.apkg");
    fs::write(&apkg, b"not a zip").unwrap();
    let config = config_in(tmp.path());

    let err = convert_apkg(&apkg, &config).unwrap_err();

    assert!(matches!(err, ExportError::Archive { .. }));
    assert!(!config.scratch_dir.exists());
    assert!(!config.output_path.exists());
}

#[test]
fn test_corrupt_collection_is_store_error() {
    let tmp = tempfile::tempdir().unwrap();
    let apkg = common::write_apkg(
        &tmp.path().join("deck.apkg"),
        &[("collection.anki2", b"garbage, not sqlite".to_vec())],
    );
    let config = config_in(tmp.path());

    let err = convert_apkg(&apkg, &config).unwrap_err();

    assert!(matches!(err, ExportError::Store(_)));
    assert!(!config.scratch_dir.exists());
    assert!(!config.output_path.exists());
}

#[test]
fn test_empty_collection_writes_empty_file() {
    let tmp = tempfile::tempdir().unwrap();
    let apkg = common::simple_apkg(tmp.path(), &[]);
    let config = config_in(tmp.path());

    let summary = convert_apkg(&apkg, &config).unwrap();

    assert_eq!(summary.rows_written, 0);
    assert_eq!(fs::read(&config.output_path).unwrap(), b"");
}

#[test]
fn test_output_inside_scratch_directory_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let apkg = common::simple_apkg(tmp.path(), &["Q\u{1f}A"]);
    let work = tmp.path().join("work");
    fs::create_dir_all(&work).unwrap();
    fs::write(work.join("notes.txt"), "keep me").unwrap();
    let config = ExportConfig::new()
        .with_output_path(work.join("cards.csv"))
        .with_scratch_dir(&work);

    let err = convert_apkg(&apkg, &config).unwrap_err();

    assert!(matches!(err, ExportError::UnsafeScratchDir { .. }));
    assert_eq!(fs::read_to_string(work.join("notes.txt")).unwrap(), "keep me");
    assert!(!config.output_path.exists());
}

#[test]
fn test_working_directory_as_scratch_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let apkg = common::simple_apkg(tmp.path(), &["Q\u{1f}A"]);
    let config = ExportConfig::new()
        .with_output_path(tmp.path().join("cards.csv"))
        .with_scratch_dir(".");

    let err = convert_apkg(&apkg, &config).unwrap_err();

    assert!(matches!(err, ExportError::UnsafeScratchDir { .. }));
    assert!(Path::new("Cargo.toml").exists());
    assert!(!config.output_path.exists());
}

#[test]
fn test_unwritable_output_is_io_error_and_cleans_up() {
    let tmp = tempfile::tempdir().unwrap();
    let apkg = common::simple_apkg(tmp.path(), &["Q\u{1f}A"]);
    let config = ExportConfig::new()
        .with_output_path(tmp.path().join("missing").join("cards.csv"))
        .with_scratch_dir(tmp.path().join("temp_apkg"));

    let err = convert_apkg(&apkg, &config).unwrap_err();

    assert!(matches!(err, ExportError::Io { .. }));
    assert!(!config.scratch_dir.exists());
    assert!(!config.output_path.exists());
}
