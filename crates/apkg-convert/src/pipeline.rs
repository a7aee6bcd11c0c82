//! End-to-end export: archive in, CSV out
//!
//! Stages run strictly in sequence:
//! 0. check that the scratch directory is safe to remove
//! 1. unpack the archive into a fresh scratch directory
//! 2. locate the collection database
//! 3. read every note's field blob
//! 4. clean each blob into a card or skip it
//! 5. write the cards
//!
//! The scratch directory is removed when the run ends, whether it succeeded
//! or not. The database handle is closed before that happens.

use apkg_core::{clean_note, CardPair, ExportConfig, ExportSummary};
use apkg_db::CollectionDb;
use std::path::Path;

use crate::archive::extract_archive;
use crate::error::ExportResult;
use crate::locate::locate_collection;
use crate::scratch::{validate_scratch_dir, ScratchDir};
use crate::writer::write_cards;

/// Convert the archive at `archive_path` into a CSV file
///
/// Output and scratch locations come from `config`. The output file is not
/// touched unless every note was read successfully.
pub fn convert_apkg(archive_path: &Path, config: &ExportConfig) -> ExportResult<ExportSummary> {
    validate_scratch_dir(&config.scratch_dir, archive_path, &config.output_path)?;
    let scratch = ScratchDir::create(&config.scratch_dir)?;

    extract_archive(archive_path, scratch.path())?;
    let db_path = locate_collection(scratch.path())?;
    tracing::debug!(path = %db_path.display(), "located collection database");

    let blobs = read_note_fields(&db_path)?;

    let mut summary = ExportSummary {
        notes_read: blobs.len(),
        database: db_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        output: config.output_path.clone(),
        ..Default::default()
    };

    let cards = collect_cards(&blobs, &mut summary);
    summary.rows_written = write_cards(&config.output_path, &cards)?;

    drop(scratch);

    tracing::info!(
        notes = summary.notes_read,
        rows = summary.rows_written,
        skipped = summary.skipped(),
        output = %summary.output.display(),
        "export finished"
    );
    Ok(summary)
}

/// Read all field blobs, releasing the database before returning
fn read_note_fields(db_path: &Path) -> ExportResult<Vec<String>> {
    let db = CollectionDb::open(db_path)?;
    Ok(db.note_fields()?)
}

/// Clean every blob, counting skipped notes in `summary`
pub fn collect_cards(blobs: &[String], summary: &mut ExportSummary) -> Vec<CardPair> {
    let mut cards = Vec::with_capacity(blobs.len());
    for (index, blob) in blobs.iter().enumerate() {
        match clean_note(blob) {
            Ok(card) => cards.push(card),
            Err(reason) => {
                tracing::trace!(index, %reason, "skipping note");
                summary.record_skip(reason);
            }
        }
    }
    cards
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_cards_counts_skips() {
        let blobs = vec![
            "<b>Hi</b> there\u{1f}Answer &amp; more".to_string(),
            "OnlyFront".to_string(),
            "Front\u{1f}<br>".to_string(),
            "Q\u{1f}A\u{1f}ignored".to_string(),
        ];
        let mut summary = ExportSummary::default();

        let cards = collect_cards(&blobs, &mut summary);

        assert_eq!(
            cards,
            vec![
                CardPair::new("Hi there", "Answer & more"),
                CardPair::new("Q", "A"),
            ]
        );
        assert_eq!(summary.skipped_too_few_fields, 1);
        assert_eq!(summary.skipped_empty, 1);
    }

    #[test]
    fn test_collect_cards_preserves_order() {
        let blobs: Vec<String> = (0..5).map(|i| format!("q{i}\u{1f}a{i}")).collect();
        let mut summary = ExportSummary::default();

        let cards = collect_cards(&blobs, &mut summary);
        let fronts: Vec<&str> = cards.iter().map(|c| c.front.as_str()).collect();
        assert_eq!(fronts, vec!["q0", "q1", "q2", "q3", "q4"]);
        assert_eq!(summary.skipped(), 0);
    }
}
