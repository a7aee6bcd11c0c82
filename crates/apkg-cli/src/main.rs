//! apkg2csv - Convert flashcard .apkg exports into two-column CSV files

mod cli;
mod config;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;

use apkg_core::{ExportConfig, ExportSummary};
use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let Some(archive) = cli.archive.as_deref() else {
        println!("Usage: apkg2csv <deck.apkg>");
        return Ok(());
    };

    let config = config::load_config(&cli)?;
    let summary = run(archive, &config)?;
    println!("{}", format_summary(&summary));

    Ok(())
}

fn run(archive: &Path, config: &ExportConfig) -> Result<ExportSummary> {
    tracing::debug!(
        archive = %archive.display(),
        output = %config.output_path.display(),
        scratch_dir = %config.scratch_dir.display(),
        "starting export"
    );

    apkg_convert::convert_apkg(archive, config)
        .with_context(|| format!("Failed to convert {}", archive.display()))
}

fn format_summary(summary: &ExportSummary) -> String {
    format!(
        "Wrote {} cards from {} to {} ({} notes read, {} skipped)",
        summary.rows_written,
        summary.database,
        summary.output.display(),
        summary.notes_read,
        summary.skipped()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_summary() {
        let summary = ExportSummary {
            notes_read: 10,
            rows_written: 7,
            skipped_too_few_fields: 1,
            skipped_empty: 2,
            database: "collection.anki21".to_string(),
            output: PathBuf::from("cards.csv"),
        };
        assert_eq!(
            format_summary(&summary),
            "Wrote 7 cards from collection.anki21 to cards.csv (10 notes read, 3 skipped)"
        );
    }

    #[test]
    fn test_run_reports_archive_in_error() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("missing.apkg");
        let config = ExportConfig::new()
            .with_output_path(tmp.path().join("cards.csv"))
            .with_scratch_dir(tmp.path().join("temp_apkg"));

        let err = run(&archive, &config).unwrap_err();
        assert!(err.to_string().contains("missing.apkg"));
        assert!(err.downcast_ref::<apkg_convert::ExportError>().is_some());
        assert!(!tmp.path().join("temp_apkg").exists());
    }
}
