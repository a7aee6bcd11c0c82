//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

/// Convert a flashcard .apkg export into a two-column CSV file
#[derive(Parser, Debug)]
#[command(name = "apkg2csv")]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the .apkg archive
    #[arg(value_name = "ARCHIVE")]
    pub archive: Option<PathBuf>,

    /// Output CSV path [default: cards.csv]
    #[arg(short, long, env = "APKG2CSV_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Directory the archive is unpacked into while converting [default: temp_apkg]
    #[arg(long, env = "APKG2CSV_SCRATCH_DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, env = "APKG2CSV_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
