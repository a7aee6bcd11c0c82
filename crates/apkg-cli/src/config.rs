//! Configuration loading
//!
//! Precedence: command-line flag or environment variable, then the JSON
//! config file, then built-in defaults.

use anyhow::{Context, Result};
use apkg_core::ExportConfig;

use crate::cli::Cli;

pub fn load_config(cli: &Cli) -> Result<ExportConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            serde_json::from_str::<ExportConfig>(&content)
                .with_context(|| format!("Failed to parse config {}", path.display()))?
        }
        None => ExportConfig::default(),
    };

    if let Some(output) = &cli.output {
        config.output_path = output.clone();
    }
    if let Some(scratch_dir) = &cli.scratch_dir {
        config.scratch_dir = scratch_dir.clone();
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("apkg2csv").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_without_config_file() {
        let cli = parse(&["deck.apkg"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config, ExportConfig::default());
    }

    #[test]
    fn test_config_file_then_flag_override() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"output_path": "from-file.csv", "scratch_dir": "file-scratch"}"#,
        )
        .unwrap();

        let cli = parse(&["deck.apkg", "-c", path.to_str().unwrap(), "-o", "flag.csv"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.output_path, PathBuf::from("flag.csv"));
        assert_eq!(config.scratch_dir, PathBuf::from("file-scratch"));
    }

    #[test]
    fn test_bad_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let cli = parse(&["deck.apkg", "-c", path.to_str().unwrap()]);
        let err = load_config(&cli).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_missing_config_file() {
        let cli = parse(&["deck.apkg", "-c", "/nonexistent/apkg2csv.json"]);
        let err = load_config(&cli).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
