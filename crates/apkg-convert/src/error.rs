//! Export pipeline errors

use std::path::PathBuf;
use thiserror::Error;

use crate::locate::COLLECTION_FILE_NAMES;

/// Errors that abort an export run
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Cannot read archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error(
        "No collection database found in {dir} (looked for {})",
        COLLECTION_FILE_NAMES.join(", ")
    )]
    NotFound { dir: PathBuf },

    #[error("Refusing to use {dir} as scratch directory: {reason}")]
    UnsafeScratchDir { dir: PathBuf, reason: &'static str },

    #[error(transparent)]
    Store(#[from] apkg_db::DbError),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type ExportResult<T> = Result<T, ExportError>;
