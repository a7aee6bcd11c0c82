//! Collection database discovery inside an extracted archive

use std::path::{Path, PathBuf};

use crate::error::{ExportError, ExportResult};

/// Known collection file names, newest schema first
pub const COLLECTION_FILE_NAMES: &[&str] = &["collection.anki21", "collection.anki2"];

/// Find the collection database in `dir`
///
/// The newer schema wins when both files are present.
pub fn locate_collection(dir: &Path) -> ExportResult<PathBuf> {
    COLLECTION_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| ExportError::NotFound {
            dir: dir.to_path_buf(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_prefers_newer_schema() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("collection.anki2"), "old").unwrap();
        fs::write(tmp.path().join("collection.anki21"), "new").unwrap();

        let path = locate_collection(tmp.path()).unwrap();
        assert!(path.ends_with("collection.anki21"));
    }

    #[test]
    fn test_falls_back_to_older_schema() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("collection.anki2"), "old").unwrap();
        fs::write(tmp.path().join("media"), "{}").unwrap();

        let path = locate_collection(tmp.path()).unwrap();
        assert!(path.ends_with("collection.anki2"));
    }

    #[test]
    fn test_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("media"), "{}").unwrap();

        let err = locate_collection(tmp.path()).unwrap_err();
        assert!(matches!(err, ExportError::NotFound { .. }));
        assert!(err.to_string().contains("collection.anki21, collection.anki2"));
    }

    #[test]
    fn test_directory_with_collection_name_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("collection.anki21")).unwrap();
        fs::write(tmp.path().join("collection.anki2"), "old").unwrap();

        let path = locate_collection(tmp.path()).unwrap();
        assert!(path.ends_with("collection.anki2"));
    }
}
