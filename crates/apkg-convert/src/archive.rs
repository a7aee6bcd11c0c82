//! Archive extraction
//!
//! An `.apkg` is a plain zip file holding the collection database, a media
//! manifest and numbered media files. Everything is unpacked; only the
//! database is used afterwards.

use std::fs::{self, File};
use std::io;
use std::path::Path;
use zip::ZipArchive;

use crate::error::{ExportError, ExportResult};

/// Extract every entry of `archive_path` into `dest`
///
/// Returns the number of files written. Entries whose names would land
/// outside `dest` are skipped.
pub fn extract_archive(archive_path: &Path, dest: &Path) -> ExportResult<usize> {
    let archive_err = |source: zip::result::ZipError| ExportError::Archive {
        path: archive_path.to_path_buf(),
        source,
    };

    let file = File::open(archive_path).map_err(|err| archive_err(err.into()))?;
    let mut archive = ZipArchive::new(file).map_err(archive_err)?;

    let mut count = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(archive_err)?;

        let Some(entry_path) = entry.enclosed_name().map(|p| p.to_path_buf()) else {
            tracing::warn!(entry = entry.name(), "skipping archive entry with unsafe path");
            continue;
        };
        let output_path = dest.join(&entry_path);

        if entry.is_dir() {
            fs::create_dir_all(&output_path).map_err(|err| ExportError::io(&output_path, err))?;
            continue;
        }

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(|err| ExportError::io(parent, err))?;
        }
        let mut outfile =
            File::create(&output_path).map_err(|err| ExportError::io(&output_path, err))?;
        io::copy(&mut entry, &mut outfile).map_err(|err| {
            // Decompression failures surface as io errors from the entry reader
            if err.kind() == io::ErrorKind::InvalidData {
                archive_err(err.into())
            } else {
                ExportError::io(&output_path, err)
            }
        })?;
        count += 1;
    }

    tracing::debug!(
        archive = %archive_path.display(),
        files = count,
        "extracted archive"
    );
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        for (name, data) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_extracts_all_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("deck.apkg");
        write_zip(
            &archive,
            &[
                ("collection.anki2", &b"db"[..]),
                ("media", &b"{}"[..]),
                ("0", &b"image bytes"[..]),
            ],
        );

        let dest = tmp.path().join("out");
        fs::create_dir(&dest).unwrap();
        let count = extract_archive(&archive, &dest).unwrap();

        assert_eq!(count, 3);
        assert_eq!(fs::read(dest.join("collection.anki2")).unwrap(), b"db");
        assert_eq!(fs::read(dest.join("0")).unwrap(), b"image bytes");
    }

    #[test]
    fn test_nested_entries_create_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("deck.apkg");
        write_zip(&archive, &[("sub/dir/file.txt", &b"x"[..])]);

        let dest = tmp.path().join("out");
        fs::create_dir(&dest).unwrap();
        extract_archive(&archive, &dest).unwrap();
        assert!(dest.join("sub").join("dir").join("file.txt").is_file());
    }

    #[test]
    fn test_skips_escaping_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("deck.apkg");
        write_zip(&archive, &[("../evil.txt", &b"x"[..]), ("ok.txt", &b"y"[..])]);

        let dest = tmp.path().join("out");
        fs::create_dir(&dest).unwrap();
        let count = extract_archive(&archive, &dest).unwrap();

        assert_eq!(count, 1);
        assert!(!tmp.path().join("evil.txt").exists());
        assert!(dest.join("ok.txt").is_file());
    }

    #[test]
    fn test_not_a_zip() {
        let tmp = tempfile::tempdir().unwrap();
        let archive = tmp.path().join("deck.apkg");
        fs::write(&archive, b"definitely not a zip file").unwrap();

        let err = extract_archive(&archive, tmp.path()).unwrap_err();
        assert!(matches!(err, ExportError::Archive { .. }));
    }

    #[test]
    fn test_missing_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let err = extract_archive(&tmp.path().join("nope.apkg"), tmp.path()).unwrap_err();
        assert!(matches!(err, ExportError::Archive { .. }));
    }
}
