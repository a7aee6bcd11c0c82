//! Scratch directory guard
//!
//! The archive is unpacked into a directory owned by a single run. The guard
//! removes it on drop, so every exit path out of the pipeline cleans up.
//!
//! Since the directory is removed recursively, a configured path is checked
//! first: it must not contain the working directory, the input archive or
//! the output file.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{ExportError, ExportResult};

/// Owns a freshly created scratch directory until dropped
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Create an empty scratch directory at `path`
    ///
    /// Anything already at that path from an earlier run is removed first.
    pub fn create(path: impl Into<PathBuf>) -> ExportResult<Self> {
        let path = path.into();

        match fs::remove_dir_all(&path) {
            Ok(()) => tracing::debug!(path = %path.display(), "removed stale scratch directory"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(ExportError::io(&path, err)),
        }

        fs::create_dir_all(&path).map_err(|err| ExportError::io(&path, err))?;
        tracing::debug!(path = %path.display(), "created scratch directory");

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reject a scratch path whose removal would take other files with it
pub fn validate_scratch_dir(scratch_dir: &Path, archive_path: &Path, output_path: &Path) -> ExportResult<()> {
    let unsafe_dir = |reason: &'static str| ExportError::UnsafeScratchDir {
        dir: scratch_dir.to_path_buf(),
        reason,
    };

    if scratch_dir.as_os_str().is_empty() {
        return Err(unsafe_dir("the path is empty"));
    }

    let cwd = env::current_dir().map_err(|err| ExportError::io(".", err))?;
    let scratch = resolve(&cwd, scratch_dir);

    if resolve(&cwd, &cwd).starts_with(&scratch) {
        return Err(unsafe_dir("it contains the working directory"));
    }
    if resolve(&cwd, archive_path).starts_with(&scratch) {
        return Err(unsafe_dir("it contains the input archive"));
    }
    if resolve(&cwd, output_path).starts_with(&scratch) {
        return Err(unsafe_dir("it contains the output file"));
    }
    Ok(())
}

/// Absolute form of `path` with symlinks resolved as far as it exists
fn resolve(cwd: &Path, path: &Path) -> PathBuf {
    let lexical = normalize(&cwd.join(path));

    let mut existing = lexical.clone();
    let mut missing: Vec<OsString> = Vec::new();
    loop {
        if let Ok(real) = fs::canonicalize(&existing) {
            return missing.iter().rev().fold(real, |acc, part| acc.join(part));
        }
        match existing.file_name() {
            Some(name) => missing.push(name.to_os_string()),
            None => return lexical,
        }
        if !existing.pop() {
            return lexical;
        }
    }
}

/// Drop `.` components and fold `..` into their parent
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "removed scratch directory"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => tracing::warn!(
                path = %self.path.display(),
                error = %err,
                "failed to remove scratch directory"
            ),
        }
    }
}
