//! Source file collection
//!
//! Gathers the files to place on the floppy: explicit paths first, in the
//! order given, then the entries of an optional source directory in
//! enumeration order. That order decides directory slots and clusters.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fat12::Timestamp;

/// A file to place on the floppy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path to the file
    pub path: PathBuf,
    /// Length in bytes when collected
    pub len: u64,
    pub created: Timestamp,
    pub modified: Timestamp,
}

impl SourceFile {
    /// Describe a file with explicit metadata
    pub fn new(
        path: impl Into<PathBuf>,
        len: u64,
        created: Timestamp,
        modified: Timestamp,
    ) -> Self {
        SourceFile {
            path: path.into(),
            len,
            created,
            modified,
        }
    }

    /// Read metadata of the regular file at `path`.
    ///
    /// Creation time falls back to modification time where the platform
    /// does not record it.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let path = std::path::absolute(path)?;
        let meta = fs::metadata(&path)?;
        let modified = meta.modified()?;
        let created = meta.created().unwrap_or(modified);

        Ok(SourceFile {
            path,
            len: meta.len(),
            created: Timestamp::from_system_time(created),
            modified: Timestamp::from_system_time(modified),
        })
    }

    /// File name used for the 8.3 entry
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Load the whole file
    pub fn read(&self) -> Result<Vec<u8>> {
        fs::read(&self.path).map_err(|e| Error::io(&self.path, e))
    }
}

/// Collect explicit files, then the regular files of `source_dir`.
///
/// Missing or unusable explicit files are skipped with a warning. Entries
/// of `source_dir` that are not regular files are skipped too, since the
/// image has no subdirectories. An unreadable `source_dir` is fatal.
pub fn collect_sources<P: AsRef<Path>>(
    files: &[P],
    source_dir: Option<&Path>,
) -> Result<Vec<SourceFile>> {
    let mut sources = Vec::new();

    for item in files {
        let item = item.as_ref();
        match fs::metadata(item) {
            Ok(meta) if meta.is_file() => match SourceFile::from_path(item) {
                Ok(file) => sources.push(file),
                Err(_) => log::warn!("source file '{}' is not a valid file path.", item.display()),
            },
            Ok(_) => log::warn!("source file '{}' is not a regular file.", item.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("source file '{}' does not exist.", item.display())
            }
            Err(_) => log::warn!("source file '{}' is not a valid file path.", item.display()),
        }
    }

    if let Some(dir) = source_dir {
        let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
        add_dir_entries(&mut sources, dir, entries.map(|entry| entry.map(|e| e.path())));
    }

    Ok(sources)
}

/// Append the regular files among `entries`, skipping everything else.
///
/// An entry that cannot be read is reported and skipped; the rest of the
/// directory is still collected.
fn add_dir_entries<I>(sources: &mut Vec<SourceFile>, dir: &Path, entries: I)
where
    I: IntoIterator<Item = io::Result<PathBuf>>,
{
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(e) => {
                log::warn!("skipping an entry of '{}': {}", dir.display(), e);
                continue;
            }
        };

        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => match SourceFile::from_path(&path) {
                Ok(file) => sources.push(file),
                Err(e) => log::warn!("skipping '{}': {}", path.display(), e),
            },
            Ok(_) => log::warn!(
                "skipping '{}': only regular files can be placed on the floppy.",
                path.display()
            ),
            Err(e) => log::warn!("skipping '{}': {}", path.display(), e),
        }
    }
}
