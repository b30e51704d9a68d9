//! Error types for image builds

use core::fmt;
use std::io;
use std::path::PathBuf;

/// Result type for image builds
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that abort a build. No output file is written when one occurs.
#[derive(Debug)]
pub enum Error {
    /// Reading an input or writing the output failed
    Io { path: PathBuf, source: io::Error },

    /// The boot sector leaves no room for the FATs and the root directory
    BootSectorTooLarge { sectors: usize },

    /// Every root directory slot is taken
    RootDirectoryFull { file: String, capacity: usize },

    /// The file does not fit in the remaining data sectors
    ImageFull {
        file: String,
        needed: usize,
        available: usize,
    },

    /// The file size does not fit the 32-bit size field
    FileTooLarge { file: String, len: u64 },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            Self::BootSectorTooLarge { sectors } => write!(
                f,
                "boot sector spans {} sectors and leaves no room for the FATs and root directory",
                sectors
            ),
            Self::RootDirectoryFull { file, capacity } => write!(
                f,
                "cannot add '{}': the root directory is full ({} entries)",
                file, capacity
            ),
            Self::ImageFull {
                file,
                needed,
                available,
            } => write!(
                f,
                "cannot add '{}': it needs {} sectors but only {} are free",
                file, needed, available
            ),
            Self::FileTooLarge { file, len } => {
                write!(f, "cannot add '{}': {} bytes is too large", file, len)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
