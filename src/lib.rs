//! FAT12 Floppy Image Builder
//!
//! Assembles a complete 1.44 MB FAT12 floppy image in memory from a boot
//! sector and a set of source files, then writes it out in one piece.
//!
//! # Features
//! - Boot sector copy with BIOS Parameter Block cross-check
//! - Packed 12-bit FAT with both copies kept identical
//! - 8.3 root directory entries with FAT date/time stamps
//! - Sequential cluster allocation, explicit capacity checks
//!
//! # Usage
//! ```ignore
//! use floppy_builder::builder::{assemble, persist};
//! use floppy_builder::source::collect_sources;
//!
//! let sources = collect_sources(&["kernel.sys"], None)?;
//! let boot = std::fs::read("boot.bin")?;
//! let image = assemble(Some(&boot), &sources)?;
//! persist(&image, "floppy.img".as_ref())?;
//! ```
//!
//! # Layout (default single reserved sector)
//! | sectors   | contents            |
//! |-----------|---------------------|
//! | 0         | boot sector         |
//! | 1-9       | FAT copy 0          |
//! | 10-18     | FAT copy 1          |
//! | 19-20     | root directory      |
//! | 21-2879   | clusters 2 and up   |

extern crate alloc;

pub mod builder;
pub mod cli;
pub mod error;
pub mod fat12;
pub mod source;

// Re-export commonly used types at crate root
pub use builder::{assemble, BuildOptions};
pub use error::{Error, Result};
pub use fat12::{DirEntry, FloppyImage, Timestamp};
pub use source::SourceFile;

/// Library version
pub const VERSION: &str = "0.1.0";
