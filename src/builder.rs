//! Floppy image assembly
//!
//! One build runs these steps in order: zero the image, copy the boot
//! sector, write the reserved FAT markers, place every source file, and
//! finally write the image to disk. Any error before the last step leaves
//! the output path untouched.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fat12::geometry::sectors_for;
use crate::fat12::{
    BootSector, DirEntry, FloppyImage, ATTR_READ_ONLY, ATTR_SYSTEM, ROOT_DIR_ENTRIES,
};
use crate::source::{collect_sources, SourceFile};

/// Attributes given to every placed file
pub const FILE_ATTRIBUTES: u8 = ATTR_SYSTEM | ATTR_READ_ONLY;

/// Inputs of one build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Boot sector image, if any
    pub boot_sector: Option<PathBuf>,
    /// Directory whose entries are added after `sources`
    pub source_dir: Option<PathBuf>,
    /// Individual files, in placement order
    pub sources: Vec<PathBuf>,
    /// Destination of the image
    pub output: PathBuf,
}

/// Collect the inputs, build the image and write it to `options.output`.
pub fn run(options: &BuildOptions) -> Result<()> {
    let sources = collect_sources(&options.sources, options.source_dir.as_deref())?;

    let boot = match &options.boot_sector {
        Some(path) => Some(fs::read(path).map_err(|e| Error::io(path, e))?),
        None => None,
    };

    let image = assemble(boot.as_deref(), &sources)?;
    persist(&image, &options.output)?;

    log::info!(
        "wrote {} ({} files, {} of {} root entries, {} free sectors)",
        options.output.display(),
        sources.len(),
        image.disk().next_unused_root_entry,
        ROOT_DIR_ENTRIES,
        image.disk().free_sectors()
    );
    Ok(())
}

/// Build the complete image in memory.
pub fn assemble(boot: Option<&[u8]>, sources: &[SourceFile]) -> Result<FloppyImage> {
    let mut image = FloppyImage::new();

    if let Some(data) = boot {
        let boot = BootSector::new(data)?;
        for warning in boot.check() {
            log::warn!("{}", warning);
        }
        image.write_boot_sector(&boot);
    }

    image.write_reserved_markers();

    for file in sources {
        add_file(&mut image, file)?;
    }

    Ok(image)
}

/// Place one file: a root directory entry plus its cluster chain.
///
/// Capacity is checked against the collected length before the file is
/// read, and again against the bytes actually read before anything is
/// written.
pub fn add_file(image: &mut FloppyImage, file: &SourceFile) -> Result<()> {
    let name = file.file_name();

    check_capacity(image, &name, file.len)?;
    if image.disk().free_root_entries() == 0 {
        return Err(root_full(&name));
    }

    let contents = file.read()?;
    if contents.len() as u64 != file.len {
        log::warn!(
            "source file '{}' changed size since it was collected ({} -> {} bytes).",
            file.path.display(),
            file.len,
            contents.len()
        );
    }
    let size = check_capacity(image, &name, contents.len() as u64)?;

    let slot = image.allocate_root_entry().ok_or_else(|| root_full(&name))?;

    let start_cluster = image.disk().next_unused_cluster;
    let entry = DirEntry::for_file(
        &name,
        start_cluster as u16,
        size,
        file.created,
        file.modified,
        FILE_ATTRIBUTES,
    );
    image.set_root_entry(slot, &entry);
    image.write_chain(&contents);

    log::info!(
        "added {} as {} (slot {}, cluster {}, {} bytes)",
        file.path.display(),
        entry.display_name(),
        slot,
        start_cluster,
        size
    );
    Ok(())
}

/// Size field value for `len` bytes, if they fit the remaining data sectors
fn check_capacity(image: &FloppyImage, name: &str, len: u64) -> Result<u32> {
    let size = u32::try_from(len).map_err(|_| Error::FileTooLarge {
        file: name.to_string(),
        len,
    })?;

    let needed = sectors_for(size as usize);
    let available = image.disk().free_sectors();
    if needed > available {
        return Err(Error::ImageFull {
            file: name.to_string(),
            needed,
            available,
        });
    }
    Ok(size)
}

fn root_full(name: &str) -> Error {
    Error::RootDirectoryFull {
        file: name.to_string(),
        capacity: ROOT_DIR_ENTRIES,
    }
}

/// Write the finished image to `path`
pub fn persist(image: &FloppyImage, path: &Path) -> Result<()> {
    fs::write(path, image.as_bytes()).map_err(|e| Error::io(path, e))
}
