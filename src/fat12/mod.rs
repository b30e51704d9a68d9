//! FAT12 floppy image (1.44 MB layout)

pub mod boot_sector;
pub mod datetime;
pub mod directory;
pub mod fat;
pub mod geometry;

pub use boot_sector::{BootSector, BootWarning};
pub use datetime::Timestamp;
pub use directory::{DirEntry, split_name};
pub use directory::{
    ATTR_ARCHIVE, ATTR_DIRECTORY, ATTR_HIDDEN, ATTR_READ_ONLY, ATTR_SYSTEM, ATTR_VOLUME_ID,
};
pub use fat::{FatTable, FatEntry, END_OF_CHAIN, MEDIA_MARKER};
pub use geometry::{DiskDescriptor, FLOPPY_SIZE, ROOT_DIR_ENTRIES, SECTOR_SIZE, TOTAL_SECTORS};

extern crate alloc;
use alloc::vec::Vec;

use geometry::sectors_for;

/// In-memory floppy image
///
/// Owns the zero-filled image buffer and the descriptor whose cursors hand
/// out clusters and root directory slots strictly in order.
pub struct FloppyImage {
    data: Vec<u8>,
    disk: DiskDescriptor,
}

impl Default for FloppyImage {
    fn default() -> Self {
        Self::new()
    }
}

impl FloppyImage {
    /// Blank image with one reserved sector
    pub fn new() -> Self {
        FloppyImage {
            data: alloc::vec![0u8; FLOPPY_SIZE],
            disk: DiskDescriptor::new(),
        }
    }

    #[inline]
    pub fn disk(&self) -> &DiskDescriptor {
        &self.disk
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Copy the boot sector to offset 0 and size the reserved area from it.
    ///
    /// Bytes past the end of a short final sector stay zero.
    pub fn write_boot_sector(&mut self, boot: &BootSector<'_>) {
        self.disk.reserved_sectors = boot.reserved_sectors;
        self.data[..boot.data.len()].copy_from_slice(boot.data);
    }

    /// Write the cluster 0 and cluster 1 markers into both FAT copies
    pub fn write_reserved_markers(&mut self) {
        for copy in 0..2 {
            let table = self.disk.fat_offset(copy);
            self.set_fat_entry(table, 0, MEDIA_MARKER);
            self.set_fat_entry(table, 1, END_OF_CHAIN);
        }
    }

    /// Store one FAT12 entry in the table starting at `table_offset`
    pub fn set_fat_entry(&mut self, table_offset: usize, index: usize, value: u16) {
        let table = &mut self.data[table_offset..table_offset + fat::FAT_SIZE];
        fat::write_entry(table, index, value);
    }

    /// Store `entry` in root directory slot `slot`
    pub fn set_root_entry(&mut self, slot: usize, entry: &DirEntry) {
        let offset = self.disk.root_entry_offset(slot);
        self.data[offset..offset + geometry::DIR_ENTRY_SIZE].copy_from_slice(&entry.to_bytes());
    }

    /// Reserve the next root directory slot
    pub fn allocate_root_entry(&mut self) -> Option<usize> {
        if self.disk.free_root_entries() == 0 {
            return None;
        }
        let slot = self.disk.next_unused_root_entry;
        self.disk.next_unused_root_entry += 1;
        Some(slot)
    }

    /// Chain `contents` through consecutive clusters starting at the next
    /// unused one, in both FAT copies, and copy it into the data region.
    ///
    /// The caller checks that enough sectors are free.
    pub fn write_chain(&mut self, contents: &[u8]) {
        let sectors = sectors_for(contents.len());

        for (i, chunk) in contents.chunks(SECTOR_SIZE).enumerate() {
            let cluster = self.disk.next_unused_cluster;
            let next = if i + 1 < sectors {
                (cluster + 1) as u16
            } else {
                END_OF_CHAIN
            };

            for copy in 0..2 {
                let table = self.disk.fat_offset(copy);
                self.set_fat_entry(table, cluster, next);
            }

            let offset = self.disk.next_unused_sector() * SECTOR_SIZE;
            self.data[offset..offset + chunk.len()].copy_from_slice(chunk);

            self.disk.next_unused_cluster += 1;
        }
    }

    /// Read-only view of FAT copy `copy`
    pub fn fat_table(&self, copy: usize) -> FatTable<'_> {
        let start = self.disk.fat_offset(copy);
        FatTable::new(&self.data[start..start + fat::FAT_SIZE])
    }

    /// Entry `cluster` of FAT copy `copy`
    pub fn fat_entry(&self, copy: usize, cluster: u16) -> FatEntry {
        self.fat_table(copy).get_entry(cluster)
    }

    /// Parse root directory slot `slot`
    pub fn root_entry(&self, slot: usize) -> Option<DirEntry> {
        if slot >= ROOT_DIR_ENTRIES {
            return None;
        }
        let offset = self.disk.root_entry_offset(slot);
        DirEntry::from_bytes(&self.data[offset..offset + geometry::DIR_ENTRY_SIZE])
    }

    /// All used root directory entries, in slot order
    pub fn root_entries(&self) -> Vec<DirEntry> {
        (0..ROOT_DIR_ENTRIES)
            .map_while(|slot| self.root_entry(slot))
            .collect()
    }

    /// Clusters of the chain starting at `start`, read from FAT copy 0
    pub fn cluster_chain(&self, start: u16) -> Vec<u16> {
        self.fat_table(0).get_cluster_chain(start)
    }

    /// Read back the contents of a placed file
    pub fn read_file(&self, entry: &DirEntry) -> Vec<u8> {
        let mut data = Vec::with_capacity(entry.size as usize);

        for cluster in self.cluster_chain(entry.cluster()) {
            let start = self.disk.cluster_to_sector(cluster as usize) * SECTOR_SIZE;
            let end = (start + SECTOR_SIZE).min(self.data.len());
            data.extend_from_slice(&self.data[start..end]);
        }

        data.truncate(entry.size as usize);
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_image() {
        let mut image = FloppyImage::new();
        image.write_reserved_markers();

        assert_eq!(image.as_bytes().len(), 1_474_560);
        assert_eq!(&image.as_bytes()[512..515], &[0xF0, 0xFF, 0xFF]);
        assert_eq!(&image.as_bytes()[512 + 9 * 512..512 + 9 * 512 + 3], &[0xF0, 0xFF, 0xFF]);
        assert!(image.root_entries().is_empty());
    }

    #[test]
    fn test_chain_both_copies() {
        let mut image = FloppyImage::new();
        image.write_reserved_markers();
        image.write_chain(&[0xAB; 1300]);

        assert_eq!(image.disk().next_unused_cluster, 5);
        for copy in 0..2 {
            assert_eq!(image.fat_entry(copy, 2), FatEntry::Data(3));
            assert_eq!(image.fat_entry(copy, 3), FatEntry::Data(4));
            assert_eq!(image.fat_entry(copy, 4), FatEntry::EndOfChain);
            assert_eq!(image.fat_entry(copy, 5), FatEntry::Free);
        }
        assert_eq!(image.cluster_chain(2), vec![2, 3, 4]);

        // last sector is a short write, the rest stays zero
        let last = (21 + 2) * SECTOR_SIZE;
        assert_eq!(image.as_bytes()[last + 275], 0xAB);
        assert_eq!(image.as_bytes()[last + 276], 0);
    }

    #[test]
    fn test_empty_chain_allocates_nothing() {
        let mut image = FloppyImage::new();
        image.write_chain(&[]);
        assert_eq!(image.disk().next_unused_cluster, 2);
    }

    #[test]
    fn test_root_slots_run_out() {
        let mut image = FloppyImage::new();
        for expected in 0..ROOT_DIR_ENTRIES {
            assert_eq!(image.allocate_root_entry(), Some(expected));
        }
        assert_eq!(image.allocate_root_entry(), None);
    }
}
