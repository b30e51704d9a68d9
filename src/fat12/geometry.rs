//! 1.44 MB floppy geometry
//!
//! Every region offset of the image is derived from four integers: the sector
//! size, the sectors of one FAT copy, the root directory sectors and the
//! reserved sector count. The descriptor also carries the allocation cursors
//! used while files are placed.

/// Bytes per sector
pub const SECTOR_SIZE: usize = 512;
/// Sectors of one FAT copy
pub const FAT_SECTORS: usize = 9;
/// Sectors of the root directory
pub const ROOT_DIR_SECTORS: usize = 2;
/// Size of one directory entry in bytes
pub const DIR_ENTRY_SIZE: usize = 32;
/// Total size of the floppy image (1440 KiB)
pub const FLOPPY_SIZE: usize = 1440 * 1024;
/// Number of sectors on the floppy
pub const TOTAL_SECTORS: usize = FLOPPY_SIZE / SECTOR_SIZE;
/// Number of slots in the root directory
pub const ROOT_DIR_ENTRIES: usize = ROOT_DIR_SECTORS * SECTOR_SIZE / DIR_ENTRY_SIZE;
/// First cluster usable for file data (0 and 1 are reserved)
pub const FIRST_DATA_CLUSTER: usize = 2;

/// Layout and allocation state of one image build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskDescriptor {
    /// Sectors occupied by the boot sector
    pub reserved_sectors: usize,
    /// Next cluster to hand out
    pub next_unused_cluster: usize,
    /// Next root directory slot to hand out
    pub next_unused_root_entry: usize,
}

impl Default for DiskDescriptor {
    fn default() -> Self {
        DiskDescriptor {
            reserved_sectors: 1,
            next_unused_cluster: FIRST_DATA_CLUSTER,
            next_unused_root_entry: 0,
        }
    }
}

impl DiskDescriptor {
    /// Descriptor with a single reserved sector and empty cursors
    pub fn new() -> Self {
        Self::default()
    }

    /// Byte offset of the first FAT copy
    #[inline]
    pub fn fat0_offset(&self) -> usize {
        self.reserved_sectors * SECTOR_SIZE
    }

    /// Byte offset of the second FAT copy
    #[inline]
    pub fn fat1_offset(&self) -> usize {
        self.fat0_offset() + FAT_SECTORS * SECTOR_SIZE
    }

    /// Byte offset of FAT copy `copy` (0 or 1)
    #[inline]
    pub fn fat_offset(&self, copy: usize) -> usize {
        self.fat0_offset() + copy * FAT_SECTORS * SECTOR_SIZE
    }

    /// Byte offset of the root directory
    #[inline]
    pub fn root_dir_offset(&self) -> usize {
        self.fat1_offset() + FAT_SECTORS * SECTOR_SIZE
    }

    /// Byte offset of root directory slot `slot`
    #[inline]
    pub fn root_entry_offset(&self, slot: usize) -> usize {
        self.root_dir_offset() + slot * DIR_ENTRY_SIZE
    }

    /// First sector of the data region
    #[inline]
    pub fn first_data_sector(&self) -> usize {
        self.reserved_sectors + 2 * FAT_SECTORS + ROOT_DIR_SECTORS
    }

    /// Sector holding cluster `cluster` (one sector per cluster)
    #[inline]
    pub fn cluster_to_sector(&self, cluster: usize) -> usize {
        self.first_data_sector() + (cluster - FIRST_DATA_CLUSTER)
    }

    /// Sector backing the next unused cluster
    #[inline]
    pub fn next_unused_sector(&self) -> usize {
        self.cluster_to_sector(self.next_unused_cluster)
    }

    /// Data sectors not yet handed out
    pub fn free_sectors(&self) -> usize {
        TOTAL_SECTORS.saturating_sub(self.next_unused_sector())
    }

    /// Root directory slots not yet handed out
    pub fn free_root_entries(&self) -> usize {
        ROOT_DIR_ENTRIES.saturating_sub(self.next_unused_root_entry)
    }
}

/// Number of whole sectors needed for `len` bytes
#[inline]
pub fn sectors_for(len: usize) -> usize {
    len.div_ceil(SECTOR_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let disk = DiskDescriptor::new();
        assert_eq!(disk.fat0_offset(), 512);
        assert_eq!(disk.fat1_offset(), 512 + 9 * 512);
        assert_eq!(disk.root_dir_offset(), 19 * 512);
        assert_eq!(disk.first_data_sector(), 21);
        assert_eq!(disk.next_unused_sector(), 21);
        assert_eq!(disk.fat_offset(1), disk.fat1_offset());
    }

    #[test]
    fn test_layout_follows_reserved_sectors() {
        let mut disk = DiskDescriptor::new();
        disk.reserved_sectors = 4;
        assert_eq!(disk.fat0_offset(), 4 * 512);
        assert_eq!(disk.root_dir_offset(), 22 * 512);
        assert_eq!(disk.first_data_sector(), 24);

        disk.next_unused_cluster = 10;
        assert_eq!(disk.next_unused_sector(), 32);
    }

    #[test]
    fn test_capacity() {
        assert_eq!(TOTAL_SECTORS, 2880);
        assert_eq!(ROOT_DIR_ENTRIES, 32);

        let disk = DiskDescriptor::new();
        assert_eq!(disk.free_sectors(), 2880 - 21);
        assert_eq!(disk.free_root_entries(), 32);
    }

    #[test]
    fn test_sectors_for() {
        assert_eq!(sectors_for(0), 0);
        assert_eq!(sectors_for(1), 1);
        assert_eq!(sectors_for(512), 1);
        assert_eq!(sectors_for(513), 2);
        assert_eq!(sectors_for(600), 2);
    }
}
