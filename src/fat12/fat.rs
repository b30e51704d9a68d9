//! FAT (File Allocation Table) handling
//!
//! FAT12 stores one 12-bit entry per cluster, two entries packed into every
//! three bytes. Entry `n` starts at byte `n * 3 / 2`: an even entry owns the
//! whole first byte and the low nibble of the second, an odd entry owns the
//! high nibble of the first byte and the whole second byte.

extern crate alloc;
use alloc::vec::Vec;

use super::geometry::{FAT_SECTORS, SECTOR_SIZE};

/// Mask of a 12-bit entry
pub const FAT12_MASK: u16 = 0x0FFF;
/// Value written into cluster 0 (media descriptor 0xF0)
pub const MEDIA_MARKER: u16 = 0xFF0;
/// End-of-chain marker, also written into cluster 1
pub const END_OF_CHAIN: u16 = 0xFFF;
/// Bytes in one FAT copy
pub const FAT_SIZE: usize = FAT_SECTORS * SECTOR_SIZE;
/// Entries that fit in one FAT copy
pub const FAT_ENTRIES: usize = FAT_SIZE * 2 / 3;

/// FAT entry types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatEntry {
    /// Cluster is free (0x000)
    Free,
    /// Reserved value (0x001, 0xFF0-0xFF6)
    Reserved,
    /// Data cluster - value is next cluster number
    Data(u16),
    /// Bad cluster (0xFF7)
    BadCluster,
    /// End of cluster chain (0xFF8-0xFFF)
    EndOfChain,
}

impl FatEntry {
    /// Classify a raw entry value (only the low 12 bits count)
    pub fn from_raw(value: u16) -> Self {
        match value & FAT12_MASK {
            0x000 => FatEntry::Free,
            0x001 | 0xFF0..=0xFF6 => FatEntry::Reserved,
            0xFF7 => FatEntry::BadCluster,
            0xFF8..=0xFFF => FatEntry::EndOfChain,
            n => FatEntry::Data(n),
        }
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        matches!(self, FatEntry::EndOfChain)
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        matches!(self, FatEntry::Free)
    }

    /// Get next cluster number if this is a data entry
    #[inline]
    pub fn next_cluster(&self) -> Option<u16> {
        match self {
            FatEntry::Data(n) => Some(*n),
            _ => None,
        }
    }
}

/// Byte offset of the 3-byte group shared by entry `index`
#[inline]
fn pair_offset(index: usize) -> usize {
    (index * 3) / 2
}

/// Store `value` as entry `index` of `table`.
///
/// The two bytes holding the entry are read, merged and written back as one
/// operation so that the neighbouring entry sharing the middle byte keeps
/// its nibble whatever order the pair is written in. Values wider than 12
/// bits are truncated.
pub fn write_entry(table: &mut [u8], index: usize, value: u16) {
    let offset = pair_offset(index);
    let pair = [table[offset], table[offset + 1]];
    let value = value & FAT12_MASK;

    let packed = if index & 1 == 0 {
        [
            (value & 0xFF) as u8,
            (pair[1] & 0xF0) | (value >> 8) as u8,
        ]
    } else {
        [
            (pair[0] & 0x0F) | ((value & 0x0F) << 4) as u8,
            (value >> 4) as u8,
        ]
    };

    table[offset..offset + 2].copy_from_slice(&packed);
}

/// Load the raw 12-bit value of entry `index`
pub fn read_entry(table: &[u8], index: usize) -> u16 {
    let offset = pair_offset(index);
    let word = u16::from_le_bytes([table[offset], table[offset + 1]]);

    if index & 1 == 0 {
        word & FAT12_MASK
    } else {
        word >> 4
    }
}

/// FAT table reader
///
/// Provides read-only access to one FAT12 copy.
pub struct FatTable<'a> {
    data: &'a [u8],
}

impl<'a> FatTable<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        FatTable { data }
    }

    /// Get FAT entry for a cluster, or EndOfChain if out of bounds
    pub fn get_entry(&self, cluster: u16) -> FatEntry {
        let offset = pair_offset(cluster as usize);
        if offset + 2 > self.data.len() {
            return FatEntry::EndOfChain;
        }

        FatEntry::from_raw(read_entry(self.data, cluster as usize))
    }

    /// Follow the chain starting at `start` until end-of-chain.
    pub fn get_cluster_chain(&self, start: u16) -> Vec<u16> {
        let mut chain = Vec::new();
        let mut current = start;

        loop {
            // Cluster numbers < 2 are invalid for data
            if current < 2 {
                break;
            }

            // A chain can never be longer than the table
            if chain.len() >= FAT_ENTRIES {
                break;
            }

            chain.push(current);

            match self.get_entry(current) {
                FatEntry::Data(next) => {
                    if next == current {
                        break;
                    }
                    current = next;
                }
                _ => break,
            }
        }

        chain
    }
}
