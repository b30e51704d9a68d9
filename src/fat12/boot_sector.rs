//! Boot sector loading
//!
//! The boot sector is copied verbatim to the start of the image. Its length
//! decides how many reserved sectors precede the first FAT, and the BIOS
//! Parameter Block inside it is checked against that count.

use core::fmt;

use super::geometry::{sectors_for, FAT_SECTORS, ROOT_DIR_SECTORS, SECTOR_SIZE, TOTAL_SECTORS};
use crate::error::{Error, Result};

/// Offset of the BPB reserved sector count field
pub const BPB_RESERVED_SECTORS_OFFSET: usize = 14;

/// Non-fatal boot sector inconsistency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootWarning {
    /// Length is not a whole number of sectors; the tail is zero padded
    NotSectorAligned { sectors: usize },
    /// BPB reserved sector count differs from the computed one
    ReservedCountMismatch { expected: usize, found: u16 },
    /// Too short to reach the BPB field
    MissingBpb,
}

impl fmt::Display for BootWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootWarning::NotSectorAligned { sectors } => write!(
                f,
                "boot sector is not a multiple of {} bytes - padding with zero bytes to {} sector(s) ({} bytes).",
                SECTOR_SIZE,
                sectors,
                sectors * SECTOR_SIZE
            ),
            BootWarning::ReservedCountMismatch { expected, found } => write!(
                f,
                "the BIOS parameter block's reserved sector count (at offset {}) does not match the boot sector count. Expected {}, but found {}.",
                BPB_RESERVED_SECTORS_OFFSET, expected, found
            ),
            BootWarning::MissingBpb => {
                write!(f, "boot sector is too short to hold a BIOS parameter block.")
            }
        }
    }
}

/// A boot sector image and the reserved sector count it occupies
#[derive(Debug, Clone)]
pub struct BootSector<'a> {
    /// Raw bytes as supplied
    pub data: &'a [u8],
    /// Sectors covered by `data`, rounded up
    pub reserved_sectors: usize,
}

impl<'a> BootSector<'a> {
    /// Measure a boot sector image.
    ///
    /// Fails when the reserved area would leave no room for both FATs, the
    /// root directory and at least one data sector.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let reserved_sectors = sectors_for(data.len()).max(1);

        if reserved_sectors + 2 * FAT_SECTORS + ROOT_DIR_SECTORS >= TOTAL_SECTORS {
            return Err(Error::BootSectorTooLarge {
                sectors: reserved_sectors,
            });
        }

        Ok(BootSector {
            data,
            reserved_sectors,
        })
    }

    /// Whether the image ends exactly on a sector boundary
    #[inline]
    pub fn is_sector_aligned(&self) -> bool {
        self.data.len() % SECTOR_SIZE == 0
    }

    /// Reserved sector count declared in the BIOS Parameter Block, if the
    /// image is long enough to hold the field
    pub fn bpb_reserved_sectors(&self) -> Option<u16> {
        let field = self
            .data
            .get(BPB_RESERVED_SECTORS_OFFSET..BPB_RESERVED_SECTORS_OFFSET + 2)?;
        Some(u16::from_le_bytes([field[0], field[1]]))
    }

    /// Non-fatal inconsistencies of this boot sector, in reporting order.
    ///
    /// The computed reserved sector count always wins over the BPB field.
    pub fn check(&self) -> Vec<BootWarning> {
        let mut warnings = Vec::new();

        if !self.is_sector_aligned() {
            warnings.push(BootWarning::NotSectorAligned {
                sectors: self.reserved_sectors,
            });
        }

        match self.bpb_reserved_sectors() {
            Some(declared) if declared as usize == self.reserved_sectors => {}
            Some(declared) => warnings.push(BootWarning::ReservedCountMismatch {
                expected: self.reserved_sectors,
                found: declared,
            }),
            None => warnings.push(BootWarning::MissingBpb),
        }

        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boot_image(len: usize, declared: u16) -> Vec<u8> {
        let mut data = vec![0u8; len];
        data[0] = 0xEB;
        data[1] = 0x3C;
        data[2] = 0x90;
        data[14..16].copy_from_slice(&declared.to_le_bytes());
        if len >= 512 {
            data[510] = 0x55;
            data[511] = 0xAA;
        }
        data
    }

    #[test]
    fn test_single_sector() {
        let data = boot_image(512, 1);
        let boot = BootSector::new(&data).unwrap();
        assert_eq!(boot.reserved_sectors, 1);
        assert!(boot.is_sector_aligned());
        assert_eq!(boot.bpb_reserved_sectors(), Some(1));
        assert!(boot.check().is_empty());
    }

    #[test]
    fn test_partial_sector_rounds_up() {
        let data = boot_image(1100, 3);
        let boot = BootSector::new(&data).unwrap();
        assert_eq!(boot.reserved_sectors, 3);
        assert!(!boot.is_sector_aligned());

        let warnings = boot.check();
        assert_eq!(warnings, vec![BootWarning::NotSectorAligned { sectors: 3 }]);
        assert_eq!(
            warnings[0].to_string(),
            "boot sector is not a multiple of 512 bytes - padding with zero bytes to 3 sector(s) (1536 bytes)."
        );
    }

    #[test]
    fn test_mismatch_keeps_computed_count() {
        let data = boot_image(1024, 1);
        let boot = BootSector::new(&data).unwrap();
        assert_eq!(boot.reserved_sectors, 2);
        assert_eq!(boot.bpb_reserved_sectors(), Some(1));

        // aligned, so the mismatch is the only complaint
        let warnings = boot.check();
        assert_eq!(
            warnings,
            vec![BootWarning::ReservedCountMismatch { expected: 2, found: 1 }]
        );
        assert!(warnings[0].to_string().ends_with("Expected 2, but found 1."));
    }

    #[test]
    fn test_too_short_for_bpb() {
        let data = [0xF4u8; 10];
        let boot = BootSector::new(&data).unwrap();
        assert_eq!(boot.bpb_reserved_sectors(), None);
        assert_eq!(boot.reserved_sectors, 1);
        assert_eq!(
            boot.check(),
            vec![BootWarning::NotSectorAligned { sectors: 1 }, BootWarning::MissingBpb]
        );
    }

    #[test]
    fn test_oversized_boot_sector() {
        let data = vec![0u8; (TOTAL_SECTORS - 20) * SECTOR_SIZE];
        assert!(matches!(
            BootSector::new(&data),
            Err(Error::BootSectorTooLarge { sectors: 2860 })
        ));
    }
}
