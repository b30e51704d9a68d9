//! Root directory entry handling
//!
//! Directory entries are 32-byte structures containing file metadata in the
//! short (8.3) form. Long file names are not produced.

extern crate alloc;
use alloc::string::String;

use byteorder::{ByteOrder, LittleEndian};

use super::datetime::Timestamp;
use super::geometry::DIR_ENTRY_SIZE;

// Directory entry attribute flags
/// Read-only file
pub const ATTR_READ_ONLY: u8 = 0x01;
/// Hidden file
pub const ATTR_HIDDEN: u8 = 0x02;
/// System file
pub const ATTR_SYSTEM: u8 = 0x04;
/// Volume label (root directory only)
pub const ATTR_VOLUME_ID: u8 = 0x08;
/// Directory
pub const ATTR_DIRECTORY: u8 = 0x10;
/// Archive flag
pub const ATTR_ARCHIVE: u8 = 0x20;

/// Directory entry (32 bytes)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
    /// Short filename (8 chars, space-padded)
    pub name: [u8; 8],
    /// Extension (3 chars, space-padded)
    pub ext: [u8; 3],
    /// File attributes
    pub attr: u8,
    /// Creation time, 10ths of a second
    pub create_tenths: u8,
    /// Creation time (raw)
    pub create_time: u16,
    /// Creation date (raw)
    pub create_date: u16,
    /// Last access date (raw)
    pub access_date: u16,
    /// High 16 bits of cluster number, always 0 on FAT12
    pub cluster_high: u16,
    /// Last modification time (raw)
    pub modify_time: u16,
    /// Last modification date (raw)
    pub modify_date: u16,
    /// Low 16 bits of cluster number
    pub cluster_low: u16,
    /// File size in bytes
    pub size: u32,
}

/// Split a file name at its last dot into base name and extension.
pub fn split_name(file_name: &str) -> (&str, &str) {
    match file_name.rsplit_once('.') {
        Some((base, ext)) => (base, ext),
        None => (file_name, ""),
    }
}

/// Space-pad or truncate `text` to `N` ASCII bytes.
///
/// Characters outside printable ASCII become `?`.
fn pad_field<const N: usize>(text: &str) -> [u8; N] {
    let mut field = [b' '; N];
    for (slot, c) in field.iter_mut().zip(text.chars()) {
        *slot = if c.is_ascii() && !c.is_ascii_control() {
            c as u8
        } else {
            b'?'
        };
    }
    field
}

impl DirEntry {
    /// Build the entry for a file placed at `start_cluster`
    pub fn for_file(
        file_name: &str,
        start_cluster: u16,
        size: u32,
        created: Timestamp,
        modified: Timestamp,
        attr: u8,
    ) -> Self {
        let (base, ext) = split_name(file_name);

        DirEntry {
            name: pad_field(base),
            ext: pad_field(ext),
            attr,
            create_tenths: created.fine_tenths(),
            create_time: created.fat_time(),
            create_date: created.fat_date(),
            access_date: 0,
            cluster_high: 0,
            modify_time: modified.fat_time(),
            modify_date: modified.fat_date(),
            cluster_low: start_cluster,
            size,
        }
    }

    /// Serialize to the on-disk layout
    pub fn to_bytes(&self) -> [u8; DIR_ENTRY_SIZE] {
        let mut raw = [0u8; DIR_ENTRY_SIZE];

        raw[0..8].copy_from_slice(&self.name);
        raw[8..11].copy_from_slice(&self.ext);
        raw[11] = self.attr;
        // raw[12] is reserved for Windows NT
        raw[13] = self.create_tenths;
        LittleEndian::write_u16(&mut raw[14..16], self.create_time);
        LittleEndian::write_u16(&mut raw[16..18], self.create_date);
        LittleEndian::write_u16(&mut raw[18..20], self.access_date);
        LittleEndian::write_u16(&mut raw[20..22], self.cluster_high);
        LittleEndian::write_u16(&mut raw[22..24], self.modify_time);
        LittleEndian::write_u16(&mut raw[24..26], self.modify_date);
        LittleEndian::write_u16(&mut raw[26..28], self.cluster_low);
        LittleEndian::write_u32(&mut raw[28..32], self.size);

        raw
    }

    /// Parse directory entry from 32 bytes
    ///
    /// # Returns
    /// * `Some(DirEntry)` if valid entry
    /// * `None` if entry is deleted (0xE5) or end marker (0x00)
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < DIR_ENTRY_SIZE {
            return None;
        }

        if data[0] == 0x00 || data[0] == 0xE5 {
            return None;
        }

        let mut name = [0u8; 8];
        let mut ext = [0u8; 3];
        name.copy_from_slice(&data[0..8]);
        ext.copy_from_slice(&data[8..11]);

        Some(DirEntry {
            name,
            ext,
            attr: data[11],
            create_tenths: data[13],
            create_time: LittleEndian::read_u16(&data[14..16]),
            create_date: LittleEndian::read_u16(&data[16..18]),
            access_date: LittleEndian::read_u16(&data[18..20]),
            cluster_high: LittleEndian::read_u16(&data[20..22]),
            modify_time: LittleEndian::read_u16(&data[22..24]),
            modify_date: LittleEndian::read_u16(&data[24..26]),
            cluster_low: LittleEndian::read_u16(&data[26..28]),
            size: LittleEndian::read_u32(&data[28..32]),
        })
    }

    /// Starting cluster
    #[inline]
    pub fn cluster(&self) -> u16 {
        self.cluster_low
    }

    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.attr & ATTR_READ_ONLY != 0
    }

    #[inline]
    pub fn is_system(&self) -> bool {
        self.attr & ATTR_SYSTEM != 0
    }

    #[inline]
    pub fn is_directory(&self) -> bool {
        self.attr & ATTR_DIRECTORY != 0
    }

    pub fn created(&self) -> Timestamp {
        Timestamp::from_fat(self.create_date, self.create_time)
    }

    pub fn modified(&self) -> Timestamp {
        Timestamp::from_fat(self.modify_date, self.modify_time)
    }

    /// Get display name in standard format (NAME.EXT)
    pub fn display_name(&self) -> String {
        let trim = |bytes: &[u8]| -> String {
            let end = bytes.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
            bytes[..end].iter().map(|&b| b as char).collect()
        };

        let name_part = trim(&self.name);
        let ext_part = trim(&self.ext);

        if ext_part.is_empty() {
            name_part
        } else {
            alloc::format!("{}.{}", name_part, ext_part)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHEN: Timestamp = Timestamp::new(2024, 3, 5, 13, 45, 30);

    fn entry(name: &str) -> DirEntry {
        DirEntry::for_file(name, 2, 600, WHEN, WHEN, ATTR_SYSTEM | ATTR_READ_ONLY)
    }

    #[test]
    fn test_long_name_truncated() {
        let e = entry("ABCDEFGHIJ.TXT");
        assert_eq!(&e.name, b"ABCDEFGH");
        assert_eq!(&e.ext, b"TXT");
        assert_eq!(e.display_name(), "ABCDEFGH.TXT");
    }

    #[test]
    fn test_short_fields_padded() {
        let e = entry("KERNEL.MD");
        assert_eq!(&e.name, b"KERNEL  ");
        assert_eq!(&e.ext, b"MD ");

        let e = entry("README");
        assert_eq!(&e.ext, b"   ");
        assert_eq!(e.display_name(), "README");

        let e = entry("archive.tar.gzip");
        assert_eq!(&e.name, b"archive.");
        assert_eq!(&e.ext, b"gzi");
    }

    #[test]
    fn test_non_ascii_replaced() {
        let e = entry("caf\u{e9}.txt");
        assert_eq!(&e.name, b"caf?    ");
    }

    #[test]
    fn test_layout() {
        let raw = entry("BOOT.BIN").to_bytes();

        assert_eq!(&raw[0..11], b"BOOT    BIN");
        assert_eq!(raw[11], ATTR_SYSTEM | ATTR_READ_ONLY);
        assert_eq!(raw[12], 0);
        assert_eq!(raw[13], 10);
        assert_eq!(u16::from_le_bytes([raw[14], raw[15]]), (13 << 11) | (45 << 5) | 15);
        assert_eq!(u16::from_le_bytes([raw[16], raw[17]]), (44 << 9) | (3 << 5) | 5);
        assert_eq!(&raw[18..22], &[0, 0, 0, 0]);
        assert_eq!(&raw[22..26], &raw[14..18]);
        assert_eq!(u16::from_le_bytes([raw[26], raw[27]]), 2);
        assert_eq!(u32::from_le_bytes([raw[28], raw[29], raw[30], raw[31]]), 600);
    }

    #[test]
    fn test_parse_back() {
        let e = entry("BOOT.BIN");
        let parsed = DirEntry::from_bytes(&e.to_bytes()).unwrap();
        assert_eq!(parsed, e);
        assert!(parsed.is_system());
        assert!(parsed.is_read_only());
        assert!(!parsed.is_directory());
        assert_eq!(parsed.created(), WHEN);
    }

    #[test]
    fn test_deleted_and_end_markers() {
        let mut data = [0u8; 32];
        assert!(DirEntry::from_bytes(&data).is_none());
        data[0] = 0xE5;
        assert!(DirEntry::from_bytes(&data).is_none());
    }
}
