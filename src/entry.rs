//! The 32-byte directory entry record and 8.3 name handling.
//!
//! Layout follows `examples/original_source/sfs.h`'s `entry_t` exactly:
//! 8-byte name, 3-byte extension, attribute byte, timestamps, starting
//! cluster, size. `CelestialMelody-fat32-rs`'s `ShortDirEntry`
//! (`examples/CelestialMelody-fat32-rs/src/entry.rs`) additionally carries
//! a 32-bit cluster split across `fst_clus_hi`/`fst_clus_lo` for FAT32; on
//! FAT12 the starting cluster is a single 16-bit field, so that split does
//! not apply here.

pub const ATTR_READ_ONLY: u8 = 0x01;
pub const ATTR_HIDDEN: u8 = 0x02;
pub const ATTR_SYSTEM: u8 = 0x04;
pub const ATTR_VOLUME_ID: u8 = 0x08;
pub const ATTR_DIRECTORY: u8 = 0x10;
pub const ATTR_ARCHIVE: u8 = 0x20;
/// Marks a long-file-name slot; such slots are skipped, never produced.
pub const ATTR_LONG_NAME: u8 = 0x0F;

/// `filename[0]` sentinel: this slot and every slot after it in the
/// directory are unused.
pub const NAME_FREE_TERMINAL: u8 = 0x00;
/// `filename[0]` sentinel: this slot was deleted and may be reused.
pub const NAME_DELETED: u8 = 0xE5;
/// `filename[0]` sentinel: a `.` or `..` self/parent entry.
pub const NAME_DOT: u8 = 0x2E;

pub const ENTRY_SIZE: usize = 32;

/// One 32-byte directory record, decoded.
#[derive(Debug, Clone, Copy)]
pub struct DirEntry {
    pub name: [u8; 8],
    pub extension: [u8; 3],
    pub attributes: u8,
    pub create_time_hundredths: u8,
    pub create_time: u16,
    pub create_date: u16,
    pub last_access_date: u16,
    pub last_modified_time: u16,
    pub last_modified_date: u16,
    pub start_cluster: u16,
    pub size: u32,
}

impl DirEntry {
    pub fn parse(bytes: &[u8; ENTRY_SIZE]) -> Self {
        let mut name = [0u8; 8];
        name.copy_from_slice(&bytes[0..8]);
        let mut extension = [0u8; 3];
        extension.copy_from_slice(&bytes[8..11]);

        Self {
            name,
            extension,
            attributes: bytes[11],
            create_time_hundredths: bytes[13],
            create_time: u16::from_le_bytes([bytes[14], bytes[15]]),
            create_date: u16::from_le_bytes([bytes[16], bytes[17]]),
            last_access_date: u16::from_le_bytes([bytes[18], bytes[19]]),
            last_modified_time: u16::from_le_bytes([bytes[22], bytes[23]]),
            last_modified_date: u16::from_le_bytes([bytes[24], bytes[25]]),
            start_cluster: u16::from_le_bytes([bytes[26], bytes[27]]),
            size: u32::from_le_bytes([bytes[28], bytes[29], bytes[30], bytes[31]]),
        }
    }

    pub fn to_bytes(&self) -> [u8; ENTRY_SIZE] {
        let mut out = [0u8; ENTRY_SIZE];
        out[0..8].copy_from_slice(&self.name);
        out[8..11].copy_from_slice(&self.extension);
        out[11] = self.attributes;
        // byte 12 (reserved) stays zero
        out[13] = self.create_time_hundredths;
        out[14..16].copy_from_slice(&self.create_time.to_le_bytes());
        out[16..18].copy_from_slice(&self.create_date.to_le_bytes());
        out[18..20].copy_from_slice(&self.last_access_date.to_le_bytes());
        // bytes 20..22 (reserved) stay zero
        out[22..24].copy_from_slice(&self.last_modified_time.to_le_bytes());
        out[24..26].copy_from_slice(&self.last_modified_date.to_le_bytes());
        out[26..28].copy_from_slice(&self.start_cluster.to_le_bytes());
        out[28..32].copy_from_slice(&self.size.to_le_bytes());
        out
    }

    pub fn is_free_terminal(&self) -> bool {
        self.name[0] == NAME_FREE_TERMINAL
    }

    pub fn is_deleted(&self) -> bool {
        self.name[0] == NAME_DELETED
    }

    pub fn is_dot_entry(&self) -> bool {
        self.name[0] == NAME_DOT
    }

    pub fn is_long_name(&self) -> bool {
        self.attributes == ATTR_LONG_NAME
    }

    /// Matches only the exact volume-ID attribute byte, not any attribute
    /// that merely has the bit set alongside others.
    pub fn is_volume_label(&self) -> bool {
        self.attributes == ATTR_VOLUME_ID
    }

    pub fn is_directory(&self) -> bool {
        self.attributes & ATTR_DIRECTORY != 0
    }

    /// Canonical 8.3 name formatting: strip trailing spaces from each
    /// part; only append `.EXT` when the extension is non-empty.
    pub fn trimmed_name(&self) -> String {
        trim_8_3(&self.name, &self.extension)
    }

    /// The 8-byte name field as stored on disk, space-padded, extension
    /// not included. `disklist.c:list_dir_entries` prints this form (not
    /// the trimmed 8.3 name) for a subdirectory's row and header line, and
    /// `diskinfo.c:main` prints it the same way for the volume label.
    pub fn raw_name(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }

    /// Build a fresh entry for a file being inserted.
    /// Name/extension come from [`split_host_name`]; timestamps come from
    /// [`crate::datetime`].
    pub fn new_file(
        name: [u8; 8],
        extension: [u8; 3],
        size: u32,
        start_cluster: u16,
        packed_date: u16,
        packed_time: u16,
    ) -> Self {
        Self {
            name,
            extension,
            attributes: 0,
            create_time_hundredths: 0,
            create_time: packed_time,
            create_date: packed_date,
            last_access_date: packed_date,
            last_modified_time: packed_time,
            last_modified_date: packed_date,
            start_cluster,
            size,
        }
    }
}

/// Trim a raw 8+3 on-disk name pair into a canonical `NAME.EXT` (or bare
/// `NAME`) string.
pub fn trim_8_3(name: &[u8; 8], extension: &[u8; 3]) -> String {
    let name_part = std::str::from_utf8(name)
        .unwrap_or("")
        .trim_end_matches(' ');
    let mut out = String::with_capacity(12);
    out.push_str(name_part);
    if extension[0] != b' ' {
        let ext_part = std::str::from_utf8(extension)
            .unwrap_or("")
            .trim_end_matches(' ');
        out.push('.');
        out.push_str(ext_part);
    }
    out
}

/// Split an uppercased host filename into space-padded 8-byte name and
/// 3-byte extension fields for insertion: split at the first `.` within
/// the first 8 characters; truncate each part to its field width.
pub fn split_host_name(file_name: &str) -> ([u8; 8], [u8; 3]) {
    let bytes = file_name.as_bytes();
    let dot = bytes.iter().take(8).position(|&b| b == b'.');

    let mut name = [b' '; 8];
    let mut extension = [b' '; 3];

    match dot {
        Some(dot_index) => {
            let stem = &bytes[..dot_index];
            let len = stem.len().min(8);
            name[..len].copy_from_slice(&stem[..len]);

            let ext = &bytes[dot_index + 1..];
            let len = ext.len().min(3);
            extension[..len].copy_from_slice(&ext[..len]);
        }
        None => {
            let len = bytes.len().min(8);
            name[..len].copy_from_slice(&bytes[..len]);
        }
    }

    (name, extension)
}
