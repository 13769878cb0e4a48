//! Boot sector and BIOS Parameter Block (BPB).
//!
//! The first 512 bytes of a FAT12 volume hold the boot sector. Byte offsets
//! below follow `examples/original_source/sfs.h`'s `boot_t` layout exactly;
//! all multi-byte fields are little-endian on disk regardless of host
//! endianness, so every field is read with an explicit `from_le_bytes` call
//! rather than transmuted from a `#[repr(packed)]` struct —
//! `examples/CelestialMelody-fat32-rs/src/bpb.rs` transmutes a packed
//! struct directly over the sector bytes, which is fine on the
//! little-endian hosts it targets but not portable; explicit decoding costs
//! nothing here since the boot sector is parsed exactly once per run.

use crate::error::{Error, Result};

pub const BOOT_SECTOR_LEN: usize = 512;
pub const DIRENT_SIZE: u64 = 32;
pub const ROOT_ENTRIES_FIXED: usize = 224;

/// Raw fields decoded from the boot sector, in on-disk order.
#[derive(Debug, Clone, Copy)]
pub struct BootSector {
    pub oem_name: [u8; 8],
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: u16,
    pub fats: u8,
    pub root_entries: u16,
    pub total_sectors16: u16,
    pub sectors_per_fat: u16,
    pub total_sectors32: u32,
    pub label: [u8; 11],
}

impl BootSector {
    /// Parse the 512-byte boot sector. Validation is lenient: neither the
    /// `0xAA55` signature nor the geometry is rejected, matching the
    /// reference tools, which never check either. Callers only need
    /// `bytes_per_sector` and the sector count to be sane for the derived
    /// offsets to make sense.
    pub fn parse(sector: &[u8; BOOT_SECTOR_LEN]) -> Self {
        let mut oem_name = [0u8; 8];
        oem_name.copy_from_slice(&sector[3..11]);

        let bytes_per_sector = u16::from_le_bytes([sector[11], sector[12]]);
        let sectors_per_cluster = sector[13];
        let reserved_sectors = u16::from_le_bytes([sector[14], sector[15]]);
        let fats = sector[16];
        let root_entries = u16::from_le_bytes([sector[17], sector[18]]);
        let total_sectors16 = u16::from_le_bytes([sector[19], sector[20]]);
        let sectors_per_fat = u16::from_le_bytes([sector[22], sector[23]]);
        let total_sectors32 = u32::from_le_bytes([sector[32], sector[33], sector[34], sector[35]]);

        let mut label = [0u8; 11];
        label.copy_from_slice(&sector[43..54]);

        Self {
            oem_name,
            bytes_per_sector,
            sectors_per_cluster,
            reserved_sectors,
            fats,
            root_entries,
            total_sectors16,
            sectors_per_fat,
            total_sectors32,
            label,
        }
    }

    pub fn total_sectors(&self) -> u32 {
        if self.total_sectors16 != 0 {
            self.total_sectors16 as u32
        } else {
            self.total_sectors32
        }
    }
}

/// Immutable geometry derived once at volume open and consulted by every
/// other component. Bundling these constants, rather than recomputing them
/// from a shared `BootSector` scattered through the call graph, is the
/// single volume context [`crate::volume::Volume`] carries through every
/// operation.
#[derive(Debug, Clone, Copy)]
pub struct Geometry {
    pub bytes_per_sector: u32,
    pub sectors_per_cluster: u32,
    pub reserved_sectors: u32,
    pub fats: u32,
    pub root_entries: u32,
    pub total_sectors: u32,
    pub sectors_per_fat: u32,
    pub oem_name: [u8; 8],
    pub boot_label: [u8; 11],
}

impl Geometry {
    pub fn from_boot_sector(boot: &BootSector) -> Result<Self> {
        if boot.bytes_per_sector == 0 {
            return Err(Error::Inconsistent("bytes per sector is zero"));
        }
        Ok(Self {
            bytes_per_sector: boot.bytes_per_sector as u32,
            sectors_per_cluster: boot.sectors_per_cluster as u32,
            reserved_sectors: boot.reserved_sectors as u32,
            fats: boot.fats as u32,
            root_entries: boot.root_entries as u32,
            total_sectors: boot.total_sectors(),
            sectors_per_fat: boot.sectors_per_fat as u32,
            oem_name: boot.oem_name,
            boot_label: boot.label,
        })
    }

    /// Byte offset of the start of FAT #1.
    pub fn fat_region_start(&self) -> u64 {
        (self.reserved_sectors as u64) * (self.bytes_per_sector as u64)
    }

    /// Byte offset of the start of FAT number `index` (0-based).
    pub fn fat_start(&self, index: u32) -> u64 {
        self.fat_region_start()
            + (index as u64) * (self.sectors_per_fat as u64) * (self.bytes_per_sector as u64)
    }

    /// Byte offset of the start of the root directory region.
    pub fn root_dir_start(&self) -> u64 {
        let reserved_plus_fats =
            self.reserved_sectors as u64 + self.fats as u64 * self.sectors_per_fat as u64;
        reserved_plus_fats * self.bytes_per_sector as u64
    }

    /// Length in bytes of the (fixed-size, non-chained) root directory
    /// region.
    pub fn root_dir_len(&self) -> u64 {
        self.root_entries as u64 * DIRENT_SIZE
    }

    /// Byte offset of the start of the data region (cluster 2).
    pub fn data_region_start(&self) -> u64 {
        self.root_dir_start() + self.root_dir_len()
    }

    /// Byte offset of the first byte of data cluster `cluster` (must be
    /// `>= 2`).
    pub fn cluster_offset(&self, cluster: u32) -> u64 {
        debug_assert!(cluster >= 2, "cluster numbers below 2 are reserved");
        self.data_region_start() + (cluster as u64 - 2) * self.bytes_per_sector as u64
    }

    /// Number of entries the FAT must hold, i.e. one past the highest valid
    /// cluster number.
    pub fn fat_entry_count(&self) -> u32 {
        self.total_sectors + 2 - 33
    }

    pub fn total_size_bytes(&self) -> u64 {
        self.total_sectors as u64 * self.bytes_per_sector as u64
    }
}
