//! The directory scanner: a finite sequence of on-disk directory slots,
//! read either from the linear root-directory region or by following a
//! subdirectory's cluster chain.
//!
//! Grounded on `examples/original_source/disklist.c:list_dir_entries` and
//! `diskinfo.c:count_files_in_dir`, which both walk the identical
//! root-vs-chain shape and apply the identical slot filters.
//! `examples/CelestialMelody-fat32-rs/src/dir.rs`'s directory iteration is
//! FAT32-chain-only (no linear root region exists on FAT32), so only its
//! emit-and-filter shape carries over here, not its traversal code.

use crate::bpb::Geometry;
use crate::entry::{DirEntry, ENTRY_SIZE};
use crate::fat::FatTable;
use crate::image::ImageIo;
use std::io;

/// Which directory a scan reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// The fixed-size root directory region.
    Root,
    /// A subdirectory, addressed by its starting cluster.
    Cluster(u32),
}

/// Read every 32-byte slot of `location`, in on-disk order, stopping at (and
/// including) the first never-used (`0x00`) slot if one is encountered.
/// This is the raw, unfiltered view the path resolver needs to find free
/// slots; [`live_entries`] is built on top of it.
pub fn scan_raw(
    io: &mut impl ImageIo,
    fat: &FatTable,
    geometry: &Geometry,
    location: Location,
) -> io::Result<Vec<(u64, DirEntry)>> {
    let mut out = Vec::new();
    let mut buf = [0u8; ENTRY_SIZE];

    let regions: Vec<(u64, u64)> = match location {
        Location::Root => vec![(geometry.root_dir_start(), geometry.root_dir_len())],
        Location::Cluster(start) => fat
            .chain(start)
            .map(|cluster| (geometry.cluster_offset(cluster), geometry.bytes_per_sector as u64))
            .collect(),
    };

    'regions: for (region_start, region_len) in regions {
        let mut offset = region_start;
        let end = region_start + region_len;
        while offset < end {
            io.read_at(offset, &mut buf)?;
            let entry = DirEntry::parse(&buf);
            let terminal = entry.is_free_terminal();
            out.push((offset, entry));
            if terminal {
                break 'regions;
            }
            offset += ENTRY_SIZE as u64;
        }
    }

    Ok(out)
}

/// Filter a raw scan down to live entries: not free, not deleted, not a
/// `.`/`..` entry, not a long-file-name slot, and not carrying a
/// starting-cluster value below 2 — mirrored from every reference
/// program's defensive `entry.cluster < 2` check applied while walking.
pub fn live_entries(raw: &[(u64, DirEntry)]) -> impl Iterator<Item = (u64, DirEntry)> + '_ {
    raw.iter().copied().filter(|(_, entry)| {
        !entry.is_free_terminal()
            && !entry.is_deleted()
            && !entry.is_dot_entry()
            && !entry.is_long_name()
            && entry.start_cluster >= 2
    })
}

/// Convenience: scan and filter in one call.
pub fn scan_live(
    io: &mut impl ImageIo,
    fat: &FatTable,
    geometry: &Geometry,
    location: Location,
) -> io::Result<Vec<(u64, DirEntry)>> {
    let raw = scan_raw(io, fat, geometry, location)?;
    Ok(live_entries(&raw).collect())
}
