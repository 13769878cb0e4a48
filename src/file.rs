//! File data I/O: extracting a file's bytes off the cluster chain, and
//! writing a new file's bytes onto freshly allocated clusters.
//!
//! Grounded on `examples/original_source/diskget.c:get_file` (extraction)
//! and `diskput.c:put_in_data_area`/`get_free_sector` (insertion). Both
//! originals recurse one sector per call; this module walks the same
//! shape with a loop instead, for the same reason the FAT chain walk in
//! `fat::Chain` is an iterator rather than recursion.

use crate::bpb::Geometry;
use crate::datetime::pack_timestamp;
use crate::entry::{split_host_name, DirEntry};
use crate::error::{Error, Result};
use crate::fat::FatTable;
use crate::image::ImageIo;
use crate::resolve;
use chrono::{DateTime, Local};

/// Read every byte of the file described by `entry` off its cluster chain.
///
/// The final cluster's final sector is emitted in full even when `size` is
/// an exact multiple of the sector size; the original tool instead wrote a
/// zero-length tail in that case; treating it as a bug rather than
/// preserving it.
pub fn extract(io: &mut impl ImageIo, fat: &FatTable, geometry: &Geometry, entry: &DirEntry) -> Result<Vec<u8>> {
    let size = entry.size as usize;
    let mut out = Vec::with_capacity(size);
    if size == 0 {
        return Ok(out);
    }

    let sector_size = geometry.bytes_per_sector as usize;
    let mut remaining = size;
    for cluster in fat.chain(entry.start_cluster as u32) {
        let chunk_len = remaining.min(sector_size);
        let mut buf = vec![0u8; sector_size];
        io.read_at(geometry.cluster_offset(cluster), &mut buf)?;
        out.extend_from_slice(&buf[..chunk_len]);
        remaining -= chunk_len;
        if remaining == 0 {
            break;
        }
    }

    if remaining != 0 {
        return Err(Error::Inconsistent("cluster chain ended before all file data was read"));
    }
    Ok(out)
}

/// Where a new file's directory entry should be written.
pub enum Destination<'a> {
    Root,
    Named(&'a str),
}

/// Insert `data` as a new file named `file_name` (already upper-cased by
/// the caller), writing its directory entry to `destination` and its bytes
/// across freshly allocated clusters.
pub fn insert(
    io: &mut impl ImageIo,
    fat: &mut FatTable,
    geometry: &Geometry,
    destination: Destination<'_>,
    file_name: &str,
    data: &[u8],
    mtime: DateTime<Local>,
) -> Result<()> {
    let sector_size = geometry.bytes_per_sector as usize;
    let clusters_needed = data.len().div_ceil(sector_size).max(1);
    if (clusters_needed as u32) > fat.free_count() {
        return Err(Error::NoSpace);
    }

    let slot_offset = match destination {
        Destination::Root => resolve::find_free_slot_in_root_checked(io, fat, geometry, file_name)?,
        Destination::Named(dir_name) => {
            resolve::find_free_slot_in_subtree(io, fat, geometry, dir_name, file_name)?
        }
    };

    let first_cluster = resolve::allocate_cluster(fat)?;
    write_chain(io, fat, geometry, first_cluster, data)?;

    let (name, extension) = split_host_name(file_name);
    let (packed_date, packed_time) = pack_timestamp(mtime);
    let entry = DirEntry::new_file(name, extension, data.len() as u32, first_cluster as u16, packed_date, packed_time);
    io.write_at(slot_offset, &entry.to_bytes())?;
    Ok(())
}

fn write_chain(
    io: &mut impl ImageIo,
    fat: &mut FatTable,
    geometry: &Geometry,
    first_cluster: u32,
    data: &[u8],
) -> Result<()> {
    let sector_size = geometry.bytes_per_sector as usize;
    let mut cluster = first_cluster;
    let mut offset = 0;

    loop {
        let end = (offset + sector_size).min(data.len());
        let mut sector = vec![0u8; sector_size];
        sector[..end - offset].copy_from_slice(&data[offset..end]);
        io.write_at(geometry.cluster_offset(cluster), &sector)?;
        offset = end;

        if offset >= data.len() {
            fat.terminate(io, cluster)?;
            break;
        }

        // Reserve `cluster` before searching for the next one, so the scan
        // in `allocate_cluster` doesn't hand back the same index twice.
        fat.terminate(io, cluster)?;
        let next = resolve::allocate_cluster(fat)?;
        fat.write(cluster, next as u16);
        fat.flush_entry(io, cluster)?;
        cluster = next;
    }
    Ok(())
}
