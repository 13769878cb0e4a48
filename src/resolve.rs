//! Path resolution and slot/cluster allocation.
//!
//! Grounded directly on `examples/original_source/diskput.c`:
//! `get_free_entry_in_root_dir`, `get_free_sub_dir_entries` and
//! `get_free_sector`, and on `diskget.c:get_file_entry_in_root`. The
//! `CelestialMelody-fat32-rs` `Dir` code this crate is otherwise built
//! from resolves paths through an in-memory `VirtFile` tree rather than
//! re-scanning the disk for every lookup, so it has no real counterpart
//! here; the traversal shape below follows the C originals while the
//! error handling follows this crate's `Error` taxonomy.

use crate::bpb::Geometry;
use crate::dir::{live_entries, scan_raw, Location};
use crate::entry::DirEntry;
use crate::error::{Error, Result};
use crate::fat::FatTable;
use crate::image::ImageIo;

/// Find the live entry in the root directory whose trimmed 8.3 name equals
/// `name` (already uppercased by the caller). Returns its byte offset and
/// decoded entry.
pub fn lookup_in_root(
    io: &mut impl ImageIo,
    fat: &FatTable,
    geometry: &Geometry,
    name: &str,
) -> Result<(u64, DirEntry)> {
    let raw = scan_raw(io, fat, geometry, Location::Root)?;
    live_entries(&raw)
        .find(|(_, entry)| entry.trimmed_name() == name)
        .ok_or(Error::NotFound)
}

/// Find a free slot (first deleted slot, else the terminal unused slot) in
/// the root directory.
pub fn find_free_slot_in_root(
    io: &mut impl ImageIo,
    fat: &FatTable,
    geometry: &Geometry,
) -> Result<u64> {
    let raw = scan_raw(io, fat, geometry, Location::Root)?;
    free_slot_in_raw(&raw).ok_or(Error::RootFull)
}

/// As [`find_free_slot_in_root`], but also fails with [`Error::DuplicateName`]
/// the moment a live file in the root already has `name`.
pub fn find_free_slot_in_root_checked(
    io: &mut impl ImageIo,
    fat: &FatTable,
    geometry: &Geometry,
    name: &str,
) -> Result<u64> {
    let raw = scan_raw(io, fat, geometry, Location::Root)?;
    for (_, entry) in live_entries(&raw) {
        // `diskput.c:get_free_entry_in_root_dir` compares `cur_file_name`
        // against every live entry with no attribute filter, so a
        // directory's name collides here too, unlike the subtree check
        // below.
        if entry.trimmed_name() == name {
            return Err(Error::DuplicateName);
        }
    }
    free_slot_in_raw(&raw).ok_or(Error::RootFull)
}

fn free_slot_in_raw(raw: &[(u64, DirEntry)]) -> Option<u64> {
    raw.iter()
        .find(|(_, entry)| entry.is_deleted() || entry.is_free_terminal())
        .map(|(offset, _)| *offset)
}

/// Recursively scan from the root through subdirectories, looking for a
/// directory literally named `target_dir_name`. Directory names are
/// compared by their trimmed form, the same comparison
/// `find_free_slot_in_root_checked` and `lookup_in_root` use for file
/// names — `diskput.c:get_free_sub_dir_entries` instead `strcmp`s against
/// the raw, non-null-terminated `filename` field it recurses with, which
/// reads past the field into whatever follows in the struct; that isn't a
/// wire format worth preserving, so the match here is by trimmed name.
/// While inside the target directory, remember the last free slot seen;
/// elsewhere, fail on a same-named regular file.
///
/// Returns [`Error::DuplicateName`] as soon as a colliding file is found
/// anywhere in the tree, and [`Error::NoDirectoryFound`] if the named
/// subdirectory is never encountered.
pub fn find_free_slot_in_subtree(
    io: &mut impl ImageIo,
    fat: &FatTable,
    geometry: &Geometry,
    target_dir_name: &str,
    file_name: &str,
) -> Result<u64> {
    let mut candidate = None;
    search_subtree(io, fat, geometry, Location::Root, target_dir_name, file_name, &mut candidate)?;
    candidate.ok_or(Error::NoDirectoryFound)
}

fn search_subtree(
    io: &mut impl ImageIo,
    fat: &FatTable,
    geometry: &Geometry,
    location: Location,
    target_dir_name: &str,
    file_name: &str,
    candidate: &mut Option<u64>,
) -> Result<()> {
    let raw = scan_raw(io, fat, geometry, location)?;
    // `Location::Root`'s implicit name is "ROOT", matching
    // `diskput.c:main`'s initial call with `cur_dir_name = "ROOT"`.
    let here_is_target = match location {
        Location::Root => target_dir_name.eq_ignore_ascii_case("ROOT"),
        Location::Cluster(_) => false, // resolved by the caller via the entry's own name
    };
    if here_is_target {
        if let Some(offset) = free_slot_in_raw(&raw) {
            *candidate = Some(offset);
        }
    }

    for (_, entry) in live_entries(&raw) {
        if entry.is_directory() {
            let is_target = entry.trimmed_name() == target_dir_name;
            if is_target {
                if let Some(offset) = free_slot_in_subdir(io, fat, geometry, entry.start_cluster as u32)? {
                    *candidate = Some(offset);
                }
            }
            search_subtree(
                io,
                fat,
                geometry,
                Location::Cluster(entry.start_cluster as u32),
                target_dir_name,
                file_name,
                candidate,
            )?;
        } else if entry.trimmed_name() == file_name {
            return Err(Error::DuplicateName);
        }
    }
    Ok(())
}

fn free_slot_in_subdir(
    io: &mut impl ImageIo,
    fat: &FatTable,
    geometry: &Geometry,
    start_cluster: u32,
) -> Result<Option<u64>> {
    let raw = scan_raw(io, fat, geometry, Location::Cluster(start_cluster))?;
    Ok(free_slot_in_raw(&raw))
}

/// Find the first free data cluster: a linear scan from cluster index 2.
pub fn allocate_cluster(fat: &FatTable) -> Result<u32> {
    fat.allocate_cluster().ok_or(Error::NoSpace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bpb::{BootSector, BOOT_SECTOR_LEN};
    use crate::entry::split_host_name;
    use crate::image::MemImage;

    fn geometry() -> Geometry {
        let mut sector = [0u8; BOOT_SECTOR_LEN];
        sector[11..13].copy_from_slice(&512u16.to_le_bytes());
        sector[13] = 1;
        sector[14..16].copy_from_slice(&1u16.to_le_bytes());
        sector[16] = 2;
        sector[17..19].copy_from_slice(&224u16.to_le_bytes());
        sector[19..21].copy_from_slice(&2880u16.to_le_bytes());
        sector[22..24].copy_from_slice(&9u16.to_le_bytes());
        Geometry::from_boot_sector(&BootSector::parse(&sector)).unwrap()
    }

    fn write_entry(image: &mut MemImage, offset: u64, name: &str, cluster: u16, size: u32, dir: bool) {
        let (name_bytes, ext) = split_host_name(name);
        let mut entry = DirEntry::new_file(name_bytes, ext, size, cluster, 0, 0);
        if dir {
            entry.attributes = crate::entry::ATTR_DIRECTORY;
        }
        image.write_at(offset, &entry.to_bytes()).unwrap();
    }

    #[test]
    fn lookup_in_root_finds_and_rejects_missing() {
        let geometry = geometry();
        let mut image = MemImage(vec![0u8; geometry.total_size_bytes() as usize]);
        let fat = FatTable::load(&mut image, &geometry).unwrap();
        write_entry(&mut image, geometry.root_dir_start(), "A.TXT", 2, 10, false);

        let (_, entry) = lookup_in_root(&mut image, &fat, &geometry, "A.TXT").unwrap();
        assert_eq!(entry.size, 10);

        let err = lookup_in_root(&mut image, &fat, &geometry, "MISSING.TXT").unwrap_err();
        assert!(matches!(err, Error::NotFound));
    }

    #[test]
    fn free_slot_in_root_prefers_deleted_over_terminal() {
        let geometry = geometry();
        let mut image = MemImage(vec![0u8; geometry.total_size_bytes() as usize]);
        let fat = FatTable::load(&mut image, &geometry).unwrap();
        write_entry(&mut image, geometry.root_dir_start(), "A.TXT", 2, 10, false);
        image
            .write_at(geometry.root_dir_start() + 32, &[0xE5])
            .unwrap();

        let offset = find_free_slot_in_root(&mut image, &fat, &geometry).unwrap();
        assert_eq!(offset, geometry.root_dir_start() + 32);
    }

    #[test]
    fn duplicate_name_in_root_is_rejected() {
        let geometry = geometry();
        let mut image = MemImage(vec![0u8; geometry.total_size_bytes() as usize]);
        let fat = FatTable::load(&mut image, &geometry).unwrap();
        write_entry(&mut image, geometry.root_dir_start(), "A.TXT", 2, 10, false);

        let err = find_free_slot_in_root_checked(&mut image, &fat, &geometry, "A.TXT").unwrap_err();
        assert!(matches!(err, Error::DuplicateName));
    }

    #[test]
    fn find_free_slot_in_subtree_locates_named_directory() {
        let geometry = geometry();
        let mut image = MemImage(vec![0u8; geometry.total_size_bytes() as usize]);
        let mut fat = FatTable::load(&mut image, &geometry).unwrap();
        fat.write(5, crate::fat::END_OF_CHAIN);
        fat.flush_entry(&mut image, 5).unwrap();

        write_entry(&mut image, geometry.root_dir_start(), "SUB", 5, 0, true);
        // subdirectory cluster 5 left empty: first slot is the free terminal

        let offset =
            find_free_slot_in_subtree(&mut image, &fat, &geometry, "SUB", "C.DAT").unwrap();
        assert_eq!(offset, geometry.cluster_offset(5));
    }

    #[test]
    fn allocate_cluster_reports_no_space_when_full() {
        let geometry = geometry();
        let mut image = MemImage(vec![0u8; geometry.total_size_bytes() as usize]);
        let mut fat = FatTable::load(&mut image, &geometry).unwrap();
        for i in 2..fat.entry_count() {
            fat.write(i, 0xFFF);
        }
        assert!(matches!(allocate_cluster(&fat), Err(Error::NoSpace)));
    }
}
