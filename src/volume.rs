//! The open volume: geometry plus FAT table bundled with the backing image,
//! and the whole-tree queries the `info` and `list` front ends need.
//!
//! Grounded on `examples/CelestialMelody-fat32-rs/src/fs.rs`'s
//! `FileSystem`, which plays the same "one struct bundling the parsed
//! BPB, the shared FAT, and the device" role. That version is
//! `Arc<RwLock<..>>` because its block cache is shared across concurrent
//! readers/writers of a mounted filesystem; each of these four
//! command-line tools opens the image once, runs to completion, and
//! exits, so a single owned `Volume` value replaces that shared,
//! reference-counted state.

use crate::bpb::{BootSector, Geometry, BOOT_SECTOR_LEN};
use crate::dir::{live_entries, scan_raw, Location};
use crate::entry::DirEntry;
use crate::error::Result;
use crate::fat::FatTable;
use crate::image::ImageIo;
use log::info;
use std::fs::{File, OpenOptions};
use std::path::Path;

/// An open FAT12 image: its decoded geometry, its in-memory FAT mirror,
/// and the handle used for further reads and writes.
pub struct Volume<I> {
    pub io: I,
    pub geometry: Geometry,
    pub fat: FatTable,
}

impl Volume<File> {
    /// Open an image read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, false)
    }

    /// Open an image for both reading and writing.
    pub fn open_read_write(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, true)
    }

    fn open_with(path: impl AsRef<Path>, writable: bool) -> Result<Self> {
        let path = path.as_ref();
        let mut file = OpenOptions::new()
            .read(true)
            .write(writable)
            .open(path)
            .map_err(|source| crate::error::Error::Open {
                path: path.display().to_string(),
                source,
            })?;
        let geometry = Self::read_geometry(&mut file)?;
        let fat = FatTable::load(&mut file, &geometry)?;
        info!(
            "opened {} ({} sectors, {} entries, {} FAT copies)",
            path.display(),
            geometry.total_sectors,
            fat.entry_count(),
            geometry.fats
        );
        Ok(Self { io: file, geometry, fat })
    }

    fn read_geometry(file: &mut File) -> Result<Geometry> {
        let mut sector = [0u8; BOOT_SECTOR_LEN];
        file.read_at(0, &mut sector)?;
        let boot = BootSector::parse(&sector);
        Ok(Geometry::from_boot_sector(&boot)?)
    }
}

impl<I: ImageIo> Volume<I> {
    /// Count of unallocated bytes in the data region.
    pub fn free_bytes(&self) -> u64 {
        self.fat.free_count() as u64 * self.geometry.bytes_per_sector as u64
    }

    /// Total byte size of the volume.
    pub fn total_bytes(&self) -> u64 {
        self.geometry.total_size_bytes()
    }

    /// The volume label: the raw 8-byte name field of the first root entry
    /// carrying the volume-ID attribute, or `None` if no such entry exists.
    /// `diskinfo.c:main` prints this field space-padded, without appending
    /// an extension or stripping trailing spaces, so this mirrors that
    /// rather than `DirEntry::trimmed_name`.
    pub fn volume_label(&mut self) -> Result<Option<String>> {
        let raw = scan_raw(&mut self.io, &self.fat, &self.geometry, Location::Root)?;
        Ok(raw
            .iter()
            .find(|(_, entry)| entry.is_volume_label())
            .map(|(_, entry)| entry.raw_name()))
    }

    /// Recursively count every live file (not directory) anywhere in the
    /// tree rooted at the root directory.
    pub fn total_live_file_count(&mut self) -> Result<u64> {
        let mut count = 0;
        self.walk_tree(Location::Root, &mut |entry| {
            if !entry.is_directory() {
                count += 1;
            }
        })?;
        Ok(count)
    }

    /// Depth-first walk of the whole tree, invoking `visit` on every live
    /// entry (files and directories alike) in on-disk order, recursing
    /// into each subdirectory as it is encountered. Used by both
    /// `total_live_file_count` and the `list` front end.
    pub fn walk_tree(
        &mut self,
        location: Location,
        visit: &mut impl FnMut(&DirEntry),
    ) -> Result<()> {
        let raw = scan_raw(&mut self.io, &self.fat, &self.geometry, location)?;
        for (_, entry) in live_entries(&raw) {
            visit(&entry);
            if entry.is_directory() {
                self.walk_tree(Location::Cluster(entry.start_cluster as u32), visit)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn write_entry(image: &mut MemImage, offset: u64, name: &str, cluster: u16, size: u32, attrs: u8) {
        let (name_bytes, ext) = split_host_name(name);
        let mut entry = DirEntry::new_file(name_bytes, ext, size, cluster, 0, 0);
        entry.attributes = attrs;
        image.write_at(offset, &entry.to_bytes()).unwrap();
    }

    #[test]
    fn reports_free_and_total_bytes() {
        let geometry = geometry();
        let mut image = MemImage(vec![0u8; geometry.total_size_bytes() as usize]);
        let fat = FatTable::load(&mut image, &geometry).unwrap();
        let volume = Volume { io: image, geometry, fat };
        assert_eq!(volume.total_bytes(), 1_474_560);
        assert_eq!(volume.free_bytes(), volume.fat.free_count() as u64 * 512);
    }

    #[test]
    fn finds_volume_label_in_root() {
        let geometry = geometry();
        let mut image = MemImage(vec![0u8; geometry.total_size_bytes() as usize]);
        let fat = FatTable::load(&mut image, &geometry).unwrap();
        write_entry(&mut image, geometry.root_dir_start(), "MYDISK", 0, 0, crate::entry::ATTR_VOLUME_ID);
        let mut volume = Volume { io: image, geometry, fat };
        assert_eq!(volume.volume_label().unwrap(), Some("MYDISK  ".to_string()));
    }

    #[test]
    fn counts_live_files_across_subdirectories() {
        let geometry = geometry();
        let mut image = MemImage(vec![0u8; geometry.total_size_bytes() as usize]);
        let mut fat = FatTable::load(&mut image, &geometry).unwrap();
        fat.write(5, crate::fat::END_OF_CHAIN);
        fat.flush_entry(&mut image, 5).unwrap();

        write_entry(&mut image, geometry.root_dir_start(), "A.TXT", 2, 10, 0);
        write_entry(&mut image, geometry.root_dir_start() + 32, "SUB", 5, 0, crate::entry::ATTR_DIRECTORY);
        write_entry(&mut image, geometry.cluster_offset(5), "B.BIN", 2, 600, 0);

        let mut volume = Volume { io: image, geometry, fat };
        assert_eq!(volume.total_live_file_count().unwrap(), 2);
    }

    /// Builds a synthetic 1.44 MB `MSWIN4.1` image and drives `put`, `get`,
    /// `list`, and `info`'s underlying operations against it end to end,
    /// without touching the host filesystem.
    #[test]
    fn put_get_list_info_round_trip_on_a_synthetic_floppy() {
        use crate::file::{extract, insert, Destination};
        use chrono::{Local, TimeZone};

        let mut sector = [0u8; BOOT_SECTOR_LEN];
        sector[3..11].copy_from_slice(b"MSWIN4.1");
        sector[11..13].copy_from_slice(&512u16.to_le_bytes());
        sector[13] = 1;
        sector[14..16].copy_from_slice(&1u16.to_le_bytes());
        sector[16] = 2;
        sector[17..19].copy_from_slice(&224u16.to_le_bytes());
        sector[19..21].copy_from_slice(&2880u16.to_le_bytes());
        sector[22..24].copy_from_slice(&9u16.to_le_bytes());
        let geometry = Geometry::from_boot_sector(&BootSector::parse(&sector)).unwrap();

        let mut image = MemImage(vec![0u8; geometry.total_size_bytes() as usize]);
        let fat = FatTable::load(&mut image, &geometry).unwrap();
        let mut volume = Volume { io: image, geometry, fat };

        write_entry(&mut volume.io, volume.geometry.root_dir_start(), "MYDISK", 0, 0, crate::entry::ATTR_VOLUME_ID);
        assert_eq!(volume.volume_label().unwrap(), Some("MYDISK  ".to_string()));
        assert_eq!(volume.total_live_file_count().unwrap(), 0);

        let data = b"hello floppy".to_vec();
        let mtime = Local.with_ymd_and_hms(2024, 6, 15, 9, 5, 0).unwrap();
        insert(&mut volume.io, &mut volume.fat, &volume.geometry, Destination::Root, "HELLO.TXT", &data, mtime).unwrap();

        assert_eq!(volume.total_live_file_count().unwrap(), 1);

        let raw = scan_raw(&mut volume.io, &volume.fat, &volume.geometry, Location::Root).unwrap();
        let (_, entry) = live_entries(&raw).find(|(_, e)| e.trimmed_name() == "HELLO.TXT").unwrap();
        let bytes = extract(&mut volume.io, &volume.fat, &volume.geometry, &entry).unwrap();
        assert_eq!(bytes, data);

        let expected_free = volume.fat.free_count() as u64 * volume.geometry.bytes_per_sector as u64;
        assert_eq!(volume.free_bytes(), expected_free);
        assert_eq!(volume.total_bytes(), 1_474_560);
    }
}
