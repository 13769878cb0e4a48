//! Positioned, byte-granular access to the backing image.
//!
//! The volume driver never assumes a streaming position between calls: every
//! read and write names its absolute byte offset. This mirrors the block
//! device seam `examples/CelestialMelody-fat32-rs/src/device.rs` draws
//! between the FAT driver and physical storage, generalized from
//! block-granular to byte-granular since the host image is an ordinary
//! file, not a device with a fixed sector size.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// A backing store the volume driver can read and write at arbitrary byte
/// offsets.
///
/// Implementers need not preserve a cursor between calls; `read_at`/
/// `write_at` always seek first. Host-side file I/O (opening the image,
/// choosing read-only vs. read-write mode) is the caller's responsibility
/// and sits outside the core driver.
pub trait ImageIo {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()>;
    fn write_at(&mut self, offset: u64, buf: &[u8]) -> io::Result<()>;
}

impl ImageIo for File {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        self.seek(SeekFrom::Start(offset))?;
        self.read_exact(buf)
    }

    fn write_at(&mut self, offset: u64, buf: &[u8]) -> io::Result<()> {
        self.seek(SeekFrom::Start(offset))?;
        self.write_all(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// An in-memory image used by the core driver's own property tests, so
    /// the FAT codec, directory scanner and path resolver can be exercised
    /// without touching the host filesystem.
    #[derive(Default, Clone)]
    pub struct MemImage(pub Vec<u8>);

    impl ImageIo for MemImage {
        fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
            let offset = offset as usize;
            if offset + buf.len() > self.0.len() {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "read past end"));
            }
            buf.copy_from_slice(&self.0[offset..offset + buf.len()]);
            Ok(())
        }

        fn write_at(&mut self, offset: u64, buf: &[u8]) -> io::Result<()> {
            let offset = offset as usize;
            if offset + buf.len() > self.0.len() {
                self.0.resize(offset + buf.len(), 0);
            }
            self.0[offset..offset + buf.len()].copy_from_slice(buf);
            Ok(())
        }
    }

    #[test]
    fn mem_image_round_trips() {
        let mut image = MemImage(vec![0u8; 1024]);
        image.write_at(100, &[1, 2, 3, 4]).unwrap();
        let mut buf = [0u8; 4];
        image.read_at(100, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
    }
}

#[cfg(test)]
pub(crate) use tests::MemImage;
