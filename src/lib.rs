//! Core FAT12 volume driver shared by the four command-line utilities.
//!
//! The driver is organized bottom-up: [`image`] is the byte-addressable
//! seam over the host file, [`bpb`] decodes the boot sector into a
//! [`bpb::Geometry`], [`fat`] is the 12-bit-packed allocation table,
//! [`entry`] and [`dir`] read directory slots, [`resolve`] turns a
//! command-line name into a slot or a free one, [`file`] moves bytes
//! between the image and the host, and [`volume`] bundles all of the
//! above into one open handle.

pub mod bpb;
pub mod datetime;
pub mod dir;
pub mod entry;
pub mod error;
pub mod fat;
pub mod file;
pub mod image;
pub mod resolve;
pub mod volume;

pub use error::{Error, Result};
pub use volume::Volume;
