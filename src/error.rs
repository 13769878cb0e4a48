//! Error taxonomy for the FAT12 volume driver and its four command-line
//! front ends.
//!
//! Usage errors (wrong argument count or shape) are handled by `clap`
//! itself and never reach this enum; everything below is a domain error
//! one of the four binaries prints and exits on.

use thiserror::Error;

/// Everything that can go wrong while reading or mutating a FAT12 image.
#[derive(Debug, Error)]
pub enum Error {
    /// The image or a host-side file could not be opened.
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A named file was not found where the operation looked for it
    /// (root directory for `get`, anywhere in the tree for name checks).
    #[error("File not found.")]
    NotFound,

    /// `get` refuses to overwrite a host file that already exists.
    #[error("There is a file of the same name in the local directory.")]
    LocalExists,

    /// `put` refuses to create a second disk entry with the same 8.3 name.
    #[error("There is a file of the same name in the disk.")]
    DuplicateName,

    /// No free 32-byte slot was found in the root directory.
    #[error("The directory not found.")]
    RootFull,

    /// The destination subdirectory named on the command line does not
    /// exist anywhere in the tree.
    #[error("The directory not found.")]
    NoDirectoryFound,

    /// The free-cluster count times the sector size is smaller than the
    /// host file being inserted.
    #[error("No enough free space in the disk image.")]
    NoSpace,

    /// The volume geometry or FAT state is internally inconsistent in a
    /// way that none of the above named conditions describe.
    #[error("disk image is inconsistent: {0}")]
    Inconsistent(&'static str),

    /// Any other I/O failure against the image or a host file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
