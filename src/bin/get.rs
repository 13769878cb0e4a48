//! `get <image> <filename>` — extracts a file from the root directory to
//! the current host directory.

use clap::Parser;
use fat12_tools::{file, resolve, Error, Result, Volume};
use std::path::Path;

#[derive(Parser)]
#[command(about = "Extract a file from a FAT12 disk image")]
struct Args {
    /// Path to the disk image.
    image: String,
    /// Name of the file to extract (case-insensitive).
    filename: String,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(&args) {
        println!("{err}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let name = args.filename.to_uppercase();

    if Path::new(&name).exists() {
        return Err(Error::LocalExists);
    }

    let mut volume = Volume::open(&args.image)?;
    let (_, entry) = resolve::lookup_in_root(&mut volume.io, &volume.fat, &volume.geometry, &name)?;
    let bytes = file::extract(&mut volume.io, &volume.fat, &volume.geometry, &entry)?;

    std::fs::write(&name, bytes)?;
    Ok(())
}
