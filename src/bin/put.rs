//! `put <image> [destination] <filename>` — inserts a host file into the
//! root directory, or into a named subdirectory when a destination is
//! given.

use chrono::{DateTime, Local};
use clap::Parser;
use fat12_tools::file::{insert, Destination};
use fat12_tools::{Error, Result, Volume};
use std::path::Path;

#[derive(Parser)]
#[command(about = "Insert a host file into a FAT12 disk image")]
struct Args {
    /// Path to the disk image.
    image: String,
    /// Either `<filename>`, or `<destination> <filename>`.
    #[arg(num_args = 1..=2, required = true)]
    rest: Vec<String>,
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
    let (dest_name, host_name) = match args.rest.as_slice() {
        [filename] => (None, filename.clone()),
        [destination, filename] => (Some(destination.clone()), filename.clone()),
        _ => unreachable!("clap enforces 1..=2 values for `rest`"),
    };

    let host_path = Path::new(&host_name);
    if !host_path.exists() {
        return Err(Error::NotFound);
    }
    let data = std::fs::read(host_path)?;
    let mtime = modified_time(host_path)?;

    let disk_name = host_name.to_uppercase();
    let mut volume = Volume::open_read_write(&args.image)?;

    let destination = match &dest_name {
        Some(name) => Destination::Named(name.as_str()),
        None => Destination::Root,
    };

    insert(&mut volume.io, &mut volume.fat, &volume.geometry, destination, &disk_name, &data, mtime)
}

fn modified_time(path: &Path) -> Result<DateTime<Local>> {
    let metadata = std::fs::metadata(path)?;
    let modified = metadata.modified()?;
    Ok(DateTime::<Local>::from(modified))
}
