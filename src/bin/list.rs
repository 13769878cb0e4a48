//! `list <image>` — prints the directory tree rooted at ROOT.

use clap::Parser;
use fat12_tools::dir::{live_entries, scan_raw, Location};
use fat12_tools::entry::DirEntry;
use fat12_tools::{datetime, Result, Volume};

#[derive(Parser)]
#[command(about = "List the directory tree of a FAT12 disk image")]
struct Args {
    /// Path to the disk image.
    image: String,
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
    let mut volume = Volume::open(&args.image)?;
    println!("ROOT");
    println!("==================");
    print_tree(&mut volume, Location::Root, 0)
}

fn print_tree(volume: &mut Volume<std::fs::File>, location: Location, depth: usize) -> Result<()> {
    let indent = "   ".repeat(depth);
    let raw = scan_raw(&mut volume.io, &volume.fat, &volume.geometry, location)?;

    for (_, entry) in live_entries(&raw) {
        print_row(&indent, &entry);
        if entry.is_directory() {
            let header_indent = "   ".repeat(depth + 1);
            println!("{header_indent}{}", entry.raw_name());
            println!("{header_indent}==================");
            print_tree(volume, Location::Cluster(entry.start_cluster as u32), depth + 1)?;
        }
    }
    Ok(())
}

fn print_row(indent: &str, entry: &DirEntry) {
    let kind = if entry.is_directory() { 'D' } else { 'F' };
    // A directory's row carries its raw, space-padded name, matching the
    // header line below it; a file's row carries the trimmed 8.3 name.
    let name = if entry.is_directory() { entry.raw_name() } else { entry.trimmed_name() };
    let date = datetime::format_date(entry.create_date);
    let time = datetime::format_time(entry.create_time);
    println!("{indent}{kind} {:>10} {name} {date} {time}", entry.size);
}
