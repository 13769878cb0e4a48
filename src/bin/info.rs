//! `info <image>` — prints a one-page summary of a FAT12 volume.

use clap::Parser;
use fat12_tools::Volume;

#[derive(Parser)]
#[command(about = "Summarize a FAT12 disk image")]
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

fn run(args: &Args) -> fat12_tools::Result<()> {
    let mut volume = Volume::open(&args.image)?;

    let oem_name = String::from_utf8_lossy(&volume.geometry.oem_name);
    let label = volume.volume_label()?.unwrap_or_default();
    let total_bytes = volume.total_bytes();
    let free_bytes = volume.free_bytes();
    let live_files = volume.total_live_file_count()?;

    println!("OS name: {oem_name}");
    println!("Volume label: {label}");
    println!("Total size: {total_bytes} bytes");
    println!("Free size: {free_bytes} bytes");
    println!("Total file count: {live_files}");
    println!("Number of FATs: {}", volume.geometry.fats);
    println!("Sectors per FAT: {}", volume.geometry.sectors_per_fat);
    Ok(())
}
