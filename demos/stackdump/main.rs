//! A simple application which dumps the structure of a stack file:
//! dimensions, sample type, byte order, and where each slice's strips
//! live in the file.

use stacktile::{Result, StackHeader};
use std::env;

fn main() {
    env_logger::init();

    let filename = env::args()
        .nth(1)
        .expect("Path to stack file is required");

    if let Err(e) = run(&filename) {
        eprintln!("Error: {}", e);
        std::process::exit(-2);
    }
}

fn run(filename: &str) -> Result<()> {
    let header = StackHeader::from_file(filename)?;

    let [w, h, d] = header.dim();
    println!("{}: {}x{}x{}", filename, w, h, d);
    println!("  sample type: {:?}", header.sample_type);
    println!("  compression: {:?}", header.compression);
    println!("  byte order:  {:?}", header.endianness);
    for (z, slice) in header.slices.iter().enumerate() {
        println!(
            "  slice {:>4}: {} strip(s), {} byte(s) at offset {}",
            z,
            slice.strip_offsets.len(),
            slice.strip_byte_counts.iter().sum::<u64>(),
            slice.strip_offsets[0],
        );
    }
    Ok(())
}
