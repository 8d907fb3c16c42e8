//! Load a substack of a nuclear stain volume and save a tiled view
//! of a cropped region.
//!
//! The stack file is resolved against the configured data root; see
//! [`Settings`](stacktile::Settings) for how the root is determined.

use stacktile::{read_data, save_tiling, Result, Settings, StackVolume, TilingOptions};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(-2);
    }
}

fn run() -> Result<()> {
    let settings = Settings::from_env()?;
    let path = settings.resolve("Test/Data/ImageAnalysis/cfos-substack.tif");

    // the first 26 slices of the stack
    let data = read_data(&path, 0..26)?;
    let [w, h, d] = data.dim();
    println!("loaded {}x{}x{} substack from {}", w, h, d, path.display());

    // a 70x50 crop of slices 10..16 of the loaded data
    let options = TilingOptions::new(0..70, 0..50, 10..16);
    save_tiling(&data, &options, "cfos-tiling.png")?;
    println!("saved cfos-tiling.png");
    Ok(())
}
