//! Rust library for reading and visualizing grayscale image stacks.
//!
//! A stack is a 3-D volume stored as a multi-page TIFF file, one
//! grayscale slice per page, as produced by light-sheet and confocal
//! microscopes. This crate parses the directory structure of such
//! files, loads a z-range of slices into memory without touching the
//! rest, exposes the data as an [`ndarray`] volume, and renders tiled
//! montage views of it.
//!
//! # Example
//!
//! ```no_run
//! use stacktile::{read_data, save_tiling, Settings, TilingOptions};
//! # use stacktile::Result;
//!
//! # fn run() -> Result<()> {
//! let settings = Settings::from_env()?;
//! let path = settings.resolve("Test/Data/ImageAnalysis/cfos-substack.tif");
//!
//! // load slices 0..26, then render a crop of slices 10..16
//! let volume = read_data(path, 0..26)?;
//! let options = TilingOptions::new(0..70, 0..50, 10..16);
//! save_tiling(&volume, &options, "cfos-tiling.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! [`ndarray`]: https://docs.rs/ndarray

#![deny(missing_debug_implementations)]
#![warn(
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]

#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate quick_error;

pub mod error;
pub mod header;
mod ifd;
pub mod render;
pub mod settings;
pub mod typedef;
mod util;
pub mod volume;
pub mod writer;

pub use crate::error::{Result, StackError};
pub use crate::header::StackHeader;
pub use crate::render::{plot_tiling, save_tiling, TilingOptions};
pub use crate::settings::Settings;
pub use crate::typedef::{Compression, SampleType};
pub use crate::volume::element::DataElement;
pub use crate::volume::{InMemStackVolume, IntoNdArray, StackVolume};
pub use crate::writer::write_stack;

use std::ops::Range;
use std::path::Path;

/// Read the given z-range of slices from a stack file into memory.
/// `z_range` is half-open and indexes slices of the file; the slices
/// of the returned volume are renumbered from zero.
///
/// # Errors
///
/// - `StackError::SliceRange` if the range is not contained in the
/// stored stack.
pub fn read_data<P>(path: P, z_range: Range<u32>) -> Result<InMemStackVolume>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let header = StackHeader::from_file(path)?;
    InMemStackVolume::from_file(path, &header, z_range)
}

/// Read a whole stack file into memory.
pub fn read_full<P>(path: P) -> Result<InMemStackVolume>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let header = StackHeader::from_file(path)?;
    let depth = header.depth();
    InMemStackVolume::from_file(path, &header, 0..depth)
}
