//! Error types for stack reading, writing and rendering.

use crate::typedef::{Compression, SampleFormat, Tag};
use image::ImageError;
use std::io::Error as IoError;

quick_error! {
    /// Error type for all operations in this crate.
    #[derive(Debug)]
    pub enum StackError {
        /// Read an invalid or corrupted TIFF stack
        InvalidFormat {
            display("Invalid TIFF stack file")
        }
        /// An unknown code was read from a field with a
        /// closed set of accepted values.
        InvalidCode(name: &'static str, code: u32) {
            display("Invalid or unrecognized {} code: {}", name, code)
        }
        /// A tag required by the baseline TIFF specification is absent.
        MissingTag(tag: Tag) {
            display("Missing required TIFF tag {:?}", tag)
        }
        /// A slice directory disagrees with the first slice of the stack
        /// on width, height, sample type or compression.
        InconsistentSlices(index: usize) {
            display("Slice directory #{} is inconsistent with the rest of the stack", index)
        }
        /// The combination of bits per sample and sample format has no
        /// supported in-memory representation.
        UnsupportedSampleType(bits: u32, format: SampleFormat) {
            display("Unsupported sample type: {} bits per sample, format {:?}", bits, format)
        }
        /// The compression scheme is recognized but cannot be decoded.
        UnsupportedCompression(compression: Compression) {
            display("Unsupported compression scheme {:?}", compression)
        }
        /// The stack is not grayscale.
        UnsupportedColorType(code: u32) {
            display("Unsupported photometric interpretation {} (only grayscale stacks are supported)", code)
        }
        /// Attempted to read a voxel outside the volume boundaries.
        OutOfBounds(coords: [u32; 3]) {
            display("Out of bounds access to volume at {:?}", coords)
        }
        /// Attempted to load a z-range not contained in the stored stack.
        SliceRange(start: u32, end: u32, depth: u32) {
            display("Slice range {}..{} out of bounds for a stack of depth {}", start, end, depth)
        }
        /// A tiling range is empty or exceeds the volume's extent
        /// along its axis.
        TileRange(axis: &'static str, start: u32, end: u32, extent: u32) {
            display("Invalid {} tiling range {}..{} (volume extent is {})", axis, start, end, extent)
        }
        /// The volume does not fit in a classic (32-bit offset) TIFF file.
        TooLarge {
            display("Stack too large for a classic TIFF file")
        }
        /// No root directory is configured for path resolution.
        NoRootPath {
            display("No stack root directory configured (set {})", crate::settings::ROOT_ENV_VAR)
        }
        /// Failed to encode or save a rendered tiling.
        Render(err: ImageError) {
            from()
            source(err)
            display("Rendering error: {}", err)
        }
        /// I/O Error
        Io(err: IoError) {
            from()
            source(err)
            display("{}", err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, StackError>;
