//! This module defines the `StackHeader` struct, the structure-level
//! description of a stack file: slice geometry, sample type, byte
//! order, and where each slice's pixel data lives. Parsing a header
//! walks the whole directory chain but reads no pixel data.

use crate::error::{Result, StackError};
use crate::ifd::Ifd;
use crate::typedef::{Compression, SampleFormat, SampleType, Tag};
use byteordered::{Endian, Endianness};
use log::debug;
use num_traits::FromPrimitive;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

/// Magic code for little endian stack files.
pub const MAGIC_CODE_LE: &[u8; 2] = b"II";
/// Magic code for big endian stack files.
pub const MAGIC_CODE_BE: &[u8; 2] = b"MM";
/// The version number following the byte order mark in every
/// classic TIFF file.
pub(crate) const MAGIC_VERSION: u16 = 42;

/// Location of one slice's pixel data within the file, as a list of
/// strips. Uncompressed strips hold `rows * width` samples; compressed
/// strips hold whatever their scheme produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceDir {
    /// File offset of each strip.
    pub strip_offsets: Vec<u64>,
    /// Stored length of each strip, in bytes.
    pub strip_byte_counts: Vec<u64>,
}

/// The stack header data type.
///
/// # Examples
///
/// ```no_run
/// use stacktile::StackHeader;
/// # use stacktile::Result;
///
/// # fn run() -> Result<()> {
/// let header = StackHeader::from_file("cfos-substack.tif")?;
/// println!("{} slices of {}x{}", header.depth(), header.width, header.height);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StackHeader {
    /// Number of columns in every slice.
    pub width: u32,
    /// Number of rows in every slice.
    pub height: u32,
    /// In-memory representation of the stored samples.
    pub sample_type: SampleType,
    /// Compression scheme of the strip data.
    pub compression: Compression,
    /// Byte order of the source file.
    pub endianness: Endianness,
    /// One entry per slice, in z order.
    pub slices: Vec<SliceDir>,
}

/// Per-slice parameters which must agree across the whole stack.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SliceParams {
    width: u32,
    height: u32,
    sample_type: SampleType,
    compression: Compression,
}

impl StackHeader {
    /// Retrieve the stack header from a file in the file system.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<StackHeader> {
        StackHeader::from_reader(BufReader::new(File::open(path)?))
    }

    /// Read a stack header from the given byte source. The source is
    /// expected to be positioned at the start of the file.
    pub fn from_reader<R>(mut source: R) -> Result<StackHeader>
    where
        R: Read + Seek,
    {
        let mut magic = [0u8; 2];
        source.read_exact(&mut magic)?;
        let endianness = match &magic {
            MAGIC_CODE_LE => Endianness::Little,
            MAGIC_CODE_BE => Endianness::Big,
            _ => return Err(StackError::InvalidFormat),
        };
        if endianness.read_u16(&mut source)? != MAGIC_VERSION {
            return Err(StackError::InvalidFormat);
        }

        let mut next = endianness.read_u32(&mut source)?;
        if next == 0 {
            // a stack with no slices at all
            return Err(StackError::InvalidFormat);
        }

        let mut params: Option<SliceParams> = None;
        let mut slices = Vec::new();
        let mut seen = HashSet::new();
        while next != 0 {
            // the directory chain must not revisit an offset
            if !seen.insert(next) {
                return Err(StackError::InvalidFormat);
            }
            let ifd = Ifd::from_reader(&mut source, next, endianness)?;
            let (slice_params, dir) = decode_slice_dir(&ifd, &mut source, endianness)?;
            match params {
                Some(reference) if reference != slice_params => {
                    return Err(StackError::InconsistentSlices(slices.len()));
                }
                None => params = Some(slice_params),
                _ => {}
            }
            slices.push(dir);
            next = ifd.next_ifd().unwrap_or(0);
        }

        // `params` is always set here: the loop ran at least once
        let params = params.ok_or(StackError::InvalidFormat)?;
        debug!(
            "parsed {} slice directories ({}x{}, {:?}, {:?})",
            slices.len(),
            params.width,
            params.height,
            params.sample_type,
            params.compression,
        );

        Ok(StackHeader {
            width: params.width,
            height: params.height,
            sample_type: params.sample_type,
            compression: params.compression,
            endianness,
            slices,
        })
    }

    /// The number of slices in the stack.
    pub fn depth(&self) -> u32 {
        self.slices.len() as u32
    }

    /// The dimensions of the stored volume, in (x, y, z) order.
    pub fn dim(&self) -> [u32; 3] {
        [self.width, self.height, self.depth()]
    }

    /// The number of samples in a single slice.
    pub fn slice_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// The number of bytes of a single decoded slice.
    pub fn slice_nbytes(&self) -> usize {
        self.slice_len() * self.sample_type.size_of()
    }
}

fn decode_slice_dir<R>(
    ifd: &Ifd,
    source: &mut R,
    endianness: Endianness,
) -> Result<(SliceParams, SliceDir)>
where
    R: Read + Seek,
{
    let width = ifd.require(Tag::ImageWidth)?.value_u32(source, endianness)?;
    let height = ifd.require(Tag::ImageLength)?.value_u32(source, endianness)?;

    let samples = match ifd.get(Tag::SamplesPerPixel) {
        Some(entry) => entry.value_u32(source, endianness)?,
        None => 1,
    };
    let photometric = match ifd.get(Tag::PhotometricInterpretation) {
        Some(entry) => entry.value_u32(source, endianness)?,
        None => 1,
    };
    if samples != 1 || photometric > 1 {
        return Err(StackError::UnsupportedColorType(photometric));
    }

    // BitsPerSample defaults to 1 (bilevel), which `from_parts` rejects
    let bits = match ifd.get(Tag::BitsPerSample) {
        Some(entry) => entry.value_u32(source, endianness)?,
        None => 1,
    };
    let format_code = match ifd.get(Tag::SampleFormat) {
        Some(entry) => entry.value_u32(source, endianness)?,
        None => SampleFormat::Uint as u32,
    };
    let format = SampleFormat::from_u32(format_code)
        .ok_or(StackError::InvalidCode("sample format", format_code))?;
    let sample_type = SampleType::from_parts(bits, format)?;

    let compression_code = match ifd.get(Tag::Compression) {
        Some(entry) => entry.value_u32(source, endianness)?,
        None => Compression::None as u32,
    };
    let compression = Compression::from_u32(compression_code)
        .ok_or(StackError::InvalidCode("compression", compression_code))?;

    let strip_offsets = ifd
        .require(Tag::StripOffsets)?
        .values(source, endianness)?;
    let strip_byte_counts = ifd
        .require(Tag::StripByteCounts)?
        .values(source, endianness)?;
    if strip_offsets.is_empty() || strip_offsets.len() != strip_byte_counts.len() {
        return Err(StackError::InvalidFormat);
    }

    Ok((
        SliceParams {
            width,
            height,
            sample_type,
            compression,
        },
        SliceDir {
            strip_offsets,
            strip_byte_counts,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reject_bad_magic() {
        let err = StackHeader::from_reader(Cursor::new(b"PK\x03\x04\0\0\0\0".to_vec()))
            .unwrap_err();
        assert!(matches!(err, StackError::InvalidFormat));
    }

    #[test]
    fn reject_bad_version() {
        // "II" followed by version 43 (BigTIFF)
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"II");
        bytes.extend_from_slice(&43u16.to_le_bytes());
        bytes.extend_from_slice(&16u32.to_le_bytes());
        let err = StackHeader::from_reader(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, StackError::InvalidFormat));
    }

    fn long_entry(bytes: &mut Vec<u8>, tag: u16, value: u32) {
        bytes.extend_from_slice(&tag.to_le_bytes());
        bytes.extend_from_slice(&4u16.to_le_bytes());
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&value.to_le_bytes());
    }

    #[test]
    fn reject_cyclic_chain() {
        // one well-formed directory whose next offset points back at
        // itself
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"II");
        bytes.extend_from_slice(&42u16.to_le_bytes());
        bytes.extend_from_slice(&8u32.to_le_bytes());
        bytes.extend_from_slice(&5u16.to_le_bytes());
        long_entry(&mut bytes, 256, 2);
        long_entry(&mut bytes, 257, 2);
        long_entry(&mut bytes, 258, 8);
        long_entry(&mut bytes, 273, 0);
        long_entry(&mut bytes, 279, 4);
        bytes.extend_from_slice(&8u32.to_le_bytes());

        let err = StackHeader::from_reader(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, StackError::InvalidFormat));
    }

    #[test]
    fn reject_empty_chain() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"II");
        bytes.extend_from_slice(&42u16.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        let err = StackHeader::from_reader(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, StackError::InvalidFormat));
    }
}
