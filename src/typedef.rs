//! This module contains the types defined by the baseline TIFF
//! specification which are relevant to grayscale image stacks.
//! `SampleType` makes the exception: it is this crate's own
//! classification of the `BitsPerSample` + `SampleFormat` tag pair,
//! and also provides a safe means of reading sample values.

use crate::error::{Result, StackError};
use byteordered::{ByteOrdered, Endian, Endianness};
use std::io::Read;

/// TIFF tags read or written by this crate. Values are the field
/// identifiers from the baseline specification.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum Tag {
    /// Number of columns per slice.
    ImageWidth = 256,
    /// Number of rows per slice.
    ImageLength = 257,
    /// Sample width in bits.
    BitsPerSample = 258,
    /// Compression scheme applied to the strip data.
    Compression = 259,
    /// Color space of the image data.
    PhotometricInterpretation = 262,
    /// File offset of each strip.
    StripOffsets = 273,
    /// Number of components per pixel.
    SamplesPerPixel = 277,
    /// Number of rows in each strip.
    RowsPerStrip = 278,
    /// Number of bytes in each strip, after compression.
    StripByteCounts = 279,
    /// How to interpret each pixel sample.
    SampleFormat = 339,
}

/// The data type of a directory entry's values.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum FieldType {
    /// 8-bit unsigned integer.
    Byte = 1,
    /// 7-bit ASCII code, NUL terminated.
    Ascii = 2,
    /// 16-bit unsigned integer.
    Short = 3,
    /// 32-bit unsigned integer.
    Long = 4,
    /// Two `Long`s, numerator then denominator.
    Rational = 5,
    /// 8-bit signed integer.
    SByte = 6,
    /// Opaque byte.
    Undefined = 7,
    /// 16-bit signed integer.
    SShort = 8,
    /// 32-bit signed integer.
    SLong = 9,
    /// Two `SLong`s, numerator then denominator.
    SRational = 10,
    /// Single precision IEEE float.
    Float = 11,
    /// Double precision IEEE float.
    Double = 12,
}

impl FieldType {
    /// Retrieve the size of a single value of this field type, in bytes.
    pub fn size_of(self) -> usize {
        use FieldType::*;
        match self {
            Byte | Ascii | SByte | Undefined => 1,
            Short | SShort => 2,
            Long | SLong | Float => 4,
            Rational | SRational | Double => 8,
        }
    }
}

/// Compression schemes that may appear in a stack file. Only a subset
/// can be decoded; see [`InMemStackVolume`](crate::InMemStackVolume).
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum Compression {
    /// No compression.
    None = 1,
    /// Lempel-Ziv-Welch. Recognized but not decoded.
    Lzw = 5,
    /// Zlib-wrapped Deflate streams, one per strip.
    Deflate = 8,
    /// Byte-oriented run length encoding.
    PackBits = 32773,
    /// Legacy code for the same scheme as `Deflate`.
    DeflateOld = 32946,
}

/// The `SampleFormat` tag values.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum SampleFormat {
    /// Unsigned integer samples.
    Uint = 1,
    /// Two's complement signed integer samples.
    Int = 2,
    /// IEEE floating point samples.
    Float = 3,
    /// Undefined sample interpretation.
    Void = 4,
}

/// Data type for representing the sample type of a volume in memory.
/// Methods for reading values of that type from a source are also included.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum SampleType {
    /// 8-bit unsigned samples.
    Uint8,
    /// 8-bit signed samples.
    Int8,
    /// 16-bit unsigned samples.
    Uint16,
    /// 16-bit signed samples.
    Int16,
    /// 32-bit unsigned samples.
    Uint32,
    /// 32-bit signed samples.
    Int32,
    /// Single precision float samples.
    Float32,
    /// Double precision float samples.
    Float64,
}

impl SampleType {
    /// Classify a `BitsPerSample` + `SampleFormat` tag pair.
    ///
    /// # Errors
    ///
    /// - `StackError::UnsupportedSampleType` if the combination has no
    /// supported in-memory representation (this includes bilevel and
    /// palette data).
    pub fn from_parts(bits: u32, format: SampleFormat) -> Result<Self> {
        match (bits, format) {
            (8, SampleFormat::Uint) | (8, SampleFormat::Void) => Ok(SampleType::Uint8),
            (8, SampleFormat::Int) => Ok(SampleType::Int8),
            (16, SampleFormat::Uint) | (16, SampleFormat::Void) => Ok(SampleType::Uint16),
            (16, SampleFormat::Int) => Ok(SampleType::Int16),
            (32, SampleFormat::Uint) | (32, SampleFormat::Void) => Ok(SampleType::Uint32),
            (32, SampleFormat::Int) => Ok(SampleType::Int32),
            (32, SampleFormat::Float) => Ok(SampleType::Float32),
            (64, SampleFormat::Float) => Ok(SampleType::Float64),
            (bits, format) => Err(StackError::UnsupportedSampleType(bits, format)),
        }
    }

    /// Retrieve the size of a single sample of this type, in bytes.
    pub fn size_of(self) -> usize {
        use SampleType::*;
        match self {
            Uint8 | Int8 => 1,
            Uint16 | Int16 => 2,
            Uint32 | Int32 | Float32 => 4,
            Float64 => 8,
        }
    }

    /// The `BitsPerSample` value of this sample type.
    pub fn bits(self) -> u32 {
        self.size_of() as u32 * 8
    }

    /// The `SampleFormat` value of this sample type.
    pub fn sample_format(self) -> SampleFormat {
        use SampleType::*;
        match self {
            Uint8 | Uint16 | Uint32 => SampleFormat::Uint,
            Int8 | Int16 | Int32 => SampleFormat::Int,
            Float32 | Float64 => SampleFormat::Float,
        }
    }

    /// Read a single sample value from a source as a double precision float.
    pub fn read_f64<S>(self, source: S, endianness: Endianness) -> Result<f64>
    where
        S: Read,
    {
        let v = match self {
            SampleType::Uint8 => f64::from(ByteOrdered::native(source).read_u8()?),
            SampleType::Int8 => f64::from(ByteOrdered::native(source).read_i8()?),
            SampleType::Uint16 => f64::from(endianness.read_u16(source)?),
            SampleType::Int16 => f64::from(endianness.read_i16(source)?),
            SampleType::Uint32 => f64::from(endianness.read_u32(source)?),
            SampleType::Int32 => f64::from(endianness.read_i32(source)?),
            SampleType::Float32 => f64::from(endianness.read_f32(source)?),
            SampleType::Float64 => endianness.read_f64(source)?,
        };
        Ok(v)
    }

    /// Read a single sample value from a source as a single precision float.
    pub fn read_f32<S>(self, source: S, endianness: Endianness) -> Result<f32>
    where
        S: Read,
    {
        Ok(self.read_f64(source, endianness)? as f32)
    }
}
