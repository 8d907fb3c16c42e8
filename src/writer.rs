//! Utility functions to write stack files.

use crate::error::{Result, StackError};
use crate::header::{MAGIC_CODE_LE, MAGIC_VERSION};
use crate::typedef::{Compression, FieldType, Tag};
use crate::volume::element::DataElement;
use byteordered::{Endian, Endianness};
use ndarray::{ArrayBase, Data, Ix3};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::mem::size_of;
use std::path::Path;

/// Tags written for every slice, in ascending tag order as the
/// specification requires.
const NUM_TAGS: u16 = 10;
/// Size of one directory: entry count, entries, next-IFD offset.
const IFD_NBYTES: u64 = 2 + NUM_TAGS as u64 * 12 + 4;

/// Write a volume as a little-endian, uncompressed multi-page TIFF
/// stack, one slice per page with a single strip each.
///
/// The array's axes are interpreted in (x, y, z) order; the sample
/// type on disk is the array's element type.
///
/// # Errors
///
/// - `StackError::TooLarge` if the file would exceed the 32-bit offset
/// space of a classic TIFF file.
pub fn write_stack<P, A, S>(path: P, data: &ArrayBase<S, Ix3>) -> Result<()>
where
    P: AsRef<Path>,
    S: Data<Elem = A>,
    A: DataElement,
{
    let (w, h, d) = data.dim();
    if w == 0 || h == 0 || d == 0 {
        return Err(StackError::InvalidFormat);
    }
    let slice_nbytes = w as u64 * h as u64 * size_of::<A>() as u64;
    let data_end = 8 + d as u64 * slice_nbytes;
    if data_end + d as u64 * IFD_NBYTES > u64::from(u32::MAX) {
        return Err(StackError::TooLarge);
    }

    let e = Endianness::Little;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(MAGIC_CODE_LE)?;
    e.write_u16(&mut writer, MAGIC_VERSION)?;
    // the directory chain is laid out after all the sample data
    e.write_u32(&mut writer, data_end as u32)?;

    // sample data, slice by slice, x-fastest within each slice
    for z in 0..d {
        for y in 0..h {
            for x in 0..w {
                data[[x, y, z]].write(&mut writer, e)?;
            }
        }
    }

    let sample_type = A::SAMPLE_TYPE;
    for z in 0..d {
        let strip_offset = 8 + z as u64 * slice_nbytes;
        let next = if z + 1 == d {
            0
        } else {
            data_end + (z as u64 + 1) * IFD_NBYTES
        };

        e.write_u16(&mut writer, NUM_TAGS)?;
        write_entry(&mut writer, Tag::ImageWidth, FieldType::Long, w as u32)?;
        write_entry(&mut writer, Tag::ImageLength, FieldType::Long, h as u32)?;
        write_entry(
            &mut writer,
            Tag::BitsPerSample,
            FieldType::Short,
            sample_type.bits(),
        )?;
        write_entry(
            &mut writer,
            Tag::Compression,
            FieldType::Short,
            Compression::None as u32,
        )?;
        write_entry(
            &mut writer,
            Tag::PhotometricInterpretation,
            FieldType::Short,
            1,
        )?;
        write_entry(
            &mut writer,
            Tag::StripOffsets,
            FieldType::Long,
            strip_offset as u32,
        )?;
        write_entry(&mut writer, Tag::SamplesPerPixel, FieldType::Short, 1)?;
        write_entry(&mut writer, Tag::RowsPerStrip, FieldType::Long, h as u32)?;
        write_entry(
            &mut writer,
            Tag::StripByteCounts,
            FieldType::Long,
            slice_nbytes as u32,
        )?;
        write_entry(
            &mut writer,
            Tag::SampleFormat,
            FieldType::Short,
            sample_type.sample_format() as u32,
        )?;
        e.write_u32(&mut writer, next as u32)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write one single-valued directory entry. `Short` values occupy the
/// first two inline bytes; everything else is written as a `Long`.
fn write_entry<W>(writer: &mut W, tag: Tag, field_type: FieldType, value: u32) -> Result<()>
where
    W: Write,
{
    let e = Endianness::Little;
    e.write_u16(&mut *writer, tag as u16)?;
    e.write_u16(&mut *writer, field_type as u16)?;
    e.write_u32(&mut *writer, 1)?;
    match field_type {
        FieldType::Short => {
            e.write_u16(&mut *writer, value as u16)?;
            e.write_u16(&mut *writer, 0)?;
        }
        _ => e.write_u32(&mut *writer, value)?,
    }
    Ok(())
}
