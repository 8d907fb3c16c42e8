//! Module holding an in-memory implementation of a stack volume.

use super::element::DataElement;
use super::{coords_to_index, StackVolume};
use crate::error::{Result, StackError};
use crate::header::StackHeader;
use crate::typedef::{Compression, SampleType};
use crate::util::unpackbits_into;
use byteordered::Endianness;
use flate2::bufread::ZlibDecoder;
use log::debug;
use ndarray::{ArrayBase, Data, Ix3};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::mem::size_of;
use std::ops::Range;
use std::path::Path;

/// A data type for a volume, or a z-range substack of one, contained
/// in memory. Objects of this type hold raw sample data in x-fastest
/// order, which is converted automatically when using reading methods
/// or converting the volume into an `ndarray`.
#[derive(Debug, PartialEq, Clone)]
pub struct InMemStackVolume {
    dim: [u32; 3],
    sample_type: SampleType,
    endianness: Endianness,
    raw_data: Vec<u8>,
}

impl InMemStackVolume {
    /// Read the given z-range of slices from a stack of data. The
    /// header of the stack must have been parsed in advance. Only the
    /// requested slices are decoded.
    ///
    /// # Errors
    ///
    /// - `StackError::SliceRange` if the range is not contained in the
    /// stored stack.
    pub fn from_reader<R>(
        mut source: R,
        header: &StackHeader,
        z_range: Range<u32>,
    ) -> Result<Self>
    where
        R: Read + Seek,
    {
        let depth = header.depth();
        if z_range.start > z_range.end || z_range.end > depth {
            return Err(StackError::SliceRange(z_range.start, z_range.end, depth));
        }

        let nslices = (z_range.end - z_range.start) as usize;
        let slice_nbytes = header.slice_nbytes();
        debug!(
            "reading slices {}..{} of {} ({} bytes)",
            z_range.start,
            z_range.end,
            depth,
            nslices * slice_nbytes,
        );

        let mut raw_data = Vec::with_capacity(nslices * slice_nbytes);
        for z in z_range.clone() {
            let dir = &header.slices[z as usize];
            let before = raw_data.len();
            for (offset, nbytes) in dir.strip_offsets.iter().zip(&dir.strip_byte_counts) {
                read_strip(
                    &mut source,
                    *offset,
                    *nbytes as usize,
                    header.compression,
                    &mut raw_data,
                )?;
            }
            if raw_data.len() - before != slice_nbytes {
                return Err(StackError::InvalidFormat);
            }
        }

        Ok(InMemStackVolume {
            dim: [header.width, header.height, nslices as u32],
            sample_type: header.sample_type,
            endianness: header.endianness,
            raw_data,
        })
    }

    /// Read the given z-range of slices from a stack file. The header
    /// of the stack must have been parsed in advance.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        header: &StackHeader,
        z_range: Range<u32>,
    ) -> Result<Self> {
        let source = BufReader::new(File::open(path)?);
        InMemStackVolume::from_reader(source, header, z_range)
    }

    /// Build a volume from an array with axes in (x, y, z) order.
    pub fn from_ndarray<A, S>(data: &ArrayBase<S, Ix3>) -> Result<Self>
    where
        S: Data<Elem = A>,
        A: DataElement,
    {
        let (w, h, d) = data.dim();
        let endianness = Endianness::native();
        let mut raw_data = Vec::with_capacity(w * h * d * size_of::<A>());
        for z in 0..d {
            for y in 0..h {
                for x in 0..w {
                    data[[x, y, z]].write(&mut raw_data, endianness)?;
                }
            }
        }
        Ok(InMemStackVolume {
            dim: [w as u32, h as u32, d as u32],
            sample_type: A::SAMPLE_TYPE,
            endianness,
            raw_data,
        })
    }

    /// The byte order of the raw sample data.
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Retrieve the raw data, consuming the volume.
    pub fn to_raw_data(self) -> Vec<u8> {
        self.raw_data
    }

    /// Retrieve a reference to the raw data.
    pub fn get_raw_data(&self) -> &[u8] {
        &self.raw_data
    }
}

impl StackVolume for InMemStackVolume {
    fn dim(&self) -> [u32; 3] {
        self.dim
    }

    fn sample_type(&self) -> SampleType {
        self.sample_type
    }

    fn get_f64(&self, coords: [u32; 3]) -> Result<f64> {
        let index = coords_to_index(coords, self.dim)?;
        let offset = index * self.sample_type.size_of();
        self.sample_type
            .read_f64(&self.raw_data[offset..], self.endianness)
    }
}

/// Read one strip into `out`, decoding it according to the stack's
/// compression scheme.
fn read_strip<R>(
    source: &mut R,
    offset: u64,
    nbytes: usize,
    compression: Compression,
    out: &mut Vec<u8>,
) -> Result<()>
where
    R: Read + Seek,
{
    let _ = source.seek(SeekFrom::Start(offset))?;
    match compression {
        Compression::None => {
            let start = out.len();
            out.resize(start + nbytes, 0);
            source.read_exact(&mut out[start..])?;
        }
        Compression::Deflate | Compression::DeflateOld => {
            let mut compressed = vec![0u8; nbytes];
            source.read_exact(&mut compressed)?;
            let _ = ZlibDecoder::new(&compressed[..]).read_to_end(out)?;
        }
        Compression::PackBits => {
            let mut compressed = vec![0u8; nbytes];
            source.read_exact(&mut compressed)?;
            unpackbits_into(&compressed, out)?;
        }
        other => return Err(StackError::UnsupportedCompression(other)),
    }
    Ok(())
}
