//! This module defines the data element API, which enables volume
//! API implementations to read, write and convert sample values.
use crate::error::{Result, StackError};
use crate::typedef::SampleType;
use bytemuck::Pod;
use byteordered::{ByteOrdered, Endian, Endianness};
use num_traits::cast::AsPrimitive;
use std::io::{Read, Write};
use std::mem::size_of;

/// Trait type for characterizing a stack data element, implemented for
/// primitive numeric types which are used by the crate to represent
/// sample values.
pub trait DataElement:
    'static + Sized + Copy + Pod + AsPrimitive<f32> + AsPrimitive<f64>
{
    /// The sample type mapped to the type `Self`.
    const SAMPLE_TYPE: SampleType;

    /// Convert from a double precision value, with the truncating
    /// semantics of an `as` cast.
    fn from_f64(value: f64) -> Self;

    /// The value with its byte order reversed. The identity for
    /// single-byte types.
    fn swapped(self) -> Self;

    /// Read a single element from the given byte source.
    fn from_raw<R>(src: R, endianness: Endianness) -> Result<Self>
    where
        R: Read;

    /// Write a single element to the given byte sink.
    fn write<W>(self, dst: W, endianness: Endianness) -> Result<()>
    where
        W: Write;

    /// Transform the given data vector into a vector of data elements.
    fn from_raw_vec(vec: Vec<u8>, endianness: Endianness) -> Result<Vec<Self>> {
        if vec.len() % size_of::<Self>() != 0 {
            return Err(StackError::InvalidFormat);
        }
        let mut values: Vec<Self> = bytemuck::pod_collect_to_vec(&vec);
        if endianness != Endianness::native() {
            for v in values.iter_mut() {
                *v = v.swapped();
            }
        }
        Ok(values)
    }
}

impl DataElement for u8 {
    const SAMPLE_TYPE: SampleType = SampleType::Uint8;
    fn from_f64(value: f64) -> Self {
        value as u8
    }
    fn swapped(self) -> Self {
        self
    }
    fn from_raw<R>(src: R, _: Endianness) -> Result<Self>
    where
        R: Read,
    {
        ByteOrdered::native(src).read_u8().map_err(From::from)
    }
    fn write<W>(self, dst: W, _: Endianness) -> Result<()>
    where
        W: Write,
    {
        ByteOrdered::native(dst).write_u8(self).map_err(From::from)
    }
}
impl DataElement for i8 {
    const SAMPLE_TYPE: SampleType = SampleType::Int8;
    fn from_f64(value: f64) -> Self {
        value as i8
    }
    fn swapped(self) -> Self {
        self
    }
    fn from_raw<R>(src: R, _: Endianness) -> Result<Self>
    where
        R: Read,
    {
        ByteOrdered::native(src).read_i8().map_err(From::from)
    }
    fn write<W>(self, dst: W, _: Endianness) -> Result<()>
    where
        W: Write,
    {
        ByteOrdered::native(dst).write_i8(self).map_err(From::from)
    }
}
impl DataElement for u16 {
    const SAMPLE_TYPE: SampleType = SampleType::Uint16;
    fn from_f64(value: f64) -> Self {
        value as u16
    }
    fn swapped(self) -> Self {
        self.swap_bytes()
    }
    fn from_raw<R>(src: R, e: Endianness) -> Result<Self>
    where
        R: Read,
    {
        e.read_u16(src).map_err(From::from)
    }
    fn write<W>(self, dst: W, e: Endianness) -> Result<()>
    where
        W: Write,
    {
        e.write_u16(dst, self).map_err(From::from)
    }
}
impl DataElement for i16 {
    const SAMPLE_TYPE: SampleType = SampleType::Int16;
    fn from_f64(value: f64) -> Self {
        value as i16
    }
    fn swapped(self) -> Self {
        self.swap_bytes()
    }
    fn from_raw<R>(src: R, e: Endianness) -> Result<Self>
    where
        R: Read,
    {
        e.read_i16(src).map_err(From::from)
    }
    fn write<W>(self, dst: W, e: Endianness) -> Result<()>
    where
        W: Write,
    {
        e.write_i16(dst, self).map_err(From::from)
    }
}
impl DataElement for u32 {
    const SAMPLE_TYPE: SampleType = SampleType::Uint32;
    fn from_f64(value: f64) -> Self {
        value as u32
    }
    fn swapped(self) -> Self {
        self.swap_bytes()
    }
    fn from_raw<R>(src: R, e: Endianness) -> Result<Self>
    where
        R: Read,
    {
        e.read_u32(src).map_err(From::from)
    }
    fn write<W>(self, dst: W, e: Endianness) -> Result<()>
    where
        W: Write,
    {
        e.write_u32(dst, self).map_err(From::from)
    }
}
impl DataElement for i32 {
    const SAMPLE_TYPE: SampleType = SampleType::Int32;
    fn from_f64(value: f64) -> Self {
        value as i32
    }
    fn swapped(self) -> Self {
        self.swap_bytes()
    }
    fn from_raw<R>(src: R, e: Endianness) -> Result<Self>
    where
        R: Read,
    {
        e.read_i32(src).map_err(From::from)
    }
    fn write<W>(self, dst: W, e: Endianness) -> Result<()>
    where
        W: Write,
    {
        e.write_i32(dst, self).map_err(From::from)
    }
}
impl DataElement for f32 {
    const SAMPLE_TYPE: SampleType = SampleType::Float32;
    fn from_f64(value: f64) -> Self {
        value as f32
    }
    fn swapped(self) -> Self {
        f32::from_bits(self.to_bits().swap_bytes())
    }
    fn from_raw<R>(src: R, e: Endianness) -> Result<Self>
    where
        R: Read,
    {
        e.read_f32(src).map_err(From::from)
    }
    fn write<W>(self, dst: W, e: Endianness) -> Result<()>
    where
        W: Write,
    {
        e.write_f32(dst, self).map_err(From::from)
    }
}
impl DataElement for f64 {
    const SAMPLE_TYPE: SampleType = SampleType::Float64;
    fn from_f64(value: f64) -> Self {
        value
    }
    fn swapped(self) -> Self {
        f64::from_bits(self.to_bits().swap_bytes())
    }
    fn from_raw<R>(src: R, e: Endianness) -> Result<Self>
    where
        R: Read,
    {
        e.read_f64(src).map_err(From::from)
    }
    fn write<W>(self, dst: W, e: Endianness) -> Result<()>
    where
        W: Write,
    {
        e.write_f64(dst, self).map_err(From::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u16_from_raw_vec() {
        let bytes = vec![0x01, 0x02, 0x03, 0x04];
        let le = u16::from_raw_vec(bytes.clone(), Endianness::Little).unwrap();
        assert_eq!(le, vec![0x0201, 0x0403]);
        let be = u16::from_raw_vec(bytes, Endianness::Big).unwrap();
        assert_eq!(be, vec![0x0102, 0x0304]);
    }

    #[test]
    fn f32_from_raw_vec() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1.5f32.to_le_bytes());
        bytes.extend_from_slice(&(-8.25f32).to_le_bytes());
        let values = f32::from_raw_vec(bytes, Endianness::Little).unwrap();
        assert_eq!(values, vec![1.5, -8.25]);
    }

    #[test]
    fn reject_ragged_buffer() {
        assert!(u16::from_raw_vec(vec![0x01, 0x02, 0x03], Endianness::Little).is_err());
    }

    #[test]
    fn write_then_read() {
        let mut buf = Vec::new();
        4660u16.write(&mut buf, Endianness::Big).unwrap();
        assert_eq!(buf, vec![0x12, 0x34]);
        let v = u16::from_raw(&buf[..], Endianness::Big).unwrap();
        assert_eq!(v, 4660);
    }
}
