//! Low-level parsing of TIFF image file directories (IFDs).
//!
//! Each slice of a stack is described by one IFD: a counted sequence
//! of 12-byte entries followed by the file offset of the next IFD in
//! the chain (0 terminates the chain). Entries whose payload does not
//! fit in the 4 inline bytes store a file offset to the payload
//! instead, so decoding values may seek.

use crate::error::{Result, StackError};
use crate::typedef::{FieldType, Tag};
use byteordered::{ByteOrdered, Endian, Endianness};
use num_traits::FromPrimitive;
use std::io::{Read, Seek, SeekFrom};

/// A single directory entry, with its value payload left raw (in file
/// byte order) until it is queried.
#[derive(Debug, Clone, PartialEq)]
pub struct IfdEntry {
    /// The field identifier. Kept as a raw integer so that entries
    /// this crate does not care about are carried along untouched.
    pub tag: u16,
    /// The raw field type code.
    pub field_type: u16,
    /// Number of values in the entry.
    pub count: u32,
    value: [u8; 4],
}

impl IfdEntry {
    fn from_reader<R>(reader: &mut R, endianness: Endianness) -> Result<Self>
    where
        R: Read,
    {
        let tag = endianness.read_u16(&mut *reader)?;
        let field_type = endianness.read_u16(&mut *reader)?;
        let count = endianness.read_u32(&mut *reader)?;
        let mut value = [0u8; 4];
        reader.read_exact(&mut value)?;
        Ok(IfdEntry {
            tag,
            field_type,
            count,
            value,
        })
    }

    /// Get the field type as a validated enum.
    pub fn field_type(&self) -> Result<FieldType> {
        FieldType::from_u16(self.field_type)
            .ok_or(StackError::InvalidCode("field type", u32::from(self.field_type)))
    }

    /// Decode the entry's values as unsigned integers, seeking to the
    /// out-of-line payload if it does not fit in the inline bytes.
    ///
    /// # Errors
    ///
    /// - `StackError::InvalidCode` if the field type is unknown or not
    /// an unsigned integer kind.
    pub fn values<R>(&self, reader: &mut R, endianness: Endianness) -> Result<Vec<u64>>
    where
        R: Read + Seek,
    {
        let field_type = self.field_type()?;
        match field_type {
            FieldType::Byte | FieldType::Short | FieldType::Long => {}
            _ => {
                return Err(StackError::InvalidCode(
                    "integer field type",
                    u32::from(self.field_type),
                ));
            }
        }

        let total = field_type.size_of() * self.count as usize;
        let mut buf = vec![0u8; total];
        if total <= 4 {
            buf.copy_from_slice(&self.value[..total]);
        } else {
            let offset = endianness.read_u32(&self.value[..])?;
            let _ = reader.seek(SeekFrom::Start(u64::from(offset)))?;
            reader.read_exact(&mut buf)?;
        }

        let mut cursor: &[u8] = &buf;
        (0..self.count)
            .map(|_| {
                let v = match field_type {
                    FieldType::Byte => u64::from(ByteOrdered::native(&mut cursor).read_u8()?),
                    FieldType::Short => u64::from(endianness.read_u16(&mut cursor)?),
                    _ => u64::from(endianness.read_u32(&mut cursor)?),
                };
                Ok(v)
            })
            .collect()
    }

    /// Decode the entry's first value as a `u32`.
    pub fn value_u32<R>(&self, reader: &mut R, endianness: Endianness) -> Result<u32>
    where
        R: Read + Seek,
    {
        self.values(reader, endianness)?
            .first()
            .map(|v| *v as u32)
            .ok_or(StackError::InvalidFormat)
    }
}

/// A parsed image file directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Ifd {
    entries: Vec<IfdEntry>,
    next: u32,
}

impl Ifd {
    /// Parse the IFD at the given file offset. The reader may be left
    /// anywhere; it is positioned before reading.
    pub fn from_reader<R>(reader: &mut R, offset: u32, endianness: Endianness) -> Result<Self>
    where
        R: Read + Seek,
    {
        let _ = reader.seek(SeekFrom::Start(u64::from(offset)))?;
        let num_entries = endianness.read_u16(&mut *reader)?;
        if num_entries == 0 {
            return Err(StackError::InvalidFormat);
        }
        let entries = (0..num_entries)
            .map(|_| IfdEntry::from_reader(reader, endianness))
            .collect::<Result<Vec<_>>>()?;
        let next = endianness.read_u32(&mut *reader)?;
        Ok(Ifd { entries, next })
    }

    /// The offset of the next IFD in the chain, if any.
    pub fn next_ifd(&self) -> Option<u32> {
        if self.next == 0 {
            None
        } else {
            Some(self.next)
        }
    }

    /// Retrieve the entry with the given tag, if present.
    pub fn get(&self, tag: Tag) -> Option<&IfdEntry> {
        self.entries.iter().find(|e| e.tag == tag as u16)
    }

    /// Retrieve the entry with the given tag, or fail with
    /// `StackError::MissingTag`.
    pub fn require(&self, tag: Tag) -> Result<&IfdEntry> {
        self.get(tag).ok_or(StackError::MissingTag(tag))
    }

    /// All entries of this directory, in file order.
    pub fn entries(&self) -> &[IfdEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    // a single little-endian IFD at offset 0 with two Short entries
    fn sample_ifd_bytes() -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&2u16.to_le_bytes());
        // ImageWidth = 64
        buf.extend_from_slice(&256u16.to_le_bytes());
        buf.extend_from_slice(&3u16.to_le_bytes());
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&64u16.to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes());
        // ImageLength = 32
        buf.extend_from_slice(&257u16.to_le_bytes());
        buf.extend_from_slice(&3u16.to_le_bytes());
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&32u16.to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes());
        // end of chain
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf
    }

    #[test]
    fn parse_inline_entries() {
        let bytes = sample_ifd_bytes();
        let mut reader = Cursor::new(bytes);
        let ifd = Ifd::from_reader(&mut reader, 0, Endianness::Little).unwrap();
        assert_eq!(ifd.entries().len(), 2);
        assert_eq!(ifd.next_ifd(), None);

        let width = ifd.require(Tag::ImageWidth).unwrap();
        assert_eq!(width.field_type().unwrap(), FieldType::Short);
        assert_eq!(width.value_u32(&mut reader, Endianness::Little).unwrap(), 64);

        let length = ifd.require(Tag::ImageLength).unwrap();
        assert_eq!(
            length.value_u32(&mut reader, Endianness::Little).unwrap(),
            32
        );

        assert!(ifd.get(Tag::StripOffsets).is_none());
        assert!(matches!(
            ifd.require(Tag::StripOffsets),
            Err(StackError::MissingTag(Tag::StripOffsets))
        ));
    }

    #[test]
    fn out_of_line_values() {
        // one entry: StripOffsets, 3 Longs stored at offset 18
        let mut buf = Vec::new();
        buf.extend_from_slice(&1u16.to_le_bytes());
        buf.extend_from_slice(&273u16.to_le_bytes());
        buf.extend_from_slice(&4u16.to_le_bytes());
        buf.extend_from_slice(&3u32.to_le_bytes());
        buf.extend_from_slice(&18u32.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        for v in &[100u32, 200, 300] {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        let mut reader = Cursor::new(buf);
        let ifd = Ifd::from_reader(&mut reader, 0, Endianness::Little).unwrap();
        let offsets = ifd
            .require(Tag::StripOffsets)
            .unwrap()
            .values(&mut reader, Endianness::Little)
            .unwrap();
        assert_eq!(offsets, vec![100, 200, 300]);
    }
}
