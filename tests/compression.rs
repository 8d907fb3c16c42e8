//! Decoding tests for compressed strips, over hand-assembled
//! single-slice stacks.

use flate2::write::ZlibEncoder;
use pretty_assertions::assert_eq;
use stacktile::{Compression, InMemStackVolume, StackError, StackHeader, StackVolume};
use std::io::{Cursor, Write};

/// Assemble a little-endian stack with one 8-bit grayscale slice whose
/// single strip holds `strip` verbatim, right after the file header.
fn single_slice_stack(width: u32, height: u32, compression: u16, strip: &[u8]) -> Vec<u8> {
    fn long_entry(buf: &mut Vec<u8>, tag: u16, value: u32) {
        buf.extend_from_slice(&tag.to_le_bytes());
        buf.extend_from_slice(&4u16.to_le_bytes());
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&value.to_le_bytes());
    }
    fn short_entry(buf: &mut Vec<u8>, tag: u16, value: u16) {
        buf.extend_from_slice(&tag.to_le_bytes());
        buf.extend_from_slice(&3u16.to_le_bytes());
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&value.to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes());
    }

    let mut buf = Vec::new();
    buf.extend_from_slice(b"II");
    buf.extend_from_slice(&42u16.to_le_bytes());
    buf.extend_from_slice(&(8 + strip.len() as u32).to_le_bytes());
    buf.extend_from_slice(strip);

    buf.extend_from_slice(&10u16.to_le_bytes());
    long_entry(&mut buf, 256, width);
    long_entry(&mut buf, 257, height);
    short_entry(&mut buf, 258, 8);
    short_entry(&mut buf, 259, compression);
    short_entry(&mut buf, 262, 1);
    long_entry(&mut buf, 273, 8);
    short_entry(&mut buf, 277, 1);
    long_entry(&mut buf, 278, height);
    long_entry(&mut buf, 279, strip.len() as u32);
    short_entry(&mut buf, 339, 1);
    buf.extend_from_slice(&0u32.to_le_bytes());
    buf
}

fn decode(bytes: Vec<u8>) -> stacktile::Result<InMemStackVolume> {
    let header = StackHeader::from_reader(Cursor::new(bytes.clone()))?;
    InMemStackVolume::from_reader(Cursor::new(bytes), &header, 0..1)
}

#[test]
fn deflate_strip_is_decoded() {
    let samples: Vec<u8> = (0..8).collect();
    let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&samples).unwrap();
    let compressed = encoder.finish().unwrap();

    let vol = decode(single_slice_stack(4, 2, 8, &compressed)).unwrap();
    assert_eq!(vol.dim(), [4, 2, 1]);
    for y in 0..2 {
        for x in 0..4 {
            assert_eq!(vol.get_f64([x, y, 0]).unwrap(), f64::from(y * 4 + x));
        }
    }
}

#[test]
fn legacy_deflate_code_is_decoded() {
    let samples = [7u8, 6, 5, 4];
    let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&samples).unwrap();
    let compressed = encoder.finish().unwrap();

    let vol = decode(single_slice_stack(2, 2, 32946, &compressed)).unwrap();
    assert_eq!(vol.get_f64([0, 0, 0]).unwrap(), 7.);
    assert_eq!(vol.get_f64([1, 1, 0]).unwrap(), 4.);
}

#[test]
fn packbits_strip_is_decoded() {
    // repeat run of five 0xAA, then a literal run of 1, 2, 3
    let compressed = [0xFCu8, 0xAA, 0x02, 0x01, 0x02, 0x03];
    let vol = decode(single_slice_stack(4, 2, 32773, &compressed)).unwrap();
    assert_eq!(vol.dim(), [4, 2, 1]);
    assert_eq!(vol.get_f64([0, 0, 0]).unwrap(), 170.);
    assert_eq!(vol.get_f64([0, 1, 0]).unwrap(), 170.);
    assert_eq!(vol.get_f64([1, 1, 0]).unwrap(), 1.);
    assert_eq!(vol.get_f64([3, 1, 0]).unwrap(), 3.);
}

#[test]
fn lzw_is_recognized_but_not_decoded() {
    let err = decode(single_slice_stack(2, 2, 5, &[0u8; 4])).unwrap_err();
    assert!(matches!(
        err,
        StackError::UnsupportedCompression(Compression::Lzw)
    ));
}

#[test]
fn short_decoded_strip_is_a_format_error() {
    // the strip inflates to 4 bytes but the slice needs 8
    let samples = [1u8, 2, 3, 4];
    let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&samples).unwrap();
    let compressed = encoder.finish().unwrap();

    let err = decode(single_slice_stack(4, 2, 8, &compressed)).unwrap_err();
    assert!(matches!(err, StackError::InvalidFormat));
}
