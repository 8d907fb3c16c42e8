//! Write-then-read tests over real files, exercising the whole path
//! from `ndarray` data to stored stack and back.

use ndarray::Array3;
use pretty_assertions::assert_eq;
use stacktile::{read_data, read_full, write_stack, IntoNdArray, StackError, StackVolume};

fn graded_u16(w: usize, h: usize, d: usize) -> Array3<u16> {
    Array3::from_shape_fn((w, h, d), |(x, y, z)| (x + 10 * y + 100 * z) as u16)
}

#[test]
fn roundtrip_u16() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graded.tif");
    let arr = graded_u16(6, 5, 4);
    write_stack(&path, &arr).unwrap();

    let vol = read_full(&path).unwrap();
    assert_eq!(vol.dim(), [6, 5, 4]);
    let back: Array3<u16> = vol.into_ndarray().unwrap();
    assert_eq!(back, arr);
}

#[test]
fn roundtrip_u8() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graded8.tif");
    let arr = Array3::from_shape_fn((4, 4, 3), |(x, y, z)| (x + 8 * y + 64 * z) as u8);
    write_stack(&path, &arr).unwrap();

    let back: Array3<u8> = read_full(&path).unwrap().into_ndarray().unwrap();
    assert_eq!(back, arr);
}

#[test]
fn roundtrip_f32() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graded32.tif");
    let arr = Array3::from_shape_fn((3, 3, 2), |(x, y, z)| {
        (x as f32) + 0.5 * (y as f32) + 0.25 * (z as f32)
    });
    write_stack(&path, &arr).unwrap();

    let back: Array3<f32> = read_full(&path).unwrap().into_ndarray().unwrap();
    approx::assert_abs_diff_eq!(back, arr);
}

#[test]
fn substack_is_renumbered_from_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graded.tif");
    let arr = graded_u16(6, 5, 4);
    write_stack(&path, &arr).unwrap();

    let vol = read_data(&path, 1..3).unwrap();
    assert_eq!(vol.dim(), [6, 5, 2]);
    // slice k of the substack is slice 1 + k of the file
    for z in 0..2u32 {
        for y in 0..5u32 {
            for x in 0..6u32 {
                let expected = f64::from(arr[[x as usize, y as usize, z as usize + 1]]);
                assert_eq!(vol.get_f64([x, y, z]).unwrap(), expected);
            }
        }
    }
}

#[test]
fn substack_range_out_of_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graded.tif");
    write_stack(&path, &graded_u16(6, 5, 4)).unwrap();

    let err = read_data(&path, 2..9).unwrap_err();
    assert!(matches!(err, StackError::SliceRange(2, 9, 4)));
}

#[test]
fn empty_substack_is_allowed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graded.tif");
    write_stack(&path, &graded_u16(6, 5, 4)).unwrap();

    let vol = read_data(&path, 2..2).unwrap();
    assert_eq!(vol.dim(), [6, 5, 0]);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = read_full("/no/such/file.tif").unwrap_err();
    assert!(matches!(err, StackError::Io(_)));
}
