//! This module defines the voxel volume API, as well as data
//! types for reading substacks from files. Volumes use the axis
//! convention (x, y, z): x columns, y rows, z slices.

pub mod element;
pub mod inmem;
pub mod ndarray;

pub use self::inmem::InMemStackVolume;
pub use self::ndarray::IntoNdArray;

use crate::error::{Result, StackError};
use crate::typedef::SampleType;

/// Public API for volume data, exposed as a multi-dimensional
/// sample array.
pub trait StackVolume {
    /// Get the dimensions of the volume, in (x, y, z) order.
    fn dim(&self) -> [u32; 3];

    /// Get this volume's sample type.
    fn sample_type(&self) -> SampleType;

    /// Fetch a single sample value at the given (x, y, z) coordinates
    /// as a double precision floating point value.
    /// Note that using this function continuously to traverse the
    /// volume is inefficient. Prefer the `ndarray` API for volume
    /// traversal.
    ///
    /// # Errors
    ///
    /// - `StackError::OutOfBounds` if the given coordinates surpass
    /// this volume's boundaries.
    fn get_f64(&self, coords: [u32; 3]) -> Result<f64>;

    /// Fetch a single sample value at the given (x, y, z) coordinates
    /// as a single precision floating point value.
    ///
    /// # Errors
    ///
    /// - `StackError::OutOfBounds` if the given coordinates surpass
    /// this volume's boundaries.
    fn get_f32(&self, coords: [u32; 3]) -> Result<f32> {
        Ok(self.get_f64(coords)? as f32)
    }
}

impl<'a, V: StackVolume> StackVolume for &'a V {
    fn dim(&self) -> [u32; 3] {
        (**self).dim()
    }

    fn sample_type(&self) -> SampleType {
        (**self).sample_type()
    }

    fn get_f64(&self, coords: [u32; 3]) -> Result<f64> {
        (**self).get_f64(coords)
    }

    fn get_f32(&self, coords: [u32; 3]) -> Result<f32> {
        (**self).get_f32(coords)
    }
}

/// Convert (x, y, z) coordinates to a linear sample index, in
/// x-fastest (Fortran) order.
pub(crate) fn coords_to_index(coords: [u32; 3], dim: [u32; 3]) -> Result<usize> {
    if coords.iter().zip(dim.iter()).any(|(c, d)| *c >= *d) {
        return Err(StackError::OutOfBounds(coords));
    }
    let [x, y, z] = coords;
    let [w, h, _] = dim;
    Ok(x as usize + w as usize * (y as usize + h as usize * z as usize))
}

#[cfg(test)]
mod tests {
    use super::coords_to_index;

    #[test]
    fn test_coords_to_index() {
        assert_eq!(coords_to_index([0, 0, 0], [16, 16, 3]).unwrap(), 0);
        assert_eq!(coords_to_index([1, 0, 0], [16, 16, 3]).unwrap(), 1);
        assert_eq!(coords_to_index([0, 1, 0], [16, 16, 3]).unwrap(), 16);
        assert_eq!(coords_to_index([0, 0, 1], [16, 16, 3]).unwrap(), 256);
        assert_eq!(coords_to_index([1, 1, 1], [16, 16, 3]).unwrap(), 273);
        assert_eq!(
            coords_to_index([15, 15, 2], [16, 16, 3]).unwrap(),
            16 * 16 * 3 - 1
        );

        assert!(coords_to_index([16, 15, 2], [16, 16, 3]).is_err());
        assert!(coords_to_index([0, 0, 3], [16, 16, 3]).is_err());
    }
}
