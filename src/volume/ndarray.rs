//! Conversion of in-memory volumes into `ndarray` arrays.
//!
//! Arrays keep the (x, y, z) axis convention and the x-fastest memory
//! order of the volume, so conversion never copies more than once.

use super::element::DataElement;
use super::inmem::InMemStackVolume;
use super::StackVolume;
use crate::error::{Result, StackError};
use crate::typedef::SampleType;
use ndarray::{Array, Array3, ShapeBuilder};
use num_traits::cast::AsPrimitive;

/// Trait for volumes which can be converted to an `ndarray`.
pub trait IntoNdArray {
    /// Consume the volume into an array with axes in (x, y, z) order,
    /// casting samples to the element type `T`.
    fn into_ndarray<T>(self) -> Result<Array3<T>>
    where
        T: DataElement;
}

impl IntoNdArray for InMemStackVolume {
    fn into_ndarray<T>(self) -> Result<Array3<T>>
    where
        T: DataElement,
    {
        match self.sample_type() {
            SampleType::Uint8 => convert_and_cast::<u8, T>(self),
            SampleType::Int8 => convert_and_cast::<i8, T>(self),
            SampleType::Uint16 => convert_and_cast::<u16, T>(self),
            SampleType::Int16 => convert_and_cast::<i16, T>(self),
            SampleType::Uint32 => convert_and_cast::<u32, T>(self),
            SampleType::Int32 => convert_and_cast::<i32, T>(self),
            SampleType::Float32 => convert_and_cast::<f32, T>(self),
            SampleType::Float64 => convert_and_cast::<f64, T>(self),
        }
    }
}

impl<'a> IntoNdArray for &'a InMemStackVolume {
    /// Create an array from the given volume, leaving it intact.
    fn into_ndarray<T>(self) -> Result<Array3<T>>
    where
        T: DataElement,
    {
        self.clone().into_ndarray()
    }
}

fn convert_and_cast<I, O>(volume: InMemStackVolume) -> Result<Array3<O>>
where
    I: DataElement,
    O: DataElement,
{
    let [w, h, d] = StackVolume::dim(&volume);
    let endianness = volume.endianness();
    let values: Vec<I> = I::from_raw_vec(volume.to_raw_data(), endianness)?;
    if values.len() != w as usize * h as usize * d as usize {
        return Err(StackError::InvalidFormat);
    }
    let shape = (w as usize, h as usize, d as usize).f();
    let array = Array::from_shape_vec(shape, values).map_err(|_| StackError::InvalidFormat)?;
    Ok(array.mapv(|v| {
        let v: f64 = v.as_();
        O::from_f64(v)
    }))
}
