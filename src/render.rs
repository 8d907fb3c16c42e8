//! Tiled rendering of volume slices.
//!
//! A tiling plot lays the z-slices of a (cropped) volume out on a
//! grid, one tile per slice, for visual inspection. Sample values are
//! normalized over the whole selected region, so tiles of one montage
//! share a common intensity scale.

use crate::error::{Result, StackError};
use crate::util::grid_shape;
use crate::volume::StackVolume;
use image::{GrayImage, Luma};
use log::debug;
use std::ops::Range;
use std::path::Path;

/// Parameters of a tiling plot: the per-axis crop ranges and the grid
/// layout. Ranges are half-open and index into the volume being
/// rendered; for a substack loaded with a z offset, `z` is relative to
/// the loaded data, not to the file.
#[derive(Debug, Clone, PartialEq)]
pub struct TilingOptions {
    /// Columns of each tile, as a range over the volume's x axis.
    pub x: Range<u32>,
    /// Rows of each tile, as a range over the volume's y axis.
    pub y: Range<u32>,
    /// The slices to render, as a range over the volume's z axis.
    pub z: Range<u32>,
    /// Imposed number of grid columns. When `None`, the grid is
    /// near-square.
    pub columns: Option<u32>,
    /// Gap between adjacent tiles, in pixels.
    pub gap: u32,
}

impl TilingOptions {
    /// Tiling options for the given crop ranges, with the default
    /// grid layout.
    pub fn new(x: Range<u32>, y: Range<u32>, z: Range<u32>) -> TilingOptions {
        TilingOptions {
            x,
            y,
            z,
            columns: None,
            gap: 2,
        }
    }

    /// Impose a number of grid columns.
    pub fn columns(mut self, columns: u32) -> TilingOptions {
        self.columns = Some(columns);
        self
    }

    /// Set the gap between adjacent tiles, in pixels.
    pub fn gap(mut self, gap: u32) -> TilingOptions {
        self.gap = gap;
        self
    }
}

/// Render a tiling plot of the given volume as an 8-bit grayscale
/// image. The region minimum maps to black and the region maximum to
/// white; a constant region renders black.
///
/// # Errors
///
/// - `StackError::TileRange` if a crop range is empty or exceeds the
/// volume's extent along its axis.
pub fn plot_tiling<V>(volume: &V, options: &TilingOptions) -> Result<GrayImage>
where
    V: StackVolume,
{
    let dim = volume.dim();
    validate_range("x", &options.x, dim[0])?;
    validate_range("y", &options.y, dim[1])?;
    validate_range("z", &options.z, dim[2])?;

    let tile_w = options.x.end - options.x.start;
    let tile_h = options.y.end - options.y.start;
    let n = options.z.end - options.z.start;
    let (columns, rows) = grid_shape(n, options.columns);

    // normalization pass over the whole selected region
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for z in options.z.clone() {
        for y in options.y.clone() {
            for x in options.x.clone() {
                let v = volume.get_f64([x, y, z])?;
                if !v.is_nan() {
                    min = min.min(v);
                    max = max.max(v);
                }
            }
        }
    }
    let scale = if max > min { 255. / (max - min) } else { 0. };

    let out_w = columns * tile_w + (columns - 1) * options.gap;
    let out_h = rows * tile_h + (rows - 1) * options.gap;
    let mut image = GrayImage::new(out_w, out_h);
    for (i, z) in options.z.clone().enumerate() {
        let tile_x = (i as u32 % columns) * (tile_w + options.gap);
        let tile_y = (i as u32 / columns) * (tile_h + options.gap);
        for (row, y) in options.y.clone().enumerate() {
            for (col, x) in options.x.clone().enumerate() {
                let v = volume.get_f64([x, y, z])?;
                let p = if v.is_nan() {
                    0
                } else {
                    ((v - min) * scale).round().clamp(0., 255.) as u8
                };
                image.put_pixel(tile_x + col as u32, tile_y + row as u32, Luma([p]));
            }
        }
    }

    debug!(
        "tiled {} slices into a {}x{} grid ({}x{} px)",
        n, columns, rows, out_w, out_h,
    );
    Ok(image)
}

/// Render a tiling plot of the given volume and save it to a file.
/// The image format is inferred from the path's extension.
pub fn save_tiling<V, P>(volume: &V, options: &TilingOptions, path: P) -> Result<()>
where
    V: StackVolume,
    P: AsRef<Path>,
{
    let image = plot_tiling(volume, options)?;
    image.save(path).map_err(From::from)
}

fn validate_range(axis: &'static str, range: &Range<u32>, extent: u32) -> Result<()> {
    if range.start >= range.end || range.end > extent {
        return Err(StackError::TileRange(
            axis,
            range.start,
            range.end,
            extent,
        ));
    }
    Ok(())
}
