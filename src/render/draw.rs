//! Grid-to-image rendering.

use std::path::Path;

use anyhow::{bail, Context, Result};
use image::{Rgb as RgbPixel, RgbImage, Rgba, RgbaImage};
use ndarray::{Array2, ArrayView2};

use super::colormap::{evaluate, ColormapParams, NDVI_SCHEME};

/// Finite min-max range of one channel; degenerate ranges widen to unit span.
fn channel_range(grid: ArrayView2<'_, f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &v in grid.iter() {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        (0.0, 1.0)
    } else if max > min {
        (min, max)
    } else {
        (min, min + 1.0)
    }
}

fn scale(value: f64, min: f64, max: f64) -> u8 {
    if value.is_finite() {
        (((value - min) / (max - min)).clamp(0.0, 1.0) * 255.0) as u8
    } else {
        0
    }
}

/// False-color composite: three grids stacked as the R, G, B channels of
/// one image, each channel min-max normalized independently. The ortho
/// pipeline passes (NIR, Red, Green), rendering vegetation red.
pub fn render_composite(
    r: ArrayView2<'_, f64>,
    g: ArrayView2<'_, f64>,
    b: ArrayView2<'_, f64>,
) -> Result<RgbImage> {
    if r.dim() != g.dim() || r.dim() != b.dim() {
        bail!(
            "[render::draw] Channel shapes differ: {:?} / {:?} / {:?}",
            r.dim(),
            g.dim(),
            b.dim()
        );
    }
    let (rows, cols) = r.dim();
    let (r_min, r_max) = channel_range(r);
    let (g_min, g_max) = channel_range(g);
    let (b_min, b_max) = channel_range(b);

    Ok(RgbImage::from_fn(cols as u32, rows as u32, |x, y| {
        let (row, col) = (y as usize, x as usize);
        RgbPixel([
            scale(r[[row, col]], r_min, r_max),
            scale(g[[row, col]], g_min, g_max),
            scale(b[[row, col]], b_min, b_max),
        ])
    }))
}

/// Color-mapped rendering of an index grid. NaN and infinite cells take
/// the params' nodata color (transparent by default).
pub fn render_index_map(grid: &Array2<f64>, params: &ColormapParams) -> RgbaImage {
    let (rows, cols) = grid.dim();
    RgbaImage::from_fn(cols as u32, rows as u32, |x, y| {
        let value = grid[[y as usize, x as usize]];
        if value.is_finite() {
            let color = evaluate(NDVI_SCHEME, params.normalize(value));
            Rgba([color.r, color.g, color.b, 255])
        } else {
            Rgba(params.nodata_color)
        }
    })
}

/// Encode the composite to `path`; the format follows the file extension.
pub fn save_composite(image: &RgbImage, path: &Path) -> Result<()> {
    image
        .save(path)
        .with_context(|| format!("[render::draw] Failed to write {}", path.display()))
}

/// Encode an index map to `path`; the format follows the file extension.
pub fn save_index_map(image: &RgbaImage, path: &Path) -> Result<()> {
    image
        .save(path)
        .with_context(|| format!("[render::draw] Failed to write {}", path.display()))
}
