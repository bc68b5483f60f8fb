//! Multi-band TIFF decoding.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};
use ndarray::{s, Array3};
use tiff::decoder::{Decoder, DecodingResult};

use super::grid::BandStack;

/// Read a multi-band TIFF into a `BandStack`.
///
/// Sample values are widened to `f64` regardless of the stored type. The
/// orthophoto products consumed here interleave four samples per pixel in
/// R, G, B, NIR order; fewer than four is an error, extra bands beyond the
/// fourth are dropped.
pub fn read_tiff(path: &Path) -> Result<BandStack> {
    let file = File::open(path)
        .with_context(|| format!("[raster::read] Failed to open {}", path.display()))?;
    let mut decoder = Decoder::new(BufReader::new(file))
        .with_context(|| format!("[raster::read] {} is not a TIFF", path.display()))?;

    let (width, height) = decoder
        .dimensions()
        .context("[raster::read] Failed to read raster dimensions")?;
    let (width, height) = (width as usize, height as usize);

    let samples: Vec<f64> = match decoder
        .read_image()
        .context("[raster::read] Failed to decode raster data")?
    {
        DecodingResult::U8(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U16(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I8(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I16(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::F32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::F64(buf) => buf,
        _ => bail!("[raster::read] Unsupported sample format in {}", path.display()),
    };

    let pixels = width * height;
    if pixels == 0 || samples.len() % pixels != 0 {
        bail!(
            "[raster::read] Sample count {} does not fill a {}x{} grid",
            samples.len(),
            height,
            width
        );
    }
    let bands = samples.len() / pixels;
    if bands < 4 {
        bail!(
            "[raster::read] {} has {} band(s), need 4 (R, G, B, NIR)",
            path.display(),
            bands
        );
    }

    // Pixel-interleaved to band-sequential.
    let mut data = Array3::zeros((bands, height, width));
    for row in 0..height {
        for column in 0..width {
            let base = (row * width + column) * bands;
            for band in 0..bands {
                data[[band, row, column]] = samples[base + band];
            }
        }
    }
    if bands > 4 {
        data = data.slice(s![0..4, .., ..]).to_owned();
    }

    BandStack::new(data)
}
