//! Block-average downsampling.

use anyhow::{bail, Result};
use ndarray::{s, Array3};

use super::grid::BandStack;

/// Downsample by averaging `factor` x `factor` blocks per band.
///
/// Output shape is `(bands, rows / factor, cols / factor)` with floor
/// division; remainder rows and columns at the bottom/right edges are
/// discarded. A factor of 1 copies the input.
pub fn block_average(stack: &BandStack, factor: usize) -> Result<BandStack> {
    if factor == 0 {
        bail!("[raster::resample] Downsample factor must be at least 1");
    }
    let (bands, rows, cols) = (stack.bands(), stack.rows(), stack.cols());
    let (out_rows, out_cols) = (rows / factor, cols / factor);
    if out_rows == 0 || out_cols == 0 {
        bail!(
            "[raster::resample] Factor {} exceeds the raster extent {}x{}",
            factor,
            rows,
            cols
        );
    }

    let mut out = Array3::zeros((bands, out_rows, out_cols));
    for band in 0..bands {
        for row in 0..out_rows {
            for column in 0..out_cols {
                let block = stack.data().slice(s![
                    band,
                    row * factor..(row + 1) * factor,
                    column * factor..(column + 1) * factor
                ]);
                // Block is factor x factor, never empty.
                out[[band, row, column]] = block.mean().unwrap_or(f64::NAN);
            }
        }
    }

    BandStack::new(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn ramp_stack(rows: usize, cols: usize) -> BandStack {
        let mut data = Array3::zeros((4, rows, cols));
        for band in 0..4 {
            for row in 0..rows {
                for column in 0..cols {
                    data[[band, row, column]] = (band * rows * cols + row * cols + column) as f64;
                }
            }
        }
        BandStack::new(data).unwrap()
    }

    #[test]
    fn output_shape_is_floor_divided() {
        let out = block_average(&ramp_stack(5, 7), 2).unwrap();
        assert_eq!((out.bands(), out.rows(), out.cols()), (4, 2, 3));
    }

    #[test]
    fn cells_are_block_means() {
        // Band 0 of a 4x4 ramp: row*4 + col.
        let out = block_average(&ramp_stack(4, 4), 2).unwrap();
        // Top-left block {0, 1, 4, 5} -> 2.5
        assert!((out.band(0)[[0, 0]] - 2.5).abs() < 1e-12);
        // Bottom-right block {10, 11, 14, 15} -> 12.5
        assert!((out.band(0)[[1, 1]] - 12.5).abs() < 1e-12);
    }

    #[test]
    fn remainder_is_discarded() {
        // 5x5 with factor 2: only the leading 4x4 region participates.
        let full = block_average(&ramp_stack(5, 5), 2).unwrap();
        assert_eq!((full.rows(), full.cols()), (2, 2));
        // Top-left block of the 5-wide ramp {0, 1, 5, 6} -> 3.0
        assert!((full.band(0)[[0, 0]] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn oversized_factor_is_an_error() {
        assert!(block_average(&ramp_stack(4, 4), 5).is_err());
    }

    #[test]
    fn zero_factor_is_an_error() {
        assert!(block_average(&ramp_stack(4, 4), 0).is_err());
    }
}
