//! Normalized Difference Vegetation Index.

use anyhow::{bail, Result};
use ndarray::{Array2, ArrayView2};

/// Elementwise `(NIR - Red) / (NIR + Red)`.
///
/// Cells where the denominator is zero follow IEEE semantics (NaN or
/// +/- infinity) and are carried through rather than masked; the renderer
/// treats them as nodata.
pub fn ndvi(nir: ArrayView2<'_, f64>, red: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
    if nir.dim() != red.dim() {
        bail!(
            "[raster::ndvi] Band shapes differ: NIR {:?} vs Red {:?}",
            nir.dim(),
            red.dim()
        );
    }
    Ok((&nir - &red) / (&nir + &red))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn computes_the_index() {
        let nir = array![[0.8, 0.5], [0.2, 1.0]];
        let red = array![[0.2, 0.5], [0.2, 0.0]];
        let out = ndvi(nir.view(), red.view()).unwrap();
        assert!((out[[0, 0]] - 0.6).abs() < 1e-12);
        assert!((out[[0, 1]] - 0.0).abs() < 1e-12);
        assert!((out[[1, 0]] - 0.0).abs() < 1e-12);
        assert!((out[[1, 1]] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zero_denominator_propagates_nan() {
        let nir = array![[0.0]];
        let red = array![[0.0]];
        let out = ndvi(nir.view(), red.view()).unwrap();
        assert!(out[[0, 0]].is_nan());
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let nir = array![[0.0, 1.0]];
        let red = array![[0.0]];
        assert!(ndvi(nir.view(), red.view()).is_err());
    }
}
