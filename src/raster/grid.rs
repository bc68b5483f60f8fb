//! Multi-band raster grid.

use anyhow::{bail, Result};
use ndarray::{Array3, ArrayView2, Axis};

/// Fixed band order of the orthophoto products consumed here.
pub const BAND_RED: usize = 0;
pub const BAND_GREEN: usize = 1;
pub const BAND_BLUE: usize = 2;
pub const BAND_NIR: usize = 3;

/// A stack of same-shaped bands, `(band, row, col)`, widened to `f64`.
#[derive(Debug, Clone)]
pub struct BandStack {
    data: Array3<f64>,
}

impl BandStack {
    /// Wrap band data. The R, G, B, NIR accessors assume the fixed band
    /// order above, so at least four bands are required.
    pub fn new(data: Array3<f64>) -> Result<Self> {
        if data.shape()[0] < 4 {
            bail!(
                "[raster::grid] Band stack has {} band(s), need at least 4 (R, G, B, NIR)",
                data.shape()[0]
            );
        }
        Ok(Self { data })
    }

    pub fn bands(&self) -> usize {
        self.data.shape()[0]
    }

    pub fn rows(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn cols(&self) -> usize {
        self.data.shape()[2]
    }

    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    pub fn band(&self, index: usize) -> ArrayView2<'_, f64> {
        self.data.index_axis(Axis(0), index)
    }

    pub fn red(&self) -> ArrayView2<'_, f64> {
        self.band(BAND_RED)
    }

    pub fn green(&self) -> ArrayView2<'_, f64> {
        self.band(BAND_GREEN)
    }

    pub fn blue(&self) -> ArrayView2<'_, f64> {
        self.band(BAND_BLUE)
    }

    pub fn nir(&self) -> ArrayView2<'_, f64> {
        self.band(BAND_NIR)
    }
}
