//! Raster side: TIFF loading, band grids, resampling, NDVI.

mod grid;
mod ndvi;
mod read;
mod resample;

pub use grid::{BandStack, BAND_BLUE, BAND_GREEN, BAND_NIR, BAND_RED};
pub use ndvi::ndvi;
pub use read::read_tiff;
pub use resample::block_average;
