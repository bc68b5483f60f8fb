//! Orthophoto NDVI.
//!
//! Downsample a 4-band orthophoto by block averaging, write a false-color
//! composite (NIR, R, G), and compute + render the vegetation index.

use std::path::PathBuf;

use anyhow::Result;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::raster::{block_average, ndvi, read_tiff};
use crate::render::{render_composite, render_index_map, save_composite, save_index_map, ColormapParams};

fn default_factor() -> usize {
    200
}

fn default_composite_out() -> PathBuf {
    PathBuf::from("composite.png")
}

fn default_ndvi_out() -> PathBuf {
    PathBuf::from("ndvi.png")
}

/// Parameters of one orthophoto analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrthoParams {
    /// 4-band orthophoto (R, G, B, NIR band order).
    pub path: PathBuf,
    /// Spatial downsampling factor per axis.
    #[serde(default = "default_factor")]
    pub factor: usize,
    #[serde(default = "default_composite_out")]
    pub composite_out: PathBuf,
    #[serde(default = "default_ndvi_out")]
    pub ndvi_out: PathBuf,
}

/// Run the orthophoto analysis, writing both renders to the configured
/// paths and returning the downsampled NDVI grid.
pub fn run(params: &OrthoParams, verbose: u8) -> Result<Array2<f64>> {
    let stack = read_tiff(&params.path)?;
    if verbose > 0 {
        eprintln!(
            "[ortho] loaded {} bands of {}x{}",
            stack.bands(),
            stack.rows(),
            stack.cols()
        );
    }

    let low = block_average(&stack, params.factor)?;
    if verbose > 0 {
        eprintln!(
            "[ortho] downsampled by {} to {}x{}",
            params.factor,
            low.rows(),
            low.cols()
        );
    }

    let composite = render_composite(low.nir(), low.red(), low.green())?;
    save_composite(&composite, &params.composite_out)?;

    let index = ndvi(low.nir(), low.red())?;
    let map = render_index_map(&index, &ColormapParams::ndvi());
    save_index_map(&map, &params.ndvi_out)?;
    if verbose > 0 {
        eprintln!(
            "[ortho] wrote {} and {}",
            params.composite_out.display(),
            params.ndvi_out.display()
        );
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_deserialize_with_defaults() {
        let params: OrthoParams = serde_json::from_str(r#"{"path": "3612.tif"}"#).unwrap();
        assert_eq!(params.factor, 200);
        assert_eq!(params.composite_out, PathBuf::from("composite.png"));
        assert_eq!(params.ndvi_out, PathBuf::from("ndvi.png"));
    }
}
