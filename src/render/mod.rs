//! Rendering: color schemes and grid-to-image conversion.

mod colormap;
mod draw;

pub use colormap::{evaluate, ColorStop, ColormapParams, Rgb, NDVI_SCHEME};
pub use draw::{render_composite, render_index_map, save_composite, save_index_map};
