#![doc = "Canopy public API"]
pub mod cli;
pub mod commands;
pub mod pipeline;
pub mod raster;
pub mod render;
pub mod table;
pub mod vector;

#[doc(inline)]
pub use pipeline::{ForestParams, OrthoParams};

#[doc(inline)]
pub use vector::{Feature, FeatureCollection, GpkgReader, Value};

#[doc(inline)]
pub use raster::BandStack;
