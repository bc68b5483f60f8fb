//! Vector side: GeoPackage loading, feature collections, overlay.

mod feature;
mod gpkg;
mod overlay;
mod wkb;

pub use feature::{Feature, FeatureCollection, Value};
pub use gpkg::GpkgReader;
pub use overlay::overlay_intersection;
pub use wkb::decode_multi_polygon;
