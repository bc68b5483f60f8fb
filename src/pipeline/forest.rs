//! Forest coverage by administrative zone.
//!
//! Load two polygon layers, filter the land-cover layer down to one
//! category, intersect it with the zone layer, and report the covered
//! fraction of every zone's area as a percentage table.

use std::path::PathBuf;

use anyhow::Result;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use crate::table::{area_by_key, join_ratio};
use crate::vector::{overlay_intersection, GpkgReader};

fn default_category_column() -> String {
    "objektart".to_string()
}

fn default_category_value() -> String {
    "Wald".to_string()
}

fn default_name_column() -> String {
    "name".to_string()
}

/// Parameters of one coverage analysis. Defaults mirror the swisstopo
/// source datasets (land-cover category column `objektart`, forest value
/// `Wald`, zone name column `name`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestParams {
    /// GeoPackage holding the land-cover layer.
    pub cover_path: PathBuf,
    pub cover_layer: String,
    /// GeoPackage holding the administrative-zone layer.
    pub zones_path: PathBuf,
    pub zones_layer: String,
    #[serde(default = "default_category_column")]
    pub category_column: String,
    #[serde(default = "default_category_value")]
    pub category_value: String,
    #[serde(default = "default_name_column")]
    pub name_column: String,
}

/// Run the coverage analysis.
///
/// The result frame has one row per zone name from either side of the
/// outer join, columns `{name, forest_area, canton_area, forest_pct}`,
/// sorted descending by percentage with null percentages last.
pub fn run(params: &ForestParams, verbose: u8) -> Result<DataFrame> {
    let cover = GpkgReader::open_read_only(&params.cover_path)?
        .read_layer(&params.cover_layer)?;
    let zones = GpkgReader::open_read_only(&params.zones_path)?
        .read_layer(&params.zones_layer)?;
    if verbose > 0 {
        eprintln!(
            "[forest] loaded {} cover features, {} zone features",
            cover.len(),
            zones.len()
        );
    }

    let filtered = cover.filter_eq(&params.category_column, &params.category_value)?;
    let overlaid = overlay_intersection(&filtered, &zones)?;
    if verbose > 0 {
        eprintln!(
            "[forest] {} '{}' features, {} intersection pieces",
            filtered.len(),
            params.category_value,
            overlaid.len()
        );
    }

    // The overlay suffixes the name column only when the cover layer also
    // carries one with the same name.
    let joined_name_column = if filtered.has_column(&params.name_column) {
        format!("{}_2", params.name_column)
    } else {
        params.name_column.clone()
    };

    let forest_area = area_by_key(&overlaid, &joined_name_column, "forest_area")?;
    let zone_area = area_by_key(&zones, &params.name_column, "canton_area")?;
    join_ratio(forest_area, zone_area)
}
