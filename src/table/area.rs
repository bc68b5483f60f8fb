//! Area aggregation and the forest/zone ratio join, on Polars.

use anyhow::{bail, Context, Result};
use geo::Area;
use polars::prelude::*;

use crate::vector::FeatureCollection;

/// Planar area per feature, summed by the text key in `key_column`.
///
/// Returns a frame with columns `{name, <area_column>}`, one row per
/// distinct key. Duplicate keys sum together. Features whose key is NULL
/// (or a BLOB) carry no group and are dropped.
pub fn area_by_key(
    collection: &FeatureCollection,
    key_column: &str,
    area_column: &str,
) -> Result<DataFrame> {
    if !collection.has_column(key_column) {
        bail!(
            "[table::area] Key column '{}' not present in schema [{}]",
            key_column,
            collection.schema.join(", ")
        );
    }

    let mut names = Vec::with_capacity(collection.len());
    let mut areas = Vec::with_capacity(collection.len());
    for feature in &collection.features {
        let Some(key) = feature.property(key_column).and_then(|v| v.to_key()) else {
            continue;
        };
        names.push(key);
        areas.push(feature.geometry.unsigned_area());
    }

    let df = DataFrame::new(vec![
        Column::new("name".into(), names),
        Column::new(area_column.into(), areas),
    ])
    .context("[table::area] Failed to assemble area frame")?;

    df.lazy()
        .group_by([col("name")])
        .agg([col(area_column).sum()])
        .collect()
        .context("[table::area] Area aggregation failed")
}

/// Full outer join of the two area tables on `name`, with the derived
/// percentage column.
///
/// A name present on only one side keeps a null on the other side and a
/// null `forest_pct` (no NaN arithmetic: nullability is explicit in the
/// frame). Rows sort descending by percentage, stable, nulls last.
pub fn join_ratio(forest: DataFrame, zones: DataFrame) -> Result<DataFrame> {
    forest
        .lazy()
        .join(
            zones.lazy(),
            [col("name")],
            [col("name")],
            JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns),
        )
        .with_column(
            (col("forest_area") / col("canton_area") * lit(100.0)).alias("forest_pct"),
        )
        .select([
            col("name"),
            col("forest_area"),
            col("canton_area"),
            col("forest_pct"),
        ])
        .sort(
            ["forest_pct"],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_nulls_last(true)
                .with_maintain_order(true),
        )
        .collect()
        .context("[table::area] Ratio join failed")
}
