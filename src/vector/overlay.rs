//! Intersection overlay between two feature collections.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use geo::{BooleanOps, BoundingRect, Rect};
use rstar::{RTree, RTreeObject, AABB};

use super::feature::{Feature, FeatureCollection, Value};

/// R-tree entry: bounding box of one feature plus its collection index.
#[derive(Debug, Clone)]
struct BboxEntry {
    idx: usize,
    bbox: Rect<f64>,
}

impl RTreeObject for BboxEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}

/// Column rename maps resolving schema collisions between the two sides.
/// Colliding names get `_1` (left) and `_2` (right); unique names pass
/// through untouched.
fn collision_renames(
    left: &[String],
    right: &[String],
) -> (HashMap<String, String>, HashMap<String, String>) {
    let left_set: HashSet<&String> = left.iter().collect();
    let shared: HashSet<&String> = right.iter().filter(|c| left_set.contains(c)).collect();

    let rename = |cols: &[String], suffix: &str| {
        cols.iter()
            .map(|c| {
                let renamed = if shared.contains(c) { format!("{c}{suffix}") } else { c.clone() };
                (c.clone(), renamed)
            })
            .collect::<HashMap<_, _>>()
    };
    (rename(left, "_1"), rename(right, "_2"))
}

/// Geometric intersection overlay.
///
/// Every pair of features whose bounding boxes overlap is intersected;
/// pairs with an empty intersection contribute no output feature. Output
/// features inherit the union of both parents' properties (collisions
/// suffixed) and are ordered by left feature, then right feature.
pub fn overlay_intersection(
    left: &FeatureCollection,
    right: &FeatureCollection,
) -> Result<FeatureCollection> {
    let (left_renames, right_renames) = collision_renames(&left.schema, &right.schema);

    let mut schema: Vec<String> = left.schema.iter().map(|c| left_renames[c].clone()).collect();
    schema.extend(right.schema.iter().map(|c| right_renames[c].clone()));

    let rtree = RTree::bulk_load(
        right
            .features
            .iter()
            .enumerate()
            .filter_map(|(idx, f)| f.geometry.bounding_rect().map(|bbox| BboxEntry { idx, bbox }))
            .collect(),
    );

    let mut features = Vec::new();
    for lf in &left.features {
        let Some(rect) = lf.geometry.bounding_rect() else { continue };
        let search = AABB::from_corners(rect.min().into(), rect.max().into());

        // R-tree iteration order is unspecified; restore right input order
        // so overlay output is deterministic.
        let mut candidates: Vec<usize> = rtree
            .locate_in_envelope_intersecting(&search)
            .map(|entry| entry.idx)
            .collect();
        candidates.sort_unstable();

        for j in candidates {
            let rf = &right.features[j];
            let intersection = lf.geometry.intersection(&rf.geometry);
            if intersection.0.is_empty() {
                continue;
            }

            let mut properties: HashMap<String, Value> = lf
                .properties
                .iter()
                .map(|(k, v)| (left_renames.get(k).cloned().unwrap_or_else(|| k.clone()), v.clone()))
                .collect();
            for (k, v) in &rf.properties {
                let key = right_renames.get(k).cloned().unwrap_or_else(|| k.clone());
                properties.insert(key, v.clone());
            }

            features.push(Feature { geometry: intersection, properties });
        }
    }

    Ok(FeatureCollection::new(schema, features))
}
