//! GeoPackage layer reading over rusqlite.
//!
//! A GeoPackage is a SQLite database with two registry tables:
//! `gpkg_contents` lists the layers, `gpkg_geometry_columns` names the BLOB
//! column holding each layer's geometry. Geometry BLOBs carry a small
//! GeoPackage header (magic, flags, optional envelope) followed by WKB.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use super::feature::{Feature, FeatureCollection, Value};
use super::wkb;

/// "GP" magic prefixing every GeoPackage geometry BLOB.
const GPKG_MAGIC: &[u8] = b"GP";
/// Flags bit 4: geometry is declared empty.
const FLAG_EMPTY: u8 = 0b0001_0000;

/// Read-only handle on one GeoPackage container.
#[derive(Debug)]
pub struct GpkgReader {
    conn: Connection,
}

impl GpkgReader {
    /// Open an existing GeoPackage read-only. Fails if the file is missing,
    /// not SQLite, or lacks the GeoPackage registry tables.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("[vector::gpkg] Failed to open {}", path.display()))?;

        let registered: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master \
                 WHERE type = 'table' AND name IN ('gpkg_contents', 'gpkg_geometry_columns')",
                [],
                |row| row.get(0),
            )
            .with_context(|| format!("[vector::gpkg] Failed to inspect {}", path.display()))?;
        if registered < 2 {
            bail!(
                "[vector::gpkg] {} is not a GeoPackage (registry tables missing)",
                path.display()
            );
        }

        Ok(Self { conn })
    }

    /// Names of the feature layers registered in the container.
    pub fn list_layers(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT table_name FROM gpkg_contents WHERE data_type = 'features' ORDER BY table_name")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("[vector::gpkg] Failed to list layers")?;
        Ok(names)
    }

    /// Load an entire layer into memory.
    pub fn read_layer(&self, layer: &str) -> Result<FeatureCollection> {
        let geom_column: String = self
            .conn
            .query_row(
                "SELECT column_name FROM gpkg_geometry_columns WHERE table_name = ?1",
                [layer],
                |row| row.get(0),
            )
            .with_context(|| format!("[vector::gpkg] Layer '{layer}' not found"))?;

        let sql = format!("SELECT * FROM \"{}\"", layer.replace('"', "\"\""));
        let mut stmt = self
            .conn
            .prepare(&sql)
            .with_context(|| format!("[vector::gpkg] Failed to query layer '{layer}'"))?;

        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let geom_idx = columns
            .iter()
            .position(|c| *c == geom_column)
            .with_context(|| {
                format!("[vector::gpkg] Layer '{layer}' lacks its geometry column '{geom_column}'")
            })?;
        let schema: Vec<String> = columns
            .iter()
            .filter(|c| **c != geom_column)
            .cloned()
            .collect();

        let mut features = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let geometry = match row.get_ref(geom_idx)? {
                ValueRef::Null => continue, // NULL geometry contributes no feature
                ValueRef::Blob(blob) => match geometry_from_blob(blob)
                    .with_context(|| format!("[vector::gpkg] Bad geometry in layer '{layer}'"))?
                {
                    Some(geom) => geom,
                    None => continue, // declared-empty geometry
                },
                other => bail!(
                    "[vector::gpkg] Geometry column '{}' holds {:?}, expected a BLOB",
                    geom_column,
                    other.data_type()
                ),
            };

            let mut properties = HashMap::with_capacity(schema.len());
            for (idx, name) in columns.iter().enumerate() {
                if idx == geom_idx {
                    continue;
                }
                properties.insert(name.clone(), value_from_ref(row.get_ref(idx)?));
            }
            features.push(Feature { geometry, properties });
        }

        Ok(FeatureCollection::new(schema, features))
    }
}

fn value_from_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Integer(v),
        ValueRef::Real(v) => Value::Real(v),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

/// Strip the GeoPackage binary header and decode the trailing WKB.
///
/// Returns `None` for geometries the header declares empty.
fn geometry_from_blob(blob: &[u8]) -> Result<Option<geo::MultiPolygon<f64>>> {
    if blob.len() < 8 || &blob[0..2] != GPKG_MAGIC {
        bail!("[vector::gpkg] BLOB lacks the GeoPackage 'GP' header");
    }
    let flags = blob[3];
    if flags & FLAG_EMPTY != 0 {
        return Ok(None);
    }

    // Flags bits 1-3 select the envelope layout; the envelope itself is
    // redundant with the geometry and skipped.
    let envelope_len = match (flags >> 1) & 0b111 {
        0 => 0,
        1 => 32,
        2 | 3 => 48,
        4 => 64,
        code => bail!("[vector::gpkg] Invalid envelope contents indicator {code}"),
    };
    let wkb_start = 8 + envelope_len;
    if blob.len() <= wkb_start {
        bail!("[vector::gpkg] BLOB ends before its WKB payload");
    }

    wkb::decode_multi_polygon(&blob[wkb_start..]).map(Some)
}
