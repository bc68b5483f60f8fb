//! End-to-end forest coverage over a generated GeoPackage fixture.

use std::path::Path;

use canopy::pipeline::{forest, ForestParams};
use canopy::GpkgReader;
use rusqlite::Connection;
use tempfile::TempDir;

/// Little-endian WKB polygon with one rectangular exterior ring.
fn wkb_rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<u8> {
    let ring = [(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)];
    let mut out = vec![1u8];
    out.extend(3u32.to_le_bytes()); // Polygon
    out.extend(1u32.to_le_bytes()); // one ring
    out.extend((ring.len() as u32).to_le_bytes());
    for (x, y) in ring {
        out.extend(x.to_le_bytes());
        out.extend(y.to_le_bytes());
    }
    out
}

/// GeoPackage geometry BLOB: GP header (little-endian, no envelope) + WKB.
fn gpkg_blob(wkb: Vec<u8>) -> Vec<u8> {
    let mut out = vec![b'G', b'P', 0, 0b0000_0001];
    out.extend(2056i32.to_le_bytes()); // srs_id
    out.extend(wkb);
    out
}

fn register_layer(conn: &Connection, table: &str) {
    conn.execute(
        "INSERT INTO gpkg_contents (table_name, data_type, identifier, srs_id) VALUES (?1, 'features', ?1, 2056)",
        [table],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO gpkg_geometry_columns (table_name, column_name, geometry_type_name, srs_id, z, m) \
         VALUES (?1, 'geom', 'POLYGON', 2056, 0, 0)",
        [table],
    )
    .unwrap();
}

fn create_registry(conn: &Connection) {
    conn.execute_batch(
        "CREATE TABLE gpkg_contents (
             table_name TEXT PRIMARY KEY, data_type TEXT, identifier TEXT, srs_id INTEGER
         );
         CREATE TABLE gpkg_geometry_columns (
             table_name TEXT, column_name TEXT, geometry_type_name TEXT,
             srs_id INTEGER, z TINYINT, m TINYINT
         );",
    )
    .unwrap();
}

/// Two zones of area 100 each plus an empty third; forest covering 70 area
/// units of "Aargau" and 20 of "Bern".
fn write_fixture(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let cover_path = dir.join("cover.gpkg");
    let zones_path = dir.join("zones.gpkg");

    let conn = Connection::open(&cover_path).unwrap();
    create_registry(&conn);
    register_layer(&conn, "bodenbedeckung");
    conn.execute_batch(
        "CREATE TABLE bodenbedeckung (fid INTEGER PRIMARY KEY, objektart TEXT, geom BLOB)",
    )
    .unwrap();
    let mut insert = conn
        .prepare("INSERT INTO bodenbedeckung (objektart, geom) VALUES (?1, ?2)")
        .unwrap();
    // Fully inside Aargau: 50 area units of forest.
    insert
        .execute(rusqlite::params!["Wald", gpkg_blob(wkb_rect(0.0, 0.0, 5.0, 10.0))])
        .unwrap();
    // Straddles Aargau and Bern: 20 units clip into each.
    insert
        .execute(rusqlite::params!["Wald", gpkg_blob(wkb_rect(8.0, 0.0, 22.0, 10.0))])
        .unwrap();
    // Not forest, must be filtered out before the overlay.
    insert
        .execute(rusqlite::params!["Fels", gpkg_blob(wkb_rect(5.0, 0.0, 8.0, 10.0))])
        .unwrap();
    drop(insert);

    let conn = Connection::open(&zones_path).unwrap();
    create_registry(&conn);
    register_layer(&conn, "kantonsgebiet");
    conn.execute_batch(
        "CREATE TABLE kantonsgebiet (fid INTEGER PRIMARY KEY, name TEXT, geom BLOB)",
    )
    .unwrap();
    let mut insert = conn
        .prepare("INSERT INTO kantonsgebiet (name, geom) VALUES (?1, ?2)")
        .unwrap();
    insert
        .execute(rusqlite::params!["Aargau", gpkg_blob(wkb_rect(0.0, 0.0, 10.0, 10.0))])
        .unwrap();
    insert
        .execute(rusqlite::params!["Bern", gpkg_blob(wkb_rect(20.0, 0.0, 30.0, 10.0))])
        .unwrap();
    insert
        .execute(rusqlite::params!["Glarus", gpkg_blob(wkb_rect(40.0, 0.0, 50.0, 10.0))])
        .unwrap();
    drop(insert);

    (cover_path, zones_path)
}

#[test]
fn forest_coverage_end_to_end() {
    let dir = TempDir::new().unwrap();
    let (cover_path, zones_path) = write_fixture(dir.path());

    let params = ForestParams {
        cover_path,
        cover_layer: "bodenbedeckung".to_string(),
        zones_path,
        zones_layer: "kantonsgebiet".to_string(),
        category_column: "objektart".to_string(),
        category_value: "Wald".to_string(),
        name_column: "name".to_string(),
    };

    let df = forest::run(&params, 0).unwrap();
    assert_eq!(df.height(), 3);
    assert_eq!(
        df.get_column_names_str(),
        vec!["name", "forest_area", "canton_area", "forest_pct"]
    );

    let names = df.column("name").unwrap().as_materialized_series().clone();
    let names = names.str().unwrap();
    let pct = df
        .column("forest_pct")
        .unwrap()
        .as_materialized_series()
        .clone();
    let pct = pct.f64().unwrap();

    // Aargau 70% > Bern 20% > Glarus (no forest, null pct sorted last).
    assert_eq!(names.get(0), Some("Aargau"));
    assert!((pct.get(0).unwrap() - 70.0).abs() < 1e-6);
    assert_eq!(names.get(1), Some("Bern"));
    assert!((pct.get(1).unwrap() - 20.0).abs() < 1e-6);
    assert_eq!(names.get(2), Some("Glarus"));
    assert!(pct.get(2).is_none());
}

#[test]
fn layers_are_discoverable_and_missing_layers_fail() {
    let dir = TempDir::new().unwrap();
    let (cover_path, _) = write_fixture(dir.path());

    let reader = GpkgReader::open_read_only(&cover_path).unwrap();
    assert_eq!(reader.list_layers().unwrap(), vec!["bodenbedeckung".to_string()]);

    let err = reader.read_layer("tlm_strassen").unwrap_err();
    assert!(err.to_string().contains("tlm_strassen"));
}

#[test]
fn layer_rows_keep_attributes_and_geometry() {
    let dir = TempDir::new().unwrap();
    let (cover_path, _) = write_fixture(dir.path());

    let layer = GpkgReader::open_read_only(&cover_path)
        .unwrap()
        .read_layer("bodenbedeckung")
        .unwrap();
    assert_eq!(layer.len(), 3);
    assert!(layer.has_column("objektart"));
    assert!(!layer.has_column("geom"));

    let forest = layer.filter_eq("objektart", "Wald").unwrap();
    assert_eq!(forest.len(), 2);
}
