//! Minimal well-known-binary reader for areal geometries.
//!
//! GeoPackage stores one ISO WKB (or PostGIS-flavoured EWKB) geometry per
//! feature row. Only Polygon and MultiPolygon are supported here; Z and M
//! ordinates are parsed and discarded since the analyses are planar.

use anyhow::{bail, Context, Result};
use geo::{Coord, LineString, MultiPolygon, Polygon};

/// WKB base geometry type for Polygon
const WKB_POLYGON: u32 = 3;
/// WKB base geometry type for MultiPolygon
const WKB_MULTI_POLYGON: u32 = 6;
/// WKB byte order marker: little endian
const WKB_LE: u8 = 1;

/// EWKB flag bits (PostGIS dialect)
const EWKB_Z: u32 = 0x8000_0000;
const EWKB_M: u32 = 0x4000_0000;
const EWKB_SRID: u32 = 0x2000_0000;

/// Geometry header decoded from the raw WKB type word.
struct GeomHeader {
    base: u32,
    has_z: bool,
    has_m: bool,
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    little_endian: bool,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0, little_endian: true }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.bytes.len() {
            bail!(
                "[vector::wkb] Truncated geometry: wanted {} bytes at offset {}, have {}",
                n,
                self.pos,
                self.bytes.len()
            );
        }
        let out = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Result<u32> {
        let raw: [u8; 4] = self.take(4)?.try_into()?;
        Ok(if self.little_endian {
            u32::from_le_bytes(raw)
        } else {
            u32::from_be_bytes(raw)
        })
    }

    fn read_f64(&mut self) -> Result<f64> {
        let raw: [u8; 8] = self.take(8)?.try_into()?;
        Ok(if self.little_endian {
            f64::from_le_bytes(raw)
        } else {
            f64::from_be_bytes(raw)
        })
    }

    /// Read the byte-order marker plus type word that prefixes every
    /// geometry (top-level and each member of a multi-geometry).
    fn read_header(&mut self) -> Result<GeomHeader> {
        let order = self.read_u8().context("[vector::wkb] Failed to read byte order")?;
        self.little_endian = order == WKB_LE;

        let raw = self.read_u32().context("[vector::wkb] Failed to read geometry type")?;
        if raw & EWKB_SRID != 0 {
            // EWKB embeds the SRID after the type word; the layer already
            // carries the CRS, so the value is skipped.
            self.read_u32().context("[vector::wkb] Failed to read EWKB srid")?;
        }

        let code = raw & !(EWKB_Z | EWKB_M | EWKB_SRID);
        // ISO WKB encodes dimensionality in the thousands digit:
        // 0 = XY, 1 = XYZ, 2 = XYM, 3 = XYZM.
        let dim_block = code / 1000;
        Ok(GeomHeader {
            base: code % 1000,
            has_z: raw & EWKB_Z != 0 || dim_block == 1 || dim_block == 3,
            has_m: raw & EWKB_M != 0 || dim_block == 2 || dim_block == 3,
        })
    }

    fn read_ring(&mut self, header: &GeomHeader) -> Result<LineString<f64>> {
        let len = self.read_u32().context("[vector::wkb] Failed to read ring length")?;
        let mut coords = Vec::with_capacity(len as usize);
        for _ in 0..len {
            let x = self.read_f64().context("[vector::wkb] Failed to read x coordinate")?;
            let y = self.read_f64().context("[vector::wkb] Failed to read y coordinate")?;
            if header.has_z {
                self.read_f64().context("[vector::wkb] Failed to read z coordinate")?;
            }
            if header.has_m {
                self.read_f64().context("[vector::wkb] Failed to read m coordinate")?;
            }
            coords.push(Coord { x, y });
        }
        Ok(LineString::from(coords))
    }

    /// Ring block of a polygon, after the header has been consumed.
    fn read_polygon_body(&mut self, header: &GeomHeader) -> Result<Polygon<f64>> {
        let num_rings = self.read_u32().context("[vector::wkb] Failed to read ring count")?;
        if num_rings == 0 {
            bail!("[vector::wkb] Polygon must have at least one ring");
        }
        let exterior = self.read_ring(header)?;
        let mut interiors = Vec::with_capacity(num_rings as usize - 1);
        for _ in 1..num_rings {
            interiors.push(self.read_ring(header)?);
        }
        Ok(Polygon::new(exterior, interiors))
    }
}

/// Decode a WKB byte string into a `MultiPolygon`.
///
/// A single Polygon is promoted to a one-member MultiPolygon so callers see
/// one areal type. Non-areal geometries are rejected by type code.
pub fn decode_multi_polygon(bytes: &[u8]) -> Result<MultiPolygon<f64>> {
    let mut cursor = Cursor::new(bytes);
    let header = cursor.read_header()?;

    match header.base {
        WKB_POLYGON => Ok(MultiPolygon(vec![cursor.read_polygon_body(&header)?])),
        WKB_MULTI_POLYGON => {
            let count = cursor
                .read_u32()
                .context("[vector::wkb] Failed to read polygon count")?;
            let mut polygons = Vec::with_capacity(count as usize);
            for _ in 0..count {
                // Each member repeats the byte-order/type prefix.
                let member = cursor.read_header()?;
                if member.base != WKB_POLYGON {
                    bail!(
                        "[vector::wkb] MultiPolygon member has geometry type {}, expected Polygon",
                        member.base
                    );
                }
                polygons.push(cursor.read_polygon_body(&member)?);
            }
            Ok(MultiPolygon(polygons))
        }
        other => bail!(
            "[vector::wkb] Unsupported geometry type {} (only Polygon and MultiPolygon are supported)",
            other
        ),
    }
}
