//! In-memory feature collections.

use std::collections::HashMap;

use anyhow::{bail, Result};
use geo::MultiPolygon;

/// A property value, mirroring the SQLite storage classes a GeoPackage
/// attribute column can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text rendering used for group keys; `Null` has no rendering.
    pub fn to_key(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Integer(v) => Some(v.to_string()),
            Value::Real(v) => Some(v.to_string()),
            Value::Text(s) => Some(s.clone()),
            Value::Blob(_) => None,
        }
    }
}

/// One areal feature: a planar geometry plus its attribute row.
#[derive(Debug, Clone)]
pub struct Feature {
    pub geometry: MultiPolygon<f64>,
    pub properties: HashMap<String, Value>,
}

impl Feature {
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

/// An ordered collection of features sharing one attribute schema and CRS.
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    /// Attribute column names, in layer order.
    pub schema: Vec<String>,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(schema: Vec<String>, features: Vec<Feature>) -> Self {
        Self { schema, features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.schema.iter().any(|c| c == name)
    }

    /// Subsequence of features whose `column` equals the text `value`,
    /// preserving input order. No match yields an empty collection, which
    /// is not an error; a column absent from the schema is.
    pub fn filter_eq(&self, column: &str, value: &str) -> Result<FeatureCollection> {
        if !self.has_column(column) {
            bail!(
                "[vector::feature] Column '{}' not present in schema [{}]",
                column,
                self.schema.join(", ")
            );
        }
        let features = self
            .features
            .iter()
            .filter(|f| f.property(column).and_then(Value::as_str) == Some(value))
            .cloned()
            .collect();
        Ok(FeatureCollection::new(self.schema.clone(), features))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    fn square(offset: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: offset, y: 0.0),
            (x: offset + 1.0, y: 0.0),
            (x: offset + 1.0, y: 1.0),
            (x: offset, y: 1.0),
        ]])
    }

    fn collection() -> FeatureCollection {
        let feats = ["Wald", "Fels", "Wald"]
            .iter()
            .enumerate()
            .map(|(i, kind)| Feature {
                geometry: square(i as f64 * 2.0),
                properties: HashMap::from([(
                    "objektart".to_string(),
                    Value::Text(kind.to_string()),
                )]),
            })
            .collect();
        FeatureCollection::new(vec!["objektart".to_string()], feats)
    }

    #[test]
    fn filter_keeps_matching_features_in_order() {
        let fc = collection();
        let filtered = fc.filter_eq("objektart", "Wald").unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(filtered.len() <= fc.len());
        for f in &filtered.features {
            assert_eq!(f.property("objektart").unwrap().as_str(), Some("Wald"));
        }
    }

    #[test]
    fn filter_without_match_is_empty_not_error() {
        let filtered = collection().filter_eq("objektart", "See").unwrap();
        assert!(filtered.is_empty());
    }

    #[test]
    fn filter_on_unknown_column_is_an_error() {
        let err = collection().filter_eq("kategorie", "Wald").unwrap_err();
        assert!(err.to_string().contains("kategorie"));
    }
}
