//! GeoJSON country geometry input.
//!
//! The renderer only needs a country name and an opaque geometry per
//! feature, so geometry is carried as raw JSON and passed through to the
//! artifact untouched. The name comes from the `SUBUNIT` property.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::errors::{MapError, MapResult};

/// Name of the country-name property in the geometry input.
pub const NAME_PROPERTY: &str = "SUBUNIT";

#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind: String,
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: serde_json::Map<String, Value>,
    geometry: Value,
}

/// One country polygon: its `SUBUNIT` name plus opaque geometry.
#[derive(Debug, Clone)]
pub struct CountryShape {
    pub name: String,
    pub geometry: Value,
}

/// Load country shapes from a GeoJSON file on disk.
pub fn load_countries<P: AsRef<Path>>(path: P) -> MapResult<Vec<CountryShape>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| MapError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_countries(BufReader::new(file))
}

/// Parse country shapes from any GeoJSON reader.
///
/// A feature without a string `SUBUNIT` property is a schema error: the
/// merge is keyed on that name, so the failure surfaces at load time rather
/// than as a silently empty map.
pub fn read_countries<R: Read>(reader: R) -> MapResult<Vec<CountryShape>> {
    let collection: RawCollection = serde_json::from_reader(reader)?;
    if collection.kind != "FeatureCollection" {
        return Err(MapError::NotFeatureCollection(collection.kind));
    }

    let mut shapes = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.into_iter().enumerate() {
        let name = feature
            .properties
            .get(NAME_PROPERTY)
            .and_then(Value::as_str)
            .ok_or(MapError::MissingNameProperty {
                index,
                property: NAME_PROPERTY.to_string(),
            })?;
        shapes.push(CountryShape {
            name: name.to_string(),
            geometry: feature.geometry,
        });
    }
    Ok(shapes)
}
