//! Versioned static reference data.
//!
//! The country-name alias table and the continent display names live in
//! `data/reference.toml` rather than as inline literals, so updates are a
//! data change with a version bump instead of a code change. The file is
//! embedded at compile time and validated on load: the continent section
//! must cover exactly the six known codes.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Deserialize;

use crate::errors::{AtlasError, AtlasResult};
use crate::records::Continent;

const EMBEDDED_REFERENCE: &str = include_str!("../data/reference.toml");

#[derive(Debug, Deserialize)]
struct ReferenceFile {
    version: u32,
    continents: BTreeMap<String, String>,
    aliases: BTreeMap<String, String>,
}

/// Country-name canonicalisation table.
///
/// Maps names as they appear in the World Bank datasets to the canonical
/// names used by the continent reference and the map geometry. Names with no
/// entry are already canonical.
#[derive(Debug, Clone, Default)]
pub struct NameAliases {
    entries: BTreeMap<String, String>,
}

impl NameAliases {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// Resolve a source-dataset name to its canonical form.
    pub fn canonical<'a>(&'a self, name: &'a str) -> &'a str {
        self.entries.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parsed and validated contents of `data/reference.toml`.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    version: u32,
    continent_names: BTreeMap<Continent, String>,
    aliases: NameAliases,
}

impl ReferenceData {
    /// Load the reference data embedded in the crate.
    pub fn embedded() -> AtlasResult<Self> {
        Self::from_toml(EMBEDDED_REFERENCE)
    }

    /// Parse reference data from a TOML document.
    pub fn from_toml(text: &str) -> AtlasResult<Self> {
        let file: ReferenceFile = toml::from_str(text)?;

        let mut continent_names = BTreeMap::new();
        for (code, name) in file.continents {
            let continent = Continent::from_str(&code).map_err(|_| {
                AtlasError::ConfigInvalid(format!("unknown continent code '{code}'"))
            })?;
            continent_names.insert(continent, name);
        }
        for continent in Continent::ALL {
            if !continent_names.contains_key(&continent) {
                return Err(AtlasError::ConfigInvalid(format!(
                    "missing display name for continent {continent}"
                )));
            }
        }

        Ok(Self {
            version: file.version,
            continent_names,
            aliases: NameAliases::new(file.aliases),
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn aliases(&self) -> &NameAliases {
        &self.aliases
    }

    /// Human-readable name for a continent code (e.g. `AF` -> "Africa").
    pub fn continent_name(&self, continent: Continent) -> &str {
        // Validated on load, so every code is present.
        &self.continent_names[&continent]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_reference_parses() {
        let reference = ReferenceData::embedded().unwrap();
        assert_eq!(reference.version(), 1);
        assert_eq!(reference.continent_name(Continent::AF), "Africa");
        assert!(!reference.aliases().is_empty());
    }

    #[test]
    fn aliases_resolve_to_canonical_names() {
        let reference = ReferenceData::embedded().unwrap();
        let aliases = reference.aliases();
        assert_eq!(aliases.canonical("Russian Federation"), "Russia");
        assert_eq!(aliases.canonical("Korea, Rep."), "South Korea");
        // Names without an entry pass through untouched.
        assert_eq!(aliases.canonical("France"), "France");
    }

    #[test]
    fn missing_continent_name_is_rejected() {
        let text = r#"
            version = 1
            [continents]
            AF = "Africa"
            [aliases]
        "#;
        let result = ReferenceData::from_toml(text);
        assert!(matches!(result, Err(AtlasError::ConfigInvalid(_))));
    }

    #[test]
    fn unknown_continent_code_in_config_is_rejected() {
        let text = r#"
            version = 1
            [continents]
            AF = "Africa"
            AS = "Asia"
            EU = "Europe"
            NA = "North America"
            OC = "Oceania"
            SA = "South America"
            AN = "Antarctica"
            [aliases]
        "#;
        let result = ReferenceData::from_toml(text);
        assert!(matches!(result, Err(AtlasError::ConfigInvalid(_))));
    }
}
