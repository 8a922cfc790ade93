//! Typed records flowing through the pipeline.
//!
//! Each stage takes explicit inputs and returns explicit outputs built from
//! these types; nothing is mutated after construction. Nullability is
//! confined to [`TimeSeriesRecord::value`]; once the joiner has applied its
//! filtering policy, every downstream field is a plain `f64` (which may be
//! non-finite for degenerate inputs such as a zero population).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AtlasError;

/// One of the six fixed continent codes used by the continent reference.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Continent {
    /// Africa
    AF,
    /// Asia
    AS,
    /// Europe
    EU,
    /// North America
    NA,
    /// Oceania
    OC,
    /// South America
    SA,
}

impl Continent {
    /// All six codes, in code order.
    pub const ALL: [Continent; 6] = [
        Continent::AF,
        Continent::AS,
        Continent::EU,
        Continent::NA,
        Continent::OC,
        Continent::SA,
    ];

    /// The two-letter code as it appears in the reference CSV.
    pub fn code(&self) -> &'static str {
        match self {
            Continent::AF => "AF",
            Continent::AS => "AS",
            Continent::EU => "EU",
            Continent::NA => "NA",
            Continent::OC => "OC",
            Continent::SA => "SA",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Continent {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "AF" => Ok(Continent::AF),
            "AS" => Ok(Continent::AS),
            "EU" => Ok(Continent::EU),
            "NA" => Ok(Continent::NA),
            "OC" => Ok(Continent::OC),
            "SA" => Ok(Continent::SA),
            other => Err(AtlasError::UnknownContinent(other.to_string())),
        }
    }
}

/// A single long-form observation produced by reshaping a wide source table.
///
/// `value` is `None` where the source cell was empty; the joiner owns the
/// policy of dropping such rows, so the reshaper preserves them and the
/// long form stays a bijection on `(country, year)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesRecord {
    pub country: String,
    pub year: u16,
    pub value: Option<f64>,
}

/// Emissions and population joined on `(country, year)`, before unit
/// conversion. Country names are canonical (aliases already applied).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedRow {
    pub country: String,
    pub year: u16,
    pub co2_kilotons: f64,
    pub population: f64,
    pub continent: Continent,
}

/// Country-level row with derived per-capita emissions.
///
/// `co2_tonnes` is in metric tons (converted from the source kilotons).
/// `co2_per_capita` is `co2_tonnes / population` and may be non-finite when
/// the population is zero; callers filtering on per-capita must treat
/// non-finite as excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryYearRow {
    pub country: String,
    pub year: u16,
    pub co2_tonnes: f64,
    pub population: f64,
    pub continent: Continent,
    pub co2_per_capita: f64,
}

/// Continent-level aggregate for one year.
///
/// `co2_per_capita` is recomputed from the summed totals
/// (`sum(co2) / sum(population)`), never averaged from per-country ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinentYearRow {
    pub continent: Continent,
    pub year: u16,
    pub co2_tonnes: f64,
    pub population: f64,
    pub co2_per_capita: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continent_round_trips_through_code() {
        for continent in Continent::ALL {
            let parsed: Continent = continent.code().parse().unwrap();
            assert_eq!(parsed, continent);
        }
    }

    #[test]
    fn continent_parse_trims_whitespace() {
        let parsed: Continent = " EU ".parse().unwrap();
        assert_eq!(parsed, Continent::EU);
    }

    #[test]
    fn unknown_continent_code_is_rejected() {
        let result = "AN".parse::<Continent>();
        assert!(matches!(result, Err(AtlasError::UnknownContinent(code)) if code == "AN"));
    }

    #[test]
    fn continent_serializes_as_code() {
        let json = serde_json::to_string(&Continent::OC).unwrap();
        assert_eq!(json, "\"OC\"");
    }
}
