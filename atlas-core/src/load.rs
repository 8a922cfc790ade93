//! Loaders for the source tables.
//!
//! Three time-indexed CSVs (total CO2, CO2 per capita, population) share the
//! World Bank layout: a fixed two-row preamble, a `Country Name` column and
//! one column per 4-digit year. The country-to-continent reference is a
//! plain CSV fetched over HTTP at run time.
//!
//! Loading is where schema validation happens: required columns must be
//! present, year headers must parse, numeric cells must be empty or
//! coercible to `f64`. Any mismatch is a fatal typed error rather than a
//! silent null downstream.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use serde::Deserialize;

use crate::errors::{AtlasError, AtlasResult};
use crate::records::Continent;

/// Name of the country identifier column in the wide source tables.
pub const COUNTRY_COLUMN: &str = "Country Name";

/// Number of preamble rows before the header in the wide source tables.
pub const PREAMBLE_ROWS: usize = 2;

/// First and last year columns present in the source tables.
pub const FIRST_YEAR: u16 = 1960;
pub const LAST_YEAR: u16 = 2014;

/// A wide table as loaded from disk: one row per country, one value column
/// per year. Converted to long form by `into_long` in the `reshape` module.
#[derive(Debug, Clone)]
pub struct WideTable {
    /// Table name used in error messages and logs (the file path or URL).
    pub name: String,
    /// Year columns, in file order.
    pub years: Vec<u16>,
    /// One entry per country row.
    pub rows: Vec<WideRow>,
}

/// A single country row of a [`WideTable`]. `values` is parallel to
/// [`WideTable::years`]; `None` marks an empty cell.
#[derive(Debug, Clone)]
pub struct WideRow {
    pub country: String,
    pub values: Vec<Option<f64>>,
}

/// Load a wide year-columns CSV from disk.
pub fn load_wide_csv<P: AsRef<Path>>(path: P) -> AtlasResult<WideTable> {
    let path = path.as_ref();
    let name = path.display().to_string();
    let file = File::open(path).map_err(|source| AtlasError::Io {
        path: name.clone(),
        source,
    })?;
    read_wide_csv(file, &name)
}

/// Parse a wide year-columns CSV from any reader.
///
/// Split out from [`load_wide_csv`] so tests can feed string fixtures
/// without touching the filesystem.
pub fn read_wide_csv<R: Read>(reader: R, name: &str) -> AtlasResult<WideTable> {
    // The preamble rows have a different field count to the data, so the
    // reader must be flexible and header handling is done by hand.
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = csv_reader.records();
    for _ in 0..PREAMBLE_ROWS {
        match records.next() {
            Some(record) => {
                record.map_err(|source| csv_error(name, source))?;
            }
            None => {
                return Err(AtlasError::MissingColumn {
                    table: name.to_string(),
                    column: COUNTRY_COLUMN.to_string(),
                })
            }
        }
    }

    let header = match records.next() {
        Some(record) => record.map_err(|source| csv_error(name, source))?,
        None => {
            return Err(AtlasError::MissingColumn {
                table: name.to_string(),
                column: COUNTRY_COLUMN.to_string(),
            })
        }
    };

    let country_index = header
        .iter()
        .position(|field| field == COUNTRY_COLUMN)
        .ok_or_else(|| AtlasError::MissingColumn {
            table: name.to_string(),
            column: COUNTRY_COLUMN.to_string(),
        })?;

    // Year columns are exactly the all-digit headers. A digit-only header
    // that is not a 4-digit year is a schema error, not a data column.
    let mut year_columns: Vec<(usize, u16)> = Vec::new();
    for (index, field) in header.iter().enumerate() {
        let field = field.trim();
        if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        if field.len() != 4 {
            return Err(AtlasError::BadYearHeader {
                table: name.to_string(),
                header: field.to_string(),
            });
        }
        let year: u16 = field.parse().map_err(|_| AtlasError::BadYearHeader {
            table: name.to_string(),
            header: field.to_string(),
        })?;
        year_columns.push((index, year));
    }
    if year_columns.is_empty() {
        return Err(AtlasError::MissingColumn {
            table: name.to_string(),
            column: format!("{FIRST_YEAR}..{LAST_YEAR}"),
        });
    }

    let mut rows = Vec::new();
    for (row_number, record) in records.enumerate() {
        let record = record.map_err(|source| csv_error(name, source))?;
        let country = record.get(country_index).unwrap_or("").trim();
        if country.is_empty() {
            continue;
        }

        let mut values = Vec::with_capacity(year_columns.len());
        for &(index, _) in &year_columns {
            let cell = record.get(index).unwrap_or("").trim();
            if cell.is_empty() || cell == ".." {
                values.push(None);
            } else {
                let value: f64 = cell.parse().map_err(|_| AtlasError::BadNumericCell {
                    table: name.to_string(),
                    // +1 for the header, +PREAMBLE_ROWS for the preamble,
                    // 1-based for humans.
                    row: row_number + PREAMBLE_ROWS + 2,
                    value: cell.to_string(),
                })?;
                values.push(Some(value));
            }
        }
        rows.push(WideRow {
            country: country.to_string(),
            values,
        });
    }

    debug!(
        "loaded {}: {} countries x {} years",
        name,
        rows.len(),
        year_columns.len()
    );

    Ok(WideTable {
        name: name.to_string(),
        years: year_columns.into_iter().map(|(_, year)| year).collect(),
        rows,
    })
}

#[derive(Debug, Deserialize)]
struct ContinentRecord {
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Continent")]
    continent: String,
}

/// Parse the country-to-continent reference CSV from any reader.
///
/// The table must carry at least `Country` and `Continent` columns; other
/// columns are ignored. An unknown continent code is a fatal schema error.
pub fn read_continent_reference<R: Read>(
    reader: R,
    name: &str,
) -> AtlasResult<HashMap<String, Continent>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|source| csv_error(name, source))?;
    for column in ["Country", "Continent"] {
        if !headers.iter().any(|field| field == column) {
            return Err(AtlasError::MissingColumn {
                table: name.to_string(),
                column: column.to_string(),
            });
        }
    }

    let mut continents = HashMap::new();
    for result in csv_reader.deserialize::<ContinentRecord>() {
        let record = result.map_err(|source| csv_error(name, source))?;
        let continent = Continent::from_str(&record.continent)?;
        continents.insert(record.country.trim().to_string(), continent);
    }

    debug!("loaded {}: {} countries", name, continents.len());
    Ok(continents)
}

/// Fetch the country-to-continent reference over HTTP.
///
/// One blocking GET, body decoded as UTF-8 CSV. No caching, no retry: an
/// unreachable URL is a fatal startup error.
pub fn fetch_continent_reference(url: &str) -> AtlasResult<HashMap<String, Continent>> {
    let http_error = |source: reqwest::Error| AtlasError::Http {
        url: url.to_string(),
        source,
    };
    let body = reqwest::blocking::get(url)
        .map_err(http_error)?
        .error_for_status()
        .map_err(http_error)?
        .text()
        .map_err(http_error)?;
    read_continent_reference(body.as_bytes(), url)
}

fn csv_error(name: &str, source: csv::Error) -> AtlasError {
    AtlasError::Csv {
        table: name.to_string(),
        source,
    }
}
