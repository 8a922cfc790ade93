//! Joining the long tables into country/year rows.
//!
//! Emissions and population are inner-joined on `(country, year)`: a row
//! missing either side, or carrying a null value on either side, is dropped.
//! Country names are then canonicalised through the static alias table and
//! inner-joined against the continent reference.
//!
//! Countries absent from the continent reference are silently excluded from
//! the output. This is an accepted data-loss behaviour of the source
//! analysis, not an error; the outcome records the distinct dropped names so
//! callers can surface the coverage gap.

use std::collections::{BTreeSet, HashMap};

use log::warn;

use crate::records::{Continent, JoinedRow, TimeSeriesRecord};
use crate::reference::NameAliases;

/// Result of the three-way join.
#[derive(Debug, Clone, Default)]
pub struct JoinOutcome {
    /// Rows present in all three sources under canonical naming.
    pub rows: Vec<JoinedRow>,
    /// Canonical names that matched emissions and population but were
    /// missing from the continent reference. These countries are absent
    /// from every downstream statistic.
    pub dropped_countries: BTreeSet<String>,
}

impl JoinOutcome {
    /// Log the coverage gap, if any. Dropped rows are intentional, so this
    /// is a warning rather than an error.
    pub fn log_coverage_gap(&self) {
        if self.dropped_countries.is_empty() {
            return;
        }
        warn!(
            "{} countries missing from the continent reference and excluded: {}",
            self.dropped_countries.len(),
            self.dropped_countries
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
}

/// Inner-join emissions and population on `(country, year)`, canonicalise
/// names and attach continent codes.
pub fn join_datasets(
    emissions: &[TimeSeriesRecord],
    population: &[TimeSeriesRecord],
    aliases: &NameAliases,
    continents: &HashMap<String, Continent>,
) -> JoinOutcome {
    let population_by_key: HashMap<(&str, u16), f64> = population
        .iter()
        .filter_map(|record| {
            record
                .value
                .map(|value| ((record.country.as_str(), record.year), value))
        })
        .collect();

    let mut outcome = JoinOutcome::default();
    for record in emissions {
        let Some(co2_kilotons) = record.value else {
            continue;
        };
        let Some(&population) = population_by_key.get(&(record.country.as_str(), record.year))
        else {
            continue;
        };

        let canonical = aliases.canonical(&record.country);
        let Some(&continent) = continents.get(canonical) else {
            outcome.dropped_countries.insert(canonical.to_string());
            continue;
        };

        outcome.rows.push(JoinedRow {
            country: canonical.to_string(),
            year: record.year,
            co2_kilotons,
            population,
            continent,
        });
    }

    outcome
}
