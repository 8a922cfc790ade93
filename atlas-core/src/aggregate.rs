//! Per-capita aggregation at country and continent level.
//!
//! Two independent paths:
//!
//! 1. Country level: convert kilotons to metric tons, divide by population.
//! 2. Continent level: sum co2 and population within `(continent, year)`
//!    groups, then divide the sums. Dividing summed totals rather than
//!    averaging per-country ratios keeps small low-emitting countries from
//!    skewing the continental figure.
//!
//! Division never panics here: a zero population produces a non-finite
//! per-capita value, and callers filtering on per-capita must treat
//! non-finite as excluded.

use std::collections::BTreeMap;

use crate::records::{Continent, ContinentYearRow, CountryYearRow, JoinedRow};

/// Conversion factor from source kilotons to metric tons.
pub const KILOTONS_TO_TONNES: f64 = 1000.0;

/// Derive country-level per-capita emissions from the joined rows.
pub fn per_country(rows: &[JoinedRow]) -> Vec<CountryYearRow> {
    rows.iter()
        .map(|row| {
            let co2_tonnes = row.co2_kilotons * KILOTONS_TO_TONNES;
            CountryYearRow {
                country: row.country.clone(),
                year: row.year,
                co2_tonnes,
                population: row.population,
                continent: row.continent,
                co2_per_capita: co2_tonnes / row.population,
            }
        })
        .collect()
}

/// Recompute continent-level per-capita emissions from summed totals.
///
/// Output is ordered by `(continent, year)`.
pub fn per_continent(rows: &[CountryYearRow]) -> Vec<ContinentYearRow> {
    let mut groups: BTreeMap<(Continent, u16), (f64, f64)> = BTreeMap::new();
    for row in rows {
        let entry = groups.entry((row.continent, row.year)).or_insert((0.0, 0.0));
        entry.0 += row.co2_tonnes;
        entry.1 += row.population;
    }

    groups
        .into_iter()
        .map(|((continent, year), (co2_tonnes, population))| ContinentYearRow {
            continent,
            year,
            co2_tonnes,
            population,
            co2_per_capita: co2_tonnes / population,
        })
        .collect()
}

/// Continent rows for one year, sorted ascending by per-capita emissions.
/// Non-finite per-capita values are excluded.
pub fn ranking_for_year(rows: &[ContinentYearRow], year: u16) -> Vec<ContinentYearRow> {
    let mut ranked: Vec<ContinentYearRow> = rows
        .iter()
        .filter(|row| row.year == year && row.co2_per_capita.is_finite())
        .cloned()
        .collect();
    ranked.sort_by(|a, b| {
        a.co2_per_capita
            .partial_cmp(&b.co2_per_capita)
            .expect("non-finite values filtered above")
    });
    ranked
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn joined(country: &str, continent: Continent, co2_kilotons: f64, population: f64) -> JoinedRow {
        JoinedRow {
            country: country.to_string(),
            year: 2014,
            co2_kilotons,
            population,
            continent,
        }
    }

    #[test]
    fn country_per_capita_converts_units() {
        let rows = per_country(&[joined("France", Continent::EU, 360_000.0, 60_000_000.0)]);

        assert_eq!(rows.len(), 1);
        assert_relative_eq!(rows[0].co2_tonnes, 360_000_000.0);
        assert_relative_eq!(rows[0].co2_per_capita, 6.0);
    }

    #[test]
    fn zero_population_yields_non_finite_ratio() {
        let rows = per_country(&[joined("Ghost", Continent::OC, 5.0, 0.0)]);
        assert!(!rows[0].co2_per_capita.is_finite());
    }

    #[test]
    fn continent_per_capita_divides_summed_totals() {
        // Big high-emitter and small low-emitter: the mean of ratios would be
        // (10 + 1) / 2 = 5.5, but the population-weighted truth is dominated
        // by the large country.
        let countries = per_country(&[
            joined("Bigland", Continent::AS, 1_000_000.0, 100_000_000.0), // 10 t/person
            joined("Smallland", Continent::AS, 1.0, 1_000.0),             // 1 t/person
        ]);
        let continents = per_continent(&countries);

        assert_eq!(continents.len(), 1);
        let asia = &continents[0];
        let expected = (1_000_000.0 * KILOTONS_TO_TONNES + 1.0 * KILOTONS_TO_TONNES)
            / (100_000_000.0 + 1_000.0);
        assert_relative_eq!(asia.co2_per_capita, expected, max_relative = 1e-12);
        assert!(asia.co2_per_capita > 9.9, "sum-then-divide, not mean of ratios");
    }

    #[test]
    fn groups_are_keyed_by_continent_and_year() {
        let mut rows = vec![joined("Kenya", Continent::AF, 10.0, 100.0)];
        rows.push(JoinedRow {
            year: 2013,
            ..joined("Kenya", Continent::AF, 20.0, 100.0)
        });
        rows.push(joined("France", Continent::EU, 30.0, 100.0));

        let continents = per_continent(&per_country(&rows));
        assert_eq!(continents.len(), 3);
        // BTreeMap ordering: (AF, 2013), (AF, 2014), (EU, 2014).
        assert_eq!(continents[0].continent, Continent::AF);
        assert_eq!(continents[0].year, 2013);
        assert_eq!(continents[2].continent, Continent::EU);
    }

    #[test]
    fn ranking_sorts_ascending_and_skips_non_finite() {
        let countries = per_country(&[
            joined("Bigland", Continent::AS, 1_000.0, 1_000_000.0),
            joined("Greenland", Continent::EU, 1.0, 1_000_000.0),
            joined("Ghost", Continent::OC, 5.0, 0.0),
        ]);
        let continents = per_continent(&countries);
        let ranked = ranking_for_year(&continents, 2014);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].continent, Continent::EU);
        assert_eq!(ranked[1].continent, Continent::AS);
    }
}
