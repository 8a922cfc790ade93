//! End-to-end pipeline test over a synthetic dataset.
//!
//! Three countries across two continents, one year, pushed through the real
//! CSV loaders, the reshape, the three-way join and both aggregation paths.
//! Every figure is checked against a hand computation.

use std::collections::BTreeMap;

use approx::assert_relative_eq;

use atlas_core::aggregate::{per_continent, per_country, ranking_for_year};
use atlas_core::join::join_datasets;
use atlas_core::load::{read_continent_reference, read_wide_csv};
use atlas_core::records::Continent;
use atlas_core::reference::NameAliases;
use atlas_core::scenario::{counterfactual, threshold_split};

const EMISSIONS_CSV: &str = "\
Data Source,Synthetic
Last Updated Date,2014-12-31
Country Name,Country Code,2014
Atlantica,ATL,200.0
\"Borduria, Rep.\",BOR,30.0
Cascara,CAS,5.0
";

const POPULATION_CSV: &str = "\
Data Source,Synthetic
Last Updated Date,2014-12-31
Country Name,Country Code,2014
Atlantica,ATL,50000
\"Borduria, Rep.\",BOR,60000
Cascara,CAS,10000
";

const CONTINENT_CSV: &str = "\
Country,Continent
Atlantica,EU
Borduria,EU
Cascara,AF
";

const TOLERANCE: f64 = 1e-9;

#[test]
fn synthetic_dataset_reproduces_hand_computed_figures() {
    let emissions = read_wide_csv(EMISSIONS_CSV.as_bytes(), "emissions")
        .unwrap()
        .into_long();
    let population = read_wide_csv(POPULATION_CSV.as_bytes(), "population")
        .unwrap()
        .into_long();
    let continents = read_continent_reference(CONTINENT_CSV.as_bytes(), "reference").unwrap();

    let aliases = NameAliases::new(BTreeMap::from([(
        "Borduria, Rep.".to_string(),
        "Borduria".to_string(),
    )]));

    let outcome = join_datasets(&emissions, &population, &aliases, &continents);
    assert!(outcome.dropped_countries.is_empty());
    assert_eq!(outcome.rows.len(), 3);

    // Country-level per-capita: kilotons * 1000 / population.
    let countries = per_country(&outcome.rows);
    let per_capita = |name: &str| {
        countries
            .iter()
            .find(|row| row.country == name)
            .unwrap()
            .co2_per_capita
    };
    assert_relative_eq!(per_capita("Atlantica"), 4.0, max_relative = TOLERANCE);
    assert_relative_eq!(per_capita("Borduria"), 0.5, max_relative = TOLERANCE);
    assert_relative_eq!(per_capita("Cascara"), 0.5, max_relative = TOLERANCE);

    // Continent-level per-capita from summed totals.
    let continent_rows = per_continent(&countries);
    assert_eq!(continent_rows.len(), 2);
    let continent = |code: Continent| {
        continent_rows
            .iter()
            .find(|row| row.continent == code)
            .unwrap()
    };
    assert_relative_eq!(
        continent(Continent::EU).co2_per_capita,
        230_000.0 / 110_000.0,
        max_relative = TOLERANCE
    );
    assert_relative_eq!(
        continent(Continent::AF).co2_per_capita,
        0.5,
        max_relative = TOLERANCE
    );

    // Ranking: Africa emits least per head in 2014.
    let ranked = ranking_for_year(&continent_rows, 2014);
    assert_eq!(ranked[0].continent, Continent::AF);
    assert_eq!(ranked.last().unwrap().continent, Continent::EU);

    // Threshold split over Europe at 1 t/person.
    let split = threshold_split(&countries, Continent::EU, 2014, 1.0);
    assert_eq!(split.below.members, 1);
    assert_eq!(split.above.members, 1);
    assert_relative_eq!(split.below.population, 60_000.0);
    assert_relative_eq!(split.below.co2_tonnes, 30_000.0);
    assert_relative_eq!(
        split.below.population_share,
        60_000.0 / 110_000.0,
        max_relative = TOLERANCE
    );
    assert_relative_eq!(split.total_population(), 110_000.0);

    // Counterfactual at 2 t/person for the below-threshold bucket.
    let outcome = counterfactual(&split, 2.0);
    assert_relative_eq!(outcome.projected_bucket_co2, 120_000.0);
    assert_relative_eq!(outcome.bucket_change, 3.0, max_relative = TOLERANCE);
    assert_relative_eq!(
        outcome.continent_change,
        (320_000.0 - 230_000.0) / 230_000.0,
        max_relative = TOLERANCE
    );
}
