//! Pipeline driver: one batch run over the World Bank tables.
//!
//! Loads the three wide CSVs and the remote continent reference, joins and
//! aggregates them, prints the descriptive answers of the analysis and
//! writes the choropleth artifact. Single-threaded and synchronous; the
//! only suspension point is the blocking fetch of the continent table.

use anyhow::{Context, Result};
use log::info;
use tracing_subscriber::EnvFilter;

use atlas_core::aggregate::{per_continent, per_country, ranking_for_year};
use atlas_core::join::join_datasets;
use atlas_core::load::{fetch_continent_reference, load_wide_csv};
use atlas_core::records::Continent;
use atlas_core::reference::ReferenceData;
use atlas_core::scenario::{counterfactual, threshold_split};
use atlas_map::geojson::load_countries;
use atlas_map::render::{render_choropleth, write_choropleth, MapOptions};

/// Run parameters. The analysis is a fixed one-shot run, so these are
/// inline constants rather than CLI flags.
struct Config {
    emissions_csv: &'static str,
    population_csv: &'static str,
    per_capita_csv: &'static str,
    continent_url: &'static str,
    geometry_path: &'static str,
    output_path: &'static str,
    /// Year the descriptive questions and the map are asked about.
    reference_year: u16,
    /// Per-capita threshold splitting low from high emitters, t/person.
    threshold: f64,
    /// Counterfactual per-capita target for the low bucket, t/person.
    target_per_capita: f64,
    /// Continent the scenario questions focus on.
    scenario_continent: Continent,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            emissions_csv: "data/co2_emissions_kt.csv",
            population_csv: "data/population.csv",
            per_capita_csv: "data/co2_emissions_per_capita.csv",
            continent_url:
                "https://raw.githubusercontent.com/dbouquin/IS_608/master/NanosatDB_munging/Countries-Continents.csv",
            geometry_path: "data/countries.geojson",
            output_path: "co2_per_capita_map.html",
            reference_year: 2014,
            threshold: 1.0,
            target_per_capita: 2.0,
            scenario_continent: Continent::AF,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::default();
    let reference = ReferenceData::embedded().context("loading embedded reference data")?;

    // Load. The per-capita source table is read and validated for
    // completeness, but the ratio is recomputed from totals downstream.
    let emissions = load_wide_csv(config.emissions_csv)
        .context("loading emissions table")?
        .into_long();
    let population = load_wide_csv(config.population_csv)
        .context("loading population table")?
        .into_long();
    let source_per_capita = load_wide_csv(config.per_capita_csv)
        .context("loading per-capita table")?
        .into_long();
    info!(
        "loaded {} emission, {} population and {} per-capita observations",
        emissions.len(),
        population.len(),
        source_per_capita.len()
    );

    let continents = fetch_continent_reference(config.continent_url)
        .context("fetching continent reference")?;

    // Join and aggregate.
    let joined = join_datasets(&emissions, &population, reference.aliases(), &continents);
    joined.log_coverage_gap();
    let countries = per_country(&joined.rows);
    let continent_rows = per_continent(&countries);

    // Which continent emits least (and most) per capita?
    let year = config.reference_year;
    println!("Per-capita CO2 emissions by continent, {year} (t/person):");
    let ranked = ranking_for_year(&continent_rows, year);
    for row in &ranked {
        println!(
            "  {:<13} {:6.2}",
            reference.continent_name(row.continent),
            row.co2_per_capita
        );
    }
    if let (Some(least), Some(most)) = (ranked.first(), ranked.last()) {
        println!(
            "{} emits least per capita ({:.2} t/person); {} emits most ({:.2}).",
            reference.continent_name(least.continent),
            least.co2_per_capita,
            reference.continent_name(most.continent),
            most.co2_per_capita
        );
    }

    // Threshold split and counterfactual for the focus continent.
    let continent_name = reference.continent_name(config.scenario_continent);
    let split = threshold_split(
        &countries,
        config.scenario_continent,
        year,
        config.threshold,
    );
    println!();
    println!(
        "{continent_name}, {year}: countries below {:.1} t/person:",
        config.threshold
    );
    println!(
        "  {} of {} countries, {:.0}M people ({:.0}% of the continent)",
        split.below.members,
        split.below.members + split.above.members,
        split.below.population / 1e6,
        split.below.population_share * 100.0
    );

    let outcome = counterfactual(&split, config.target_per_capita);
    println!(
        "If those countries consumed at {:.1} t/person:",
        config.target_per_capita
    );
    println!(
        "  their emissions would change by {:+.1}% and {continent_name}'s total by {:+.1}%.",
        outcome.bucket_change * 100.0,
        outcome.continent_change * 100.0
    );

    // Choropleth artifact.
    let shapes = load_countries(config.geometry_path).context("loading country geometry")?;
    let html = render_choropleth(
        &shapes,
        &countries,
        year,
        reference.aliases(),
        &MapOptions::default(),
    )
    .context("rendering choropleth")?;
    write_choropleth(config.output_path, &html).context("writing choropleth")?;
    println!();
    println!("Choropleth written to {}", config.output_path);

    Ok(())
}
