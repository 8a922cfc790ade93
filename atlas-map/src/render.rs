//! Choropleth artifact rendering.
//!
//! Merges country geometry with one year's per-capita values (inner join by
//! canonical name, geometries without data dropped silently), classifies the
//! values into bins and writes a single self-contained HTML page: a Leaflet
//! map with an OpenStreetMap base layer, the shaded country polygons and a
//! legend. No server-side component; the file opens directly in a browser.

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde_json::json;

use atlas_core::records::CountryYearRow;
use atlas_core::reference::NameAliases;

use crate::classify::{bin_for, Classifier, DEFAULT_BINS};
use crate::errors::{MapError, MapResult};
use crate::geojson::CountryShape;

/// Six-step sequential ramp (light yellow to dark red), one colour per bin.
const COLOR_RAMP: [&str; 6] = [
    "#ffffb2", "#fed976", "#feb24c", "#fd8d3c", "#f03b20", "#bd0026",
];

const PAGE_TEMPLATE: &str = include_str!("../templates/choropleth.html");

/// Rendering parameters. Defaults match the analysis: 6 quantile bins over
/// the 2014 distribution.
#[derive(Debug, Clone)]
pub struct MapOptions {
    pub bins: usize,
    pub classifier: Classifier,
    pub title: String,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            bins: DEFAULT_BINS,
            classifier: Classifier::Quantile,
            title: "CO2 emissions per capita, 2014".to_string(),
        }
    }
}

/// Render the choropleth page for one year's country rows.
///
/// Shapes whose (aliased) name has no data row for `year` are dropped
/// silently, mirroring the joiner's coverage policy. Rows with non-finite
/// per-capita values are excluded from classification and shading.
pub fn render_choropleth(
    shapes: &[CountryShape],
    rows: &[CountryYearRow],
    year: u16,
    aliases: &NameAliases,
    options: &MapOptions,
) -> MapResult<String> {
    let values_by_country: std::collections::HashMap<&str, f64> = rows
        .iter()
        .filter(|row| row.year == year && row.co2_per_capita.is_finite())
        .map(|row| (row.country.as_str(), row.co2_per_capita))
        .collect();

    let mut matched: Vec<(&CountryShape, f64)> = Vec::new();
    let mut dropped = 0usize;
    for shape in shapes {
        let canonical = aliases.canonical(&shape.name);
        match values_by_country.get(canonical) {
            Some(&value) => matched.push((shape, value)),
            None => {
                debug!("no {year} data for geometry '{}', dropped", shape.name);
                dropped += 1;
            }
        }
    }
    if matched.is_empty() {
        return Err(MapError::EmptyDistribution);
    }
    info!(
        "choropleth: {} countries shaded, {} geometries without data",
        matched.len(),
        dropped
    );

    let values: Vec<f64> = matched.iter().map(|(_, value)| *value).collect();
    let edges = options.classifier.breaks(&values, options.bins)?;

    let features: Vec<serde_json::Value> = matched
        .iter()
        .map(|(shape, value)| {
            let bin = bin_for(&edges, *value);
            json!({
                "type": "Feature",
                "geometry": shape.geometry,
                "properties": {
                    "name": shape.name,
                    "value": value,
                    "bin": bin,
                    "color": ramp_color(bin, edges.len()),
                },
            })
        })
        .collect();
    let collection = json!({ "type": "FeatureCollection", "features": features });

    let minimum = values
        .iter()
        .cloned()
        .fold(f64::INFINITY, f64::min);
    let legend = legend_html(minimum, &edges);

    Ok(PAGE_TEMPLATE
        .replace("__TITLE__", &options.title)
        .replace("__LEGEND__", &legend)
        .replace("__DATA__", &collection.to_string()))
}

/// Write the rendered page to its fixed output path.
pub fn write_choropleth<P: AsRef<Path>>(path: P, html: &str) -> MapResult<()> {
    let path = path.as_ref();
    fs::write(path, html).map_err(|source| MapError::Io {
        path: path.display().to_string(),
        source,
    })?;
    info!("wrote choropleth to {}", path.display());
    Ok(())
}

/// Colour for a bin, sampling the fixed 6-step ramp when the bin count
/// differs from six.
fn ramp_color(bin: usize, bins: usize) -> &'static str {
    if bins <= 1 {
        return COLOR_RAMP[COLOR_RAMP.len() - 1];
    }
    let index = bin * (COLOR_RAMP.len() - 1) / (bins - 1);
    COLOR_RAMP[index]
}

fn legend_html(minimum: f64, edges: &[f64]) -> String {
    let mut entries = Vec::with_capacity(edges.len());
    let mut lower = minimum;
    for (bin, &edge) in edges.iter().enumerate() {
        entries.push(format!(
            "<div><span class=\"swatch\" style=\"background:{}\"></span>{:.2} to {:.2}</div>",
            ramp_color(bin, edges.len()),
            lower,
            edge
        ));
        lower = edge;
    }
    // Substituted into a single-quoted JS string, so keep it one line.
    entries.join("")
}
