//! Choropleth rendering for the per-capita emissions analysis.
//!
//! Takes country geometry (GeoJSON keyed by `SUBUNIT` name), merges it with
//! one year's country rows from `atlas-core`, classifies the per-capita
//! distribution into bins and emits a self-contained interactive HTML map.

pub mod classify;
pub mod errors;
pub mod geojson;
pub mod render;
