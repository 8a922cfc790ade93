//! Bin classification for the choropleth.
//!
//! A classifier partitions a value distribution into `k` ordered bins and
//! returns the upper edge of each bin. Bin membership is then "first edge
//! greater than or equal to the value": upper edges are inclusive, so a
//! value sitting exactly on a boundary falls in the lower bin, and ties
//! resolve the same way for every strategy.

use crate::errors::{MapError, MapResult};

/// Default number of bins for the choropleth.
pub const DEFAULT_BINS: usize = 6;

/// Strategy for choosing bin edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classifier {
    /// Equal-width intervals between min and max.
    EqualInterval,
    /// Equal-count bins: each bin holds the same number of values
    /// (up to remainder when the count does not divide evenly).
    Quantile,
    /// Fisher-Jenks natural breaks: edges minimise within-bin variance,
    /// so bins follow clusters in the data.
    NaturalBreaks,
}

impl Classifier {
    /// Compute bin upper edges for `values`.
    ///
    /// Returns at most `bins` edges, in ascending order, the last one equal
    /// to the maximum value. Fewer edges come back when the distribution has
    /// fewer distinct values than requested bins, so edges are never
    /// duplicated. Non-finite values must be filtered by the caller
    /// beforehand.
    pub fn breaks(&self, values: &[f64], bins: usize) -> MapResult<Vec<f64>> {
        if bins == 0 {
            return Err(MapError::BadBinCount(bins));
        }
        if values.is_empty() {
            return Err(MapError::EmptyDistribution);
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).expect("non-finite values are caller-filtered"));
        // Clamping to the distinct count keeps every class of the natural
        // breaks dynamic program non-empty on tied data; without it a
        // heavily tied distribution can make the backtrack underflow.
        let bins = bins.min(distinct_count(&sorted));

        let edges = match self {
            Classifier::EqualInterval => equal_interval_edges(&sorted, bins),
            Classifier::Quantile => quantile_edges(&sorted, bins),
            Classifier::NaturalBreaks => jenks_edges(&sorted, bins),
        };
        Ok(edges)
    }
}

/// Index of the bin a value falls into, given ascending upper edges.
/// Values above the last edge clamp into the last bin.
pub fn bin_for(edges: &[f64], value: f64) -> usize {
    edges
        .iter()
        .position(|&edge| value <= edge)
        .unwrap_or(edges.len().saturating_sub(1))
}

/// Number of distinct values in an ascending slice.
fn distinct_count(sorted: &[f64]) -> usize {
    1 + sorted.windows(2).filter(|pair| pair[0] < pair[1]).count()
}

fn equal_interval_edges(sorted: &[f64], bins: usize) -> Vec<f64> {
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let width = (max - min) / bins as f64;
    let mut edges: Vec<f64> = (1..bins).map(|i| min + width * i as f64).collect();
    edges.push(max);
    edges
}

fn quantile_edges(sorted: &[f64], bins: usize) -> Vec<f64> {
    let n = sorted.len();
    let mut edges = Vec::with_capacity(bins);
    for bin in 1..=bins {
        // Last index of the bin under an even split; remainder values land
        // in the earlier bins.
        let index = (bin * n).div_ceil(bins) - 1;
        edges.push(sorted[index]);
    }
    edges
}

/// Fisher-Jenks optimal partition via the classic dynamic program over
/// within-class variance.
fn jenks_edges(sorted: &[f64], bins: usize) -> Vec<f64> {
    let n = sorted.len();
    if bins == 1 {
        return vec![sorted[n - 1]];
    }

    // lower[l][j]: index (1-based) of the first value of class j in the
    // optimal partition of the first l values into j classes.
    let mut lower = vec![vec![0usize; bins + 1]; n + 1];
    let mut cost = vec![vec![0.0f64; bins + 1]; n + 1];
    for j in 1..=bins {
        lower[1][j] = 1;
        for l in 2..=n {
            cost[l][j] = f64::INFINITY;
        }
    }

    for l in 2..=n {
        let mut sum = 0.0;
        let mut sum_squares = 0.0;
        let mut count = 0.0;
        let mut variance = 0.0;

        for m in 1..=l {
            let first = l - m + 1;
            let value = sorted[first - 1];
            count += 1.0;
            sum += value;
            sum_squares += value * value;
            variance = sum_squares - (sum * sum) / count;

            if first > 1 {
                for j in 2..=bins {
                    let candidate = variance + cost[first - 1][j - 1];
                    if cost[l][j] >= candidate {
                        lower[l][j] = first;
                        cost[l][j] = candidate;
                    }
                }
            }
        }
        lower[l][1] = 1;
        cost[l][1] = variance;
    }

    let mut edges = vec![0.0; bins];
    edges[bins - 1] = sorted[n - 1];
    let mut end = n;
    for j in (2..=bins).rev() {
        let first = lower[end][j];
        // Upper edge of class j-1 is the value just before class j starts.
        edges[j - 2] = sorted[first - 2];
        end = first - 1;
    }
    edges
}
