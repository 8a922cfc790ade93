//! What-if modelling over one continent and one year.
//!
//! Two questions, each a pure function over country rows:
//!
//! - **Threshold split**: which countries sit below a per-capita emissions
//!   threshold, how many people live there, and what share of the continent
//!   is that?
//! - **Counterfactual projection**: if every below-threshold country consumed
//!   at some higher per-capita level, how much would the bucket and the
//!   continent total grow?
//!
//! Rows whose per-capita value is non-finite (zero population upstream) are
//! excluded from both questions.

use serde::Serialize;

use crate::records::{Continent, CountryYearRow};

/// One side of a threshold partition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioBucket {
    /// Number of countries in the bucket.
    pub members: usize,
    /// Summed population.
    pub population: f64,
    /// Summed emissions, metric tons.
    pub co2_tonnes: f64,
    /// Bucket population as a share of the continent total, in [0, 1].
    pub population_share: f64,
}

/// Partition of a continent's countries by a per-capita threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdSplit {
    pub continent: Continent,
    pub year: u16,
    /// Threshold in metric tons per person.
    pub threshold: f64,
    /// Countries with `co2_per_capita < threshold`.
    pub below: ScenarioBucket,
    /// Countries with `co2_per_capita >= threshold`.
    pub above: ScenarioBucket,
}

impl ThresholdSplit {
    /// Total continental population covered by the split.
    pub fn total_population(&self) -> f64 {
        self.below.population + self.above.population
    }

    /// Total continental emissions covered by the split, metric tons.
    pub fn total_co2(&self) -> f64 {
        self.below.co2_tonnes + self.above.co2_tonnes
    }
}

/// Outcome of a counterfactual per-capita projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Counterfactual {
    /// Hypothetical per-capita level for the below-threshold bucket,
    /// metric tons per person.
    pub target_per_capita: f64,
    /// Projected emissions of the below-threshold bucket, metric tons.
    pub projected_bucket_co2: f64,
    /// Projected continent total, metric tons.
    pub projected_continent_co2: f64,
    /// `(post - pre) / pre` for the below-threshold bucket. NaN when the
    /// bucket baseline is zero (undefined scenario).
    pub bucket_change: f64,
    /// `(post - pre) / pre` for the continent total. NaN when the continent
    /// baseline is zero.
    pub continent_change: f64,
}

/// Partition the countries of `continent` in `year` by a per-capita
/// threshold in metric tons per person.
pub fn threshold_split(
    rows: &[CountryYearRow],
    continent: Continent,
    year: u16,
    threshold: f64,
) -> ThresholdSplit {
    let mut below = (0usize, 0.0f64, 0.0f64);
    let mut above = (0usize, 0.0f64, 0.0f64);

    for row in rows {
        if row.continent != continent || row.year != year || !row.co2_per_capita.is_finite() {
            continue;
        }
        let bucket = if row.co2_per_capita < threshold {
            &mut below
        } else {
            &mut above
        };
        bucket.0 += 1;
        bucket.1 += row.population;
        bucket.2 += row.co2_tonnes;
    }

    let total_population = below.1 + above.1;
    let share = |population: f64| {
        if total_population == 0.0 {
            f64::NAN
        } else {
            population / total_population
        }
    };

    ThresholdSplit {
        continent,
        year,
        threshold,
        below: ScenarioBucket {
            members: below.0,
            population: below.1,
            co2_tonnes: below.2,
            population_share: share(below.1),
        },
        above: ScenarioBucket {
            members: above.0,
            population: above.1,
            co2_tonnes: above.2,
            population_share: share(above.1),
        },
    }
}

/// Project the below-threshold bucket at `target_per_capita` tons per person,
/// holding the above-threshold countries fixed.
pub fn counterfactual(split: &ThresholdSplit, target_per_capita: f64) -> Counterfactual {
    let projected_bucket_co2 = split.below.population * target_per_capita;
    let projected_continent_co2 = split.above.co2_tonnes + projected_bucket_co2;

    Counterfactual {
        target_per_capita,
        projected_bucket_co2,
        projected_continent_co2,
        bucket_change: relative_change(split.below.co2_tonnes, projected_bucket_co2),
        continent_change: relative_change(split.total_co2(), projected_continent_co2),
    }
}

/// `(post - pre) / pre`, defined as NaN when `pre` is zero.
fn relative_change(pre: f64, post: f64) -> f64 {
    if pre == 0.0 {
        f64::NAN
    } else {
        (post - pre) / pre
    }
}
