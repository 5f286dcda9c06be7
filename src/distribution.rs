//! Five-number summaries of rating distributions (box-plot statistics).

use serde::Serialize;

use crate::genre::GenreRatings;

/// Whisker reach as a multiple of the interquartile range
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Min, quartiles, median and max of a sample, plus the box-plot whiskers
/// and the points beyond them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiveNumberSummary {
    pub count: usize,
    pub min: f64,
    pub lower_quartile: f64,
    pub median: f64,
    pub upper_quartile: f64,
    pub max: f64,
    /// Smallest value within 1.5 IQR below the lower quartile
    pub lower_whisker: f64,
    /// Largest value within 1.5 IQR above the upper quartile
    pub upper_whisker: f64,
    /// Values outside the whiskers, ascending
    pub outliers: Vec<f64>,
}

impl FiveNumberSummary {
    /// `None` for an empty sample. NaN values are ignored.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let lower_quartile = percentile(&sorted, 0.25);
        let upper_quartile = percentile(&sorted, 0.75);
        let reach = WHISKER_IQR_FACTOR * (upper_quartile - lower_quartile);
        let low_fence = lower_quartile - reach;
        let high_fence = upper_quartile + reach;

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(lower_quartile);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(upper_quartile);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < lower_whisker || v > upper_whisker)
            .collect();

        Some(Self {
            count: sorted.len(),
            min: sorted[0],
            lower_quartile,
            median: percentile(&sorted, 0.5),
            upper_quartile,
            max: sorted[sorted.len() - 1],
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }

    pub fn iqr(&self) -> f64 {
        self.upper_quartile - self.lower_quartile
    }
}

/// Linear interpolation between the closest ranks of a sorted, non-empty sample.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Distribution of one genre's ratings; `summary` is `None` when the genre
/// has no ratings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreDistribution {
    pub genre: String,
    pub summary: Option<FiveNumberSummary>,
}

pub fn summarize_genres(ratings: &GenreRatings) -> Vec<GenreDistribution> {
    ratings
        .iter()
        .map(|(genre, values)| GenreDistribution {
            genre: genre.clone(),
            summary: FiveNumberSummary::from_values(values),
        })
        .collect()
}
