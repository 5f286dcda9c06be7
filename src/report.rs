//! Bundle of every aggregation view, ready for charting.
//!
//! The report is the hand-off point to whatever renders charts: it is
//! written as JSON, and a short text rendering is printed by the binary.

use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

use crate::aggregate::{
    highest_rated, mean_rating_by_genre_year, mean_rating_by_title, most_rated_movie_ids,
    most_rated_titles, rating_counts_by_movie_id,
};
use crate::distribution::{summarize_genres, GenreDistribution};
use crate::error::Result;
use crate::genre::{ratings_by_genre, GenreMatch, GenreMembership};
use crate::join::FactTable;
use crate::models::{GenreYearRating, MovieCount, PipelineStats, TitleCount, TitleRating};
use crate::year::ReleaseYears;

/// Default rating-count floor for the highest-rated view
pub const DEFAULT_MIN_RATINGS: i64 = 100;

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub min_rating_num: i64,
    pub genre_match: GenreMatch,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            min_rating_num: DEFAULT_MIN_RATINGS,
            genre_match: GenreMatch::Token,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub stats: PipelineStats,
    pub min_rating_num: i64,
    pub genre_match: GenreMatch,
    pub mean_rating_by_title: Vec<TitleRating>,
    pub highest_rated: Vec<TitleRating>,
    pub most_rated_titles: Vec<TitleCount>,
    pub most_rated_movie_ids: Vec<MovieCount>,
    /// Every movie id with its rating count (scatter of ratings per movie)
    pub ratings_per_movie: Vec<MovieCount>,
    pub genre_distributions: Vec<GenreDistribution>,
    pub genre_year_ratings: Vec<GenreYearRating>,
}

impl AnalysisReport {
    /// Compute every view from the fact table and its derived columns.
    /// `stats` is filled in with the counts the views reveal.
    pub fn build(
        table: &FactTable,
        membership: &GenreMembership,
        years: &ReleaseYears,
        options: &ReportOptions,
        mut stats: PipelineStats,
    ) -> Self {
        let mean_rating_by_title = mean_rating_by_title(table);
        let genre_ratings = ratings_by_genre(table, membership, options.genre_match);

        stats.fact_rows = table.len();
        stats.distinct_titles = mean_rating_by_title.len();
        stats.distinct_genres = genre_ratings.len();
        stats.rows_without_year = years.missing_count();

        Self {
            min_rating_num: options.min_rating_num,
            genre_match: options.genre_match,
            highest_rated: highest_rated(table, options.min_rating_num),
            most_rated_titles: most_rated_titles(table),
            most_rated_movie_ids: most_rated_movie_ids(table),
            ratings_per_movie: rating_counts_by_movie_id(table),
            genre_distributions: summarize_genres(&genre_ratings),
            genre_year_ratings: mean_rating_by_genre_year(
                table,
                membership,
                years,
                options.genre_match,
            ),
            mean_rating_by_title,
            stats,
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Plain-text tables of the ranked views and genre distributions.
    pub fn render_summary(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "\nTop {} highest rated (min {} ratings):",
            self.highest_rated.len(),
            self.min_rating_num
        );
        let _ = writeln!(out, "{:-<80}", "");
        if self.highest_rated.is_empty() {
            let _ = writeln!(out, "No title meets the rating-count floor.");
        }
        for (rank, t) in self.highest_rated.iter().enumerate() {
            let _ = writeln!(out, "{:>2}. {:<66} {:>5.2}", rank + 1, t.title, t.mean_rating);
        }

        let _ = writeln!(out, "\nMost rated titles:");
        let _ = writeln!(out, "{:-<80}", "");
        for (rank, t) in self.most_rated_titles.iter().enumerate() {
            let _ = writeln!(out, "{:>2}. {:<66} {:>7}", rank + 1, t.title, t.rating_count);
        }

        let _ = writeln!(out, "\nMost rated movie ids:");
        let _ = writeln!(out, "{:-<80}", "");
        for (rank, m) in self.most_rated_movie_ids.iter().enumerate() {
            let _ = writeln!(out, "{:>2}. movieId={:<10} {:>7}", rank + 1, m.movie_id, m.rating_count);
        }

        let _ = writeln!(out, "\nRating distribution by genre ({:?} match):", self.genre_match);
        let _ = writeln!(out, "{:-<80}", "");
        for dist in &self.genre_distributions {
            match &dist.summary {
                Some(s) => {
                    let _ = writeln!(
                        out,
                        "{:<20} n={:<8} min={:.1} q1={:.2} med={:.2} q3={:.2} max={:.1} outliers={}",
                        dist.genre,
                        s.count,
                        s.min,
                        s.lower_quartile,
                        s.median,
                        s.upper_quartile,
                        s.max,
                        s.outliers.len()
                    );
                }
                None => {
                    let _ = writeln!(out, "{:<20} no ratings", dist.genre);
                }
            }
        }

        out
    }
}
