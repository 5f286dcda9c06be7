//! Grouped statistics over the fact table.
//!
//! Every view borrows the fact table and returns fresh rows; none depends on
//! another having run. Group keys come out in ascending key order, and the
//! ranked views use a stable sort, so ties keep key order.
//!
//! Titles are the grouping key for the title views: two movies sharing a
//! title have their ratings pooled.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::genre::{GenreMatch, GenreMembership};
use crate::join::FactTable;
use crate::models::{GenreYearRating, MovieCount, TitleCount, TitleRating};
use crate::year::ReleaseYears;

/// Length of every ranked view
pub const TOP_K: usize = 10;

/// Round to 2 decimal places, ties to even (3.125 -> 3.12)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[derive(Debug, Clone, Copy, Default)]
struct MeanAcc {
    sum: f64,
    count: usize,
}

impl MeanAcc {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

fn group_by_title(table: &FactTable) -> BTreeMap<&str, MeanAcc> {
    let mut groups: BTreeMap<&str, MeanAcc> = BTreeMap::new();
    for row in table.rows() {
        groups.entry(&*row.title).or_default().push(row.rating);
    }
    groups
}

/// Mean rating (2 decimals) of every title, ordered by title.
pub fn mean_rating_by_title(table: &FactTable) -> Vec<TitleRating> {
    group_by_title(table)
        .into_iter()
        .map(|(title, acc)| TitleRating {
            title: title.to_string(),
            mean_rating: round2(acc.mean()),
        })
        .collect()
}

/// Titles with at least `min_rating_num` ratings, with their mean rating,
/// ordered by title. A threshold of zero or below admits every title.
pub fn qualifying_titles(table: &FactTable, min_rating_num: i64) -> Vec<TitleRating> {
    group_by_title(table)
        .into_iter()
        .filter(|(_, acc)| acc.count as i64 >= min_rating_num)
        .map(|(title, acc)| TitleRating {
            title: title.to_string(),
            mean_rating: round2(acc.mean()),
        })
        .collect()
}

/// Up to [`TOP_K`] highest-rated titles among those with at least
/// `min_rating_num` ratings. Empty when no title qualifies.
pub fn highest_rated(table: &FactTable, min_rating_num: i64) -> Vec<TitleRating> {
    let mut ranked = qualifying_titles(table, min_rating_num);
    ranked.sort_by(|a, b| b.mean_rating.total_cmp(&a.mean_rating));
    ranked.truncate(TOP_K);
    ranked
}

/// Number of ratings per title, ordered by title.
pub fn rating_counts_by_title(table: &FactTable) -> Vec<TitleCount> {
    group_by_title(table)
        .into_iter()
        .map(|(title, acc)| TitleCount {
            title: title.to_string(),
            rating_count: acc.count,
        })
        .collect()
}

/// Number of ratings per movie id, ordered by id.
pub fn rating_counts_by_movie_id(table: &FactTable) -> Vec<MovieCount> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for row in table.rows() {
        *counts.entry(row.movie_id).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(movie_id, rating_count)| MovieCount {
            movie_id,
            rating_count,
        })
        .collect()
}

/// Up to [`TOP_K`] titles with the most ratings.
pub fn most_rated_titles(table: &FactTable) -> Vec<TitleCount> {
    let mut ranked = rating_counts_by_title(table);
    ranked.sort_by(|a, b| b.rating_count.cmp(&a.rating_count));
    ranked.truncate(TOP_K);
    ranked
}

/// Up to [`TOP_K`] movie ids with the most ratings.
pub fn most_rated_movie_ids(table: &FactTable) -> Vec<MovieCount> {
    let mut ranked = rating_counts_by_movie_id(table);
    ranked.sort_by(|a, b| b.rating_count.cmp(&a.rating_count));
    ranked.truncate(TOP_K);
    ranked
}

/// Mean rating (2 decimals) per (genre, release year), ordered by genre then
/// year. Rows whose title has no year are left out of every group. Genre
/// membership follows `mode`, as in [`crate::genre::ratings_by_genre`].
pub fn mean_rating_by_genre_year(
    table: &FactTable,
    membership: &GenreMembership,
    years: &ReleaseYears,
    mode: GenreMatch,
) -> Vec<GenreYearRating> {
    let mut groups: BTreeMap<(Arc<str>, &str), MeanAcc> = BTreeMap::new();
    for (idx, row) in table.rows().iter().enumerate() {
        let Some(year) = years.get(idx) else {
            continue;
        };
        for genre in membership.genres_for(row, mode) {
            groups
                .entry((Arc::clone(genre), year))
                .or_default()
                .push(row.rating);
        }
    }

    groups
        .into_iter()
        .map(|((genre, year), acc)| GenreYearRating {
            genre: genre.to_string(),
            release_year: year.to_string(),
            mean_rating: round2(acc.mean()),
        })
        .collect()
}
