//! Left join of ratings onto movies, producing the read-only fact table.

use rustc_hash::FxHashSet;

use crate::models::{FactRow, Movie, Rating, RatingIndex, StringInterner};

/// The cleaned, joined table of rating events. Built once, then only read:
/// every derived view borrows it and keeps its own columns.
#[derive(Clone, Debug, Default)]
pub struct FactTable {
    rows: Vec<FactRow>,
}

/// Counts describing what the join discarded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JoinSummary {
    pub movies_without_ratings: usize,
    pub orphan_ratings: usize,
}

impl FactTable {
    /// Left-join `ratings` onto `movies` by movie_id, then drop rows with a
    /// missing side. Row order follows the movie table; a movie with N
    /// ratings fans out to N rows in rating-table order.
    pub fn join(movies: &[Movie], ratings: &[Rating]) -> Self {
        Self::join_with_summary(movies, ratings).0
    }

    pub fn join_with_summary(movies: &[Movie], ratings: &[Rating]) -> (Self, JoinSummary) {
        let mut index = RatingIndex::default();
        for (pos, rating) in ratings.iter().enumerate() {
            index.entry(rating.movie_id).or_default().push(pos);
        }

        let mut interner = StringInterner::new();
        let mut rows = Vec::with_capacity(ratings.len());
        let mut summary = JoinSummary::default();

        for movie in movies {
            let Some(positions) = index.get(&movie.movie_id) else {
                // Left join yields a NA rating here; the row is dropped.
                summary.movies_without_ratings += 1;
                continue;
            };
            let title = interner.intern(&movie.title);
            let genres = interner.intern(&movie.genres);
            rows.extend(positions.iter().map(|&pos| {
                let rating = &ratings[pos];
                FactRow {
                    movie_id: movie.movie_id,
                    title: title.clone(),
                    genres: genres.clone(),
                    user_id: rating.user_id,
                    rating: rating.rating,
                }
            }));
        }

        let known: FxHashSet<i64> = movies.iter().map(|m| m.movie_id).collect();
        summary.orphan_ratings = ratings
            .iter()
            .filter(|r| !known.contains(&r.movie_id))
            .count();

        (Self { rows }, summary)
    }

    /// Build a table from rows that are already joined (tests, fixtures).
    pub fn from_rows(rows: Vec<FactRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[FactRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct movie ids present in the table
    pub fn movie_ids(&self) -> FxHashSet<i64> {
        self.rows.iter().map(|r| r.movie_id).collect()
    }

    pub fn contains_movie(&self, movie_id: i64) -> bool {
        self.rows.iter().any(|r| r.movie_id == movie_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn movie(id: i64, title: &str, genres: &str) -> Movie {
        Movie {
            movie_id: id,
            title: title.to_string(),
            genres: genres.to_string(),
        }
    }

    fn rating(movie_id: i64, user_id: i64, rating: f64) -> Rating {
        Rating {
            movie_id,
            user_id,
            rating,
        }
    }

    #[test]
    fn test_join_fan_out_and_order() {
        let movies = vec![movie(2, "B (1990)", "Comedy"), movie(1, "A (2000)", "Drama")];
        let ratings = vec![
            rating(1, 10, 4.0),
            rating(2, 11, 3.0),
            rating(1, 12, 5.0),
        ];
        let table = FactTable::join(&movies, &ratings);
        let got: Vec<(i64, i64)> = table.rows().iter().map(|r| (r.movie_id, r.user_id)).collect();
        assert_eq!(got, vec![(2, 11), (1, 10), (1, 12)]);
    }

    #[test]
    fn test_join_drops_unmatched_both_sides() {
        let movies = vec![movie(1, "A (2000)", "Drama"), movie(3, "Unrated", "Horror")];
        let ratings = vec![rating(1, 1, 4.0), rating(99, 1, 2.0)];
        let (table, summary) = FactTable::join_with_summary(&movies, &ratings);
        assert_eq!(table.len(), 1);
        assert_eq!(table.movie_ids().into_iter().collect::<Vec<_>>(), vec![1]);
        assert!(!table.contains_movie(3));
        assert!(!table.contains_movie(99));
        assert_eq!(
            summary,
            JoinSummary {
                movies_without_ratings: 1,
                orphan_ratings: 1
            }
        );
    }

    #[test]
    fn test_join_shares_title_allocation() {
        let movies = vec![movie(1, "A (2000)", "Drama")];
        let ratings = vec![rating(1, 1, 4.0), rating(1, 2, 5.0)];
        let table = FactTable::join(&movies, &ratings);
        assert!(Arc::ptr_eq(&table.rows()[0].title, &table.rows()[1].title));
    }

    #[test]
    fn test_join_empty_inputs() {
        assert!(FactTable::join(&[], &[rating(1, 1, 1.0)]).is_empty());
        assert!(FactTable::join(&[movie(1, "A", "Drama")], &[]).is_empty());
    }
}
