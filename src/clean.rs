//! Drop-on-missing cleaning.
//!
//! A row survives only if every field is present. Surviving rows keep their
//! relative order. Already-clean records complete into themselves, so a
//! second pass is a no-op.

use crate::models::{Movie, RawMovie, RawRating, Rating};

/// A record that may have absent fields.
pub trait Complete {
    type Output;

    /// The fully populated record, or `None` if any field is missing.
    fn complete(self) -> Option<Self::Output>;
}

impl Complete for RawMovie {
    type Output = Movie;

    fn complete(self) -> Option<Movie> {
        Some(Movie {
            movie_id: self.movie_id?,
            title: self.title?,
            genres: self.genres?,
        })
    }
}

impl Complete for RawRating {
    type Output = Rating;

    fn complete(self) -> Option<Rating> {
        Some(Rating {
            movie_id: self.movie_id?,
            user_id: self.user_id?,
            rating: self.rating.filter(|r| !r.is_nan())?,
        })
    }
}

impl Complete for Movie {
    type Output = Movie;

    fn complete(self) -> Option<Movie> {
        Some(self)
    }
}

impl Complete for Rating {
    type Output = Rating;

    fn complete(self) -> Option<Rating> {
        (!self.rating.is_nan()).then_some(self)
    }
}

/// Remove every row with a missing value. Never fails; an all-incomplete
/// input yields an empty table.
pub fn clean<T: Complete>(rows: impl IntoIterator<Item = T>) -> Vec<T::Output> {
    rows.into_iter().filter_map(Complete::complete).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_movie(id: Option<i64>, title: Option<&str>, genres: Option<&str>) -> RawMovie {
        RawMovie {
            movie_id: id,
            title: title.map(str::to_string),
            genres: genres.map(str::to_string),
        }
    }

    #[test]
    fn test_clean_drops_incomplete_rows_in_order() {
        let rows = vec![
            raw_movie(Some(1), Some("A (2000)"), Some("Drama")),
            raw_movie(None, Some("B"), Some("Comedy")),
            raw_movie(Some(3), None, Some("Comedy")),
            raw_movie(Some(4), Some("D"), None),
            raw_movie(Some(5), Some("E (1999)"), Some("Horror")),
        ];
        let cleaned = clean(rows);
        let ids: Vec<i64> = cleaned.iter().map(|m| m.movie_id).collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn test_clean_all_missing_is_empty() {
        let rows = vec![RawRating::default(), RawRating::default()];
        assert!(clean(rows).is_empty());
    }

    #[test]
    fn test_clean_twice_is_noop() {
        let rows = vec![
            RawRating {
                movie_id: Some(1),
                user_id: Some(7),
                rating: Some(3.5),
            },
            RawRating {
                movie_id: Some(2),
                user_id: None,
                rating: Some(4.0),
            },
        ];
        let once = clean(rows);
        let twice = clean(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 1);
    }

    #[test]
    fn test_nan_rating_is_missing() {
        let rows = vec![RawRating {
            movie_id: Some(1),
            user_id: Some(1),
            rating: Some(f64::NAN),
        }];
        assert!(clean(rows).is_empty());
    }
}
