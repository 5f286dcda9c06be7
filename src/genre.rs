//! Genre membership decoded from the '|'-delimited genres field.
//!
//! Membership is computed once as an explicit (movie_id, genre) relation.
//! `GenreMatch::Substring` keeps the raw-field "contains" lookup available:
//! under it a genre also matches movies whose field merely contains its name
//! (e.g. "Sci-Fi" matches "Sci-Fi Horror").

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use crate::join::FactTable;
use crate::models::{FactRow, Movie, StringInterner};

pub const GENRE_DELIMITER: char = '|';

/// Genre name -> ratings of its movies, in fact-table order
pub type GenreRatings = BTreeMap<String, Vec<f64>>;

/// How a fact row is tested for membership in a genre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenreMatch {
    /// Exact token of the split genres field
    #[default]
    Token,
    /// Substring of the raw genres field
    Substring,
}

impl FromStr for GenreMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "token" => Ok(GenreMatch::Token),
            "substring" => Ok(GenreMatch::Substring),
            other => Err(format!("unknown genre match mode '{}'", other)),
        }
    }
}

/// Split a raw genres field into its tokens
pub fn split_genres(field: &str) -> impl Iterator<Item = &str> {
    field.split(GENRE_DELIMITER).filter(|g| !g.is_empty())
}

/// The (movie_id, genre) relation over the whole movie table.
#[derive(Debug, Clone, Default)]
pub struct GenreMembership {
    by_movie: FxHashMap<i64, Vec<Arc<str>>>,
    genres: Vec<Arc<str>>,
}

impl GenreMembership {
    pub fn from_movies(movies: &[Movie]) -> Self {
        let mut interner = StringInterner::new();
        let mut by_movie: FxHashMap<i64, Vec<Arc<str>>> = FxHashMap::default();
        let mut seen: FxHashSet<Arc<str>> = FxHashSet::default();

        for movie in movies {
            let entry = by_movie.entry(movie.movie_id).or_default();
            for token in split_genres(&movie.genres) {
                let genre = interner.intern(token);
                if !entry.contains(&genre) {
                    entry.push(Arc::clone(&genre));
                }
                seen.insert(genre);
            }
        }

        let mut genres: Vec<Arc<str>> = seen.into_iter().collect();
        genres.sort();
        Self { by_movie, genres }
    }

    /// Distinct genre tokens across the movie table, sorted
    pub fn unique_genres(&self) -> &[Arc<str>] {
        &self.genres
    }

    /// Genres of one movie, in field order
    pub fn genres_of(&self, movie_id: i64) -> &[Arc<str>] {
        self.by_movie
            .get(&movie_id)
            .map(|g| g.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_member(&self, movie_id: i64, genre: &str) -> bool {
        self.genres_of(movie_id).iter().any(|g| &**g == genre)
    }

    /// Genres a fact row counts towards under `mode`
    pub fn genres_for<'a>(
        &'a self,
        row: &'a FactRow,
        mode: GenreMatch,
    ) -> impl Iterator<Item = &'a Arc<str>> + 'a {
        let (tokens, scanned): (&[Arc<str>], &[Arc<str>]) = match mode {
            GenreMatch::Token => (self.genres_of(row.movie_id), &[]),
            GenreMatch::Substring => (&[], &self.genres),
        };
        tokens
            .iter()
            .chain(scanned.iter().filter(move |g| row.genres.contains(&***g)))
    }
}

/// Ratings per genre for every genre of the movie table. Genres without
/// rated movies map to an empty sequence.
pub fn ratings_by_genre(
    table: &FactTable,
    membership: &GenreMembership,
    mode: GenreMatch,
) -> GenreRatings {
    let mut out: GenreRatings = membership
        .unique_genres()
        .iter()
        .map(|g| (g.to_string(), Vec::new()))
        .collect();

    for row in table.rows() {
        for genre in membership.genres_for(row, mode) {
            if let Some(values) = out.get_mut(&**genre) {
                values.push(row.rating);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rating;

    fn movie(id: i64, genres: &str) -> Movie {
        Movie {
            movie_id: id,
            title: format!("Movie {}", id),
            genres: genres.to_string(),
        }
    }

    fn rating(movie_id: i64, rating: f64) -> Rating {
        Rating {
            movie_id,
            user_id: 1,
            rating,
        }
    }

    #[test]
    fn test_unique_genres_sorted_and_distinct() {
        let movies = vec![movie(1, "Comedy|Action"), movie(2, "Action|Drama")];
        let membership = GenreMembership::from_movies(&movies);
        let names: Vec<&str> = membership.unique_genres().iter().map(|g| &**g).collect();
        assert_eq!(names, vec!["Action", "Comedy", "Drama"]);
        assert!(membership.is_member(1, "Action"));
        assert!(!membership.is_member(1, "Drama"));
        assert!(membership.genres_of(42).is_empty());
    }

    #[test]
    fn test_multi_genre_movie_counts_in_each() {
        let movies = vec![movie(1, "Action|Comedy"), movie(2, "Drama")];
        let ratings = vec![rating(1, 4.0), rating(2, 2.0), rating(1, 3.0)];
        let table = FactTable::join(&movies, &ratings);
        let membership = GenreMembership::from_movies(&movies);
        let by_genre = ratings_by_genre(&table, &membership, GenreMatch::Token);
        assert_eq!(by_genre["Action"], vec![4.0, 3.0]);
        assert_eq!(by_genre["Comedy"], vec![4.0, 3.0]);
        assert_eq!(by_genre["Drama"], vec![2.0]);
    }

    #[test]
    fn test_unrated_genre_is_empty() {
        let movies = vec![movie(1, "Action"), movie(2, "Western")];
        let ratings = vec![rating(1, 4.0)];
        let table = FactTable::join(&movies, &ratings);
        let membership = GenreMembership::from_movies(&movies);
        let by_genre = ratings_by_genre(&table, &membership, GenreMatch::Token);
        assert!(by_genre["Western"].is_empty());
    }

    #[test]
    fn test_substring_mode_reproduces_false_positive() {
        let movies = vec![movie(1, "Sci-Fi Horror"), movie(2, "Sci-Fi")];
        let ratings = vec![rating(1, 1.0), rating(2, 5.0)];
        let table = FactTable::join(&movies, &ratings);
        let membership = GenreMembership::from_movies(&movies);

        let token = ratings_by_genre(&table, &membership, GenreMatch::Token);
        assert_eq!(token["Sci-Fi"], vec![5.0]);
        assert_eq!(token["Sci-Fi Horror"], vec![1.0]);

        let substring = ratings_by_genre(&table, &membership, GenreMatch::Substring);
        assert_eq!(substring["Sci-Fi"], vec![1.0, 5.0]);
        assert_eq!(substring["Sci-Fi Horror"], vec![1.0]);
    }

    #[test]
    fn test_genre_match_from_str() {
        assert_eq!("token".parse::<GenreMatch>(), Ok(GenreMatch::Token));
        assert_eq!("Substring".parse::<GenreMatch>(), Ok(GenreMatch::Substring));
        assert!("fuzzy".parse::<GenreMatch>().is_err());
    }
}
