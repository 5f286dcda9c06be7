//! Property-based tests for the cleaning, join and aggregation stages.

use proptest::prelude::*;

use movie_ratings::aggregate::{mean_rating_by_title, qualifying_titles};
use movie_ratings::clean::clean;
use movie_ratings::join::FactTable;
use movie_ratings::models::{FactRow, Movie, RawMovie, RawRating, Rating};

fn arb_raw_rating() -> impl Strategy<Value = RawRating> {
    (
        prop::option::of(0i64..20),
        prop::option::of(0i64..50),
        prop::option::of((1u8..=10).prop_map(|half| half as f64 / 2.0)),
    )
        .prop_map(|(movie_id, user_id, rating)| RawRating {
            movie_id,
            user_id,
            rating,
        })
}

fn arb_raw_movie() -> impl Strategy<Value = RawMovie> {
    (
        prop::option::of(0i64..20),
        prop::option::of("[A-C] \\(19[5-9][0-9]\\)"),
        prop::option::of("(Action|Comedy|Drama)(\\|(Horror|Sci-Fi))?"),
    )
        .prop_map(|(movie_id, title, genres)| RawMovie {
            movie_id,
            title,
            genres,
        })
}

fn movies_and_ratings() -> impl Strategy<Value = (Vec<Movie>, Vec<Rating>)> {
    (
        prop::collection::vec(arb_raw_movie(), 0..15),
        prop::collection::vec(arb_raw_rating(), 0..60),
    )
        .prop_map(|(movies, ratings)| (clean(movies), clean(ratings)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_clean_is_idempotent(rows in prop::collection::vec(arb_raw_rating(), 0..40)) {
        let once = clean(rows);
        let twice = clean(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_clean_keeps_exactly_complete_rows(rows in prop::collection::vec(arb_raw_movie(), 0..40)) {
        let complete = rows
            .iter()
            .filter(|m| m.movie_id.is_some() && m.title.is_some() && m.genres.is_some())
            .count();
        prop_assert_eq!(clean(rows).len(), complete);
    }

    #[test]
    fn prop_join_has_no_orphans((movies, ratings) in movies_and_ratings()) {
        let table = FactTable::join(&movies, &ratings);
        for row in table.rows() {
            prop_assert!(movies.iter().any(|m| m.movie_id == row.movie_id));
        }
    }

    #[test]
    fn prop_join_fan_out_matches_rating_count((movies, ratings) in movies_and_ratings()) {
        let table = FactTable::join(&movies, &ratings);
        let expected: usize = movies
            .iter()
            .map(|m| ratings.iter().filter(|r| r.movie_id == m.movie_id).count())
            .sum();
        prop_assert_eq!(table.len(), expected);
    }

    #[test]
    fn prop_mean_by_title_ignores_row_order(
        (movies, ratings) in movies_and_ratings(),
        seed in any::<u64>(),
    ) {
        let table = FactTable::join(&movies, &ratings);
        let mut rows: Vec<FactRow> = table.rows().to_vec();
        // Deterministic shuffle: rotate then reverse
        if !rows.is_empty() {
            let k = (seed % rows.len() as u64) as usize;
            rows.rotate_left(k);
            rows.reverse();
        }
        let shuffled = FactTable::from_rows(rows);

        let a = mean_rating_by_title(&table);
        let b = mean_rating_by_title(&shuffled);
        prop_assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            prop_assert_eq!(&x.title, &y.title);
            prop_assert!((x.mean_rating - y.mean_rating).abs() <= 0.01);
        }
    }

    #[test]
    fn prop_qualifying_titles_monotone(
        (movies, ratings) in movies_and_ratings(),
        low in -3i64..10,
        step in 0i64..10,
    ) {
        let table = FactTable::join(&movies, &ratings);
        let loose = qualifying_titles(&table, low);
        let strict = qualifying_titles(&table, low + step);
        prop_assert!(strict.len() <= loose.len());
        for t in &strict {
            prop_assert!(loose.iter().any(|l| l.title == t.title));
        }
    }
}
