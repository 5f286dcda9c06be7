//! CSV loading for movies.csv and ratings.csv.
//!
//! Columns are looked up by header name. A missing required column is a
//! schema error; an empty, NA-marked or unparsable cell just becomes `None`
//! and the row is dropped later by the cleaner.

use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{AnalysisError, Result};
use crate::models::{RawMovie, RawRating};
use crate::progress::{create_row_counter, finish_phase, log_rows};

pub const MOVIE_ID_COLUMN: &str = "movieId";
pub const TITLE_COLUMN: &str = "title";
pub const GENRES_COLUMN: &str = "genres";
pub const USER_ID_COLUMN: &str = "userId";
pub const RATING_COLUMN: &str = "rating";

/// Cell values read as missing, in addition to the empty cell
pub const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Rows read from one input, plus the lines the CSV reader itself rejected.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub rows: Vec<T>,
    pub malformed_lines: usize,
}

pub fn load_movies(path: &Path) -> Result<Loaded<RawMovie>> {
    let file = File::open(path)?;
    read_movies(
        BufReader::with_capacity(8 << 20, file),
        &path.display().to_string(),
    )
}

pub fn load_ratings(path: &Path) -> Result<Loaded<RawRating>> {
    let file = File::open(path)?;
    read_ratings(
        BufReader::with_capacity(8 << 20, file),
        &path.display().to_string(),
    )
}

pub fn read_movies<R: Read>(reader: R, source_name: &str) -> Result<Loaded<RawMovie>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let idx_id = column_index(&headers, MOVIE_ID_COLUMN, source_name)?;
    let idx_title = column_index(&headers, TITLE_COLUMN, source_name)?;
    let idx_genres = column_index(&headers, GENRES_COLUMN, source_name)?;

    read_rows(&mut rdr, "Phase 1: Reading movies", |rec| RawMovie {
        movie_id: parse_cell(rec, idx_id),
        title: text_cell(rec, idx_title),
        genres: text_cell(rec, idx_genres),
    })
}

/// Reads ratings; the timestamp column is never looked at.
pub fn read_ratings<R: Read>(reader: R, source_name: &str) -> Result<Loaded<RawRating>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let idx_id = column_index(&headers, MOVIE_ID_COLUMN, source_name)?;
    let idx_user = column_index(&headers, USER_ID_COLUMN, source_name)?;
    let idx_rating = column_index(&headers, RATING_COLUMN, source_name)?;

    read_rows(&mut rdr, "Phase 1: Reading ratings", |rec| RawRating {
        movie_id: parse_cell(rec, idx_id),
        user_id: parse_cell(rec, idx_user),
        rating: parse_cell::<f64>(rec, idx_rating).filter(|r| !r.is_nan()),
    })
}

fn read_rows<R: Read, T>(
    rdr: &mut csv::Reader<R>,
    phase: &str,
    mut to_row: impl FnMut(&StringRecord) -> T,
) -> Result<Loaded<T>> {
    let pb = create_row_counter(phase);
    let mut rows = Vec::new();
    let mut malformed_lines = 0;

    for result in rdr.records() {
        match result {
            Ok(rec) => rows.push(to_row(&rec)),
            Err(e) if is_line_error(&e) => malformed_lines += 1,
            Err(e) => return Err(e.into()),
        }
        pb.inc(1);
        log_rows(phase, pb.position());
    }

    finish_phase(
        &pb,
        format!(
            "{}: {} rows ({} malformed lines skipped)",
            phase,
            rows.len(),
            malformed_lines
        ),
    );
    Ok(Loaded {
        rows,
        malformed_lines,
    })
}

/// Errors confined to a single line (field count, encoding) are skipped;
/// anything else (I/O) aborts the load.
fn is_line_error(e: &csv::Error) -> bool {
    matches!(
        e.kind(),
        csv::ErrorKind::UnequalLengths { .. } | csv::ErrorKind::Utf8 { .. }
    )
}

fn column_index(headers: &StringRecord, column: &'static str, source_name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == column)
        .ok_or_else(|| AnalysisError::MissingColumn {
            source_name: source_name.to_string(),
            column,
        })
}

pub fn is_na(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || NA_TOKENS.contains(&cell)
}

fn text_cell(rec: &StringRecord, idx: usize) -> Option<String> {
    rec.get(idx).filter(|s| !is_na(s)).map(|s| s.to_string())
}

fn parse_cell<T: std::str::FromStr>(rec: &StringRecord, idx: usize) -> Option<T> {
    rec.get(idx)
        .filter(|s| !is_na(s))
        .and_then(|s| s.trim().parse().ok())
}
