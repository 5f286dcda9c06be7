//! Core data models for the movie ratings analysis.
//!
//! Raw records as read from disk, cleaned records, the joined fact row,
//! the result rows of every aggregation view and pipeline statistics.

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::Arc;

// ============================================================================
// Type Aliases
// ============================================================================

/// Index mapping movie_id to the positions of its ratings in the rating table
pub type RatingIndex = FxHashMap<i64, Vec<usize>>;

// ============================================================================
// String Interning
// ============================================================================

/// String interner for deduplicating title and genre strings across fact rows.
/// A movie with N ratings fans out to N fact rows that all share one allocation.
pub struct StringInterner {
    strings: FxHashMap<Arc<str>, Arc<str>>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self {
            strings: FxHashMap::default(),
        }
    }

    /// Intern a string, returning a reference-counted handle.
    /// If the string was seen before, returns the existing Arc.
    pub fn intern(&mut self, s: &str) -> Arc<str> {
        if let Some(existing) = self.strings.get(s) {
            return Arc::clone(existing);
        }
        let arc: Arc<str> = Arc::from(s);
        self.strings.insert(Arc::clone(&arc), Arc::clone(&arc));
        arc
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Input Models
// ============================================================================

/// Movie row as read from movies.csv; any cell may be absent or unparsable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawMovie {
    pub movie_id: Option<i64>,
    pub title: Option<String>,
    pub genres: Option<String>,
}

/// Rating row as read from ratings.csv (timestamp already discarded).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRating {
    pub movie_id: Option<i64>,
    pub user_id: Option<i64>,
    pub rating: Option<f64>,
}

/// Movie with every field present
#[derive(Clone, Debug, PartialEq)]
pub struct Movie {
    pub movie_id: i64,
    pub title: String,
    pub genres: String, // '|'-delimited, e.g. "Adventure|Animation|Children"
}

/// Rating with every field present
#[derive(Clone, Debug, PartialEq)]
pub struct Rating {
    pub movie_id: i64,
    pub user_id: i64,
    pub rating: f64,
}

// ============================================================================
// Fact Table
// ============================================================================

/// One rating event joined with the attributes of the rated movie.
#[derive(Clone, Debug, PartialEq)]
pub struct FactRow {
    pub movie_id: i64,
    pub title: Arc<str>,
    pub genres: Arc<str>,
    pub user_id: i64,
    pub rating: f64,
}

// ============================================================================
// Aggregation Results
// ============================================================================

/// Mean rating of a title (ratings of movies sharing a title are pooled)
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TitleRating {
    pub title: String,
    pub mean_rating: f64,
}

/// Number of ratings a title received
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TitleCount {
    pub title: String,
    pub rating_count: usize,
}

/// Number of ratings a movie id received
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MovieCount {
    pub movie_id: i64,
    pub rating_count: usize,
}

/// Mean rating of all fact rows sharing a genre and a release year
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenreYearRating {
    pub genre: String,
    pub release_year: String,
    pub mean_rating: f64,
}

// ============================================================================
// Statistics (Instrumentation)
// ============================================================================

/// Row counts per pipeline phase, logged as JSON between phases.
#[derive(Default, Debug, Clone, Serialize)]
pub struct PipelineStats {
    // Phase 1: Loading
    pub movies_read: usize,
    pub ratings_read: usize,
    pub malformed_lines_skipped: usize,

    // Phase 2: Cleaning
    pub movies_dropped: usize,
    pub ratings_dropped: usize,

    // Phase 3: Join
    pub fact_rows: usize,
    pub movies_without_ratings: usize,
    pub orphan_ratings: usize,

    // Phase 4: Derived views
    pub distinct_titles: usize,
    pub distinct_genres: usize,
    pub rows_without_year: usize,

    // Timing
    pub elapsed_seconds: f64,
}

impl PipelineStats {
    /// Share of fact rows whose title carries a release year, as a percentage
    pub fn year_coverage(&self) -> f64 {
        if self.fact_rows == 0 {
            0.0
        } else {
            100.0 * (self.fact_rows - self.rows_without_year) as f64 / self.fact_rows as f64
        }
    }

    /// Log stats to stderr in JSON format
    pub fn log_phase(&self, phase: &str) {
        if let Ok(json) = serde_json::to_string_pretty(self) {
            eprintln!("[STATS:{}]\n{}", phase, json);
        }
    }

    /// Write stats to a JSON file
    pub fn write_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interner_shares_allocation() {
        let mut interner = StringInterner::new();
        let a = interner.intern("Toy Story (1995)");
        let b = interner.intern("Toy Story (1995)");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(interner.len(), 1);
        interner.intern("Jumanji (1995)");
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_year_coverage() {
        let stats = PipelineStats {
            fact_rows: 4,
            rows_without_year: 1,
            ..Default::default()
        };
        assert!((stats.year_coverage() - 75.0).abs() < 1e-9);
        assert_eq!(PipelineStats::default().year_coverage(), 0.0);
    }
}
