//! Release year derived from the "(YYYY)" token embedded in titles.

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::join::FactTable;

/// Four ASCII digits in parentheses, anywhere in the title
pub static PAREN_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([0-9]{4})\)").unwrap());

/// First parenthesized 4-digit token of a title. Not range-checked:
/// "(0000)" yields "0000".
pub fn extract_release_year(title: &str) -> Option<&str> {
    PAREN_YEAR
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Release-year column aligned with the rows of a [`FactTable`].
#[derive(Clone, Debug, Default)]
pub struct ReleaseYears {
    years: Vec<Option<Arc<str>>>,
}

impl ReleaseYears {
    pub fn from_fact_table(table: &FactTable) -> Self {
        // Titles repeat once per rating, so extract once per distinct title.
        let mut cache: FxHashMap<Arc<str>, Option<Arc<str>>> = FxHashMap::default();
        let years = table
            .rows()
            .iter()
            .map(|row| {
                cache
                    .entry(Arc::clone(&row.title))
                    .or_insert_with(|| extract_release_year(&row.title).map(Arc::from))
                    .clone()
            })
            .collect();
        Self { years }
    }

    /// Year of the fact row at `row`, if its title carries one
    pub fn get(&self, row: usize) -> Option<&str> {
        self.years.get(row).and_then(|y| y.as_deref())
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.years.iter().filter(|y| y.is_none()).count()
    }
}
