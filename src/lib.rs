//! Movie ratings analysis library - pipeline stages shared by the binary and tests.

pub mod aggregate;
pub mod clean;
pub mod distribution;
pub mod error;
pub mod genre;
pub mod join;
pub mod load;
pub mod models;
pub mod progress;
pub mod report;
pub mod safety;
pub mod year;
